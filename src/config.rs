use crate::error::{Error, Result};
use crate::footage::{SelectionMethod, VideoOrientation, VideoQuality};
use crate::llm::prompt::DEFAULT_TEMPLATE;
use crate::llm::{LLMConfig, LLMProvider};
use crate::quran::Reciter;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the video maker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Quran data store locations
    pub data: DataConfig,

    /// Suggestion agent settings
    pub llm: LLMConfig,

    /// Prompt template settings
    pub prompt: PromptConfig,

    /// Stock footage settings
    pub footage: FootageConfig,

    /// Recitation audio settings
    pub audio: AudioConfig,

    /// Overlay and compositing settings
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Base directory for the bundled data files
    pub data_dir: PathBuf,

    /// Quran text JSON, keyed surah -> verse -> displayText
    pub quran_file: PathBuf,

    /// Word-by-word translation JSON, keyed "surah:verse:word"
    pub translation_file: PathBuf,

    /// Reciter whose timestamp data drives the timeline
    pub reciter: Reciter,
}

impl DataConfig {
    /// Timestamp store path for the configured reciter
    pub fn timestamp_file(&self) -> PathBuf {
        self.data_dir.join(self.reciter.timestamp_file())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Optional template file overriding the built-in planning prompt
    pub template_file: Option<PathBuf>,
}

impl PromptConfig {
    /// Load the prompt template, falling back to the built-in one
    pub async fn load_template(&self) -> Result<String> {
        match &self.template_file {
            Some(path) => match tokio::fs::read_to_string(path).await {
                Ok(content) => Ok(content),
                Err(e) => Err(Error::Configuration(format!(
                    "failed to load prompt template {}: {}",
                    path.display(),
                    e
                ))),
            },
            None => Ok(DEFAULT_TEMPLATE.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FootageConfig {
    /// Pexels API key
    pub api_key: Option<String>,

    /// Search orientation constraint
    pub orientation: Option<VideoOrientation>,

    /// Search and download quality
    pub quality: VideoQuality,

    /// How to pick a clip out of the search results
    pub selection: SelectionMethod,

    /// Directory for downloaded footage
    pub video_dir: PathBuf,

    /// HTTP request timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Directory for downloaded and combined audio
    pub audio_dir: PathBuf,

    /// HTTP request timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Output frame width in pixels
    pub width: u32,

    /// Output frame height in pixels
    pub height: u32,

    /// Font file for the Arabic text overlays
    pub font_file: PathBuf,

    /// Font size for the verse text; translations render at 30% of this
    pub font_size: u32,

    /// Overlay text color as RGB
    pub text_color: (u8, u8, u8),

    /// Headless browser binary used to rasterize overlays. Explicit so no
    /// PATH mutation is needed on any platform.
    pub browser_path: PathBuf,

    /// Directory for intermediate overlay files
    pub overlay_dir: PathBuf,

    /// Final video path
    pub output_file: PathBuf,
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let config_paths = [
            "quran-video-maker.toml",
            "config/quran-video-maker.toml",
            "~/.config/quran-video-maker/config.toml",
        ];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str::<Config>(&config_str) {
                    Ok(config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        return Ok(config.with_env_overrides());
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::default().with_env_overrides())
    }

    /// Apply environment variable overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(api_key) = std::env::var("QVM_OPENAI_API_KEY") {
            self.llm.api_key = Some(api_key);
        }
        if let Ok(api_key) = std::env::var("QVM_PEXELS_API_KEY") {
            self.footage.api_key = Some(api_key);
        }
        if let Ok(data_dir) = std::env::var("QVM_DATA_DIR") {
            self.data.data_dir = PathBuf::from(data_dir);
        }
        if let Ok(browser) = std::env::var("QVM_BROWSER_PATH") {
            self.render.browser_path = PathBuf::from(browser);
        }
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.footage.api_key.is_none() {
            return Err(Error::Configuration(
                "Pexels API key required (footage.api_key or QVM_PEXELS_API_KEY)".to_string(),
            ));
        }
        match self.llm.provider {
            LLMProvider::OpenAI if self.llm.api_key.is_none() => {
                return Err(Error::Configuration(
                    "OpenAI API key required (llm.api_key or QVM_OPENAI_API_KEY)".to_string(),
                ));
            }
            LLMProvider::LMStudio if self.llm.endpoint.is_none() => {
                return Err(Error::Configuration(
                    "LMStudio endpoint required (llm.endpoint)".to_string(),
                ));
            }
            _ => {}
        }
        if self.render.width == 0 || self.render.height == 0 {
            return Err(Error::Configuration(
                "render dimensions must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Quran Video Maker Configuration:\n\
            - Reciter: {:?}\n\
            - LLM Provider: {:?} ({})\n\
            - Footage Quality: {:?}\n\
            - Selection: {:?}\n\
            - Output: {} ({}x{})",
            self.data.reciter,
            self.llm.provider,
            self.llm.model,
            self.footage.quality,
            self.footage.selection,
            self.render.output_file.display(),
            self.render.width,
            self.render.height,
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                data_dir: PathBuf::from("."),
                quran_file: PathBuf::from("data/quran/quran.json"),
                translation_file: PathBuf::from("data/quran/English wbw translation.json"),
                reciter: Reciter::MahmoudKhalilAlHusary,
            },
            llm: LLMConfig::default(),
            prompt: PromptConfig {
                template_file: None,
            },
            footage: FootageConfig {
                api_key: None,
                orientation: Some(VideoOrientation::Landscape),
                quality: VideoQuality::Hd,
                selection: SelectionMethod::Best,
                video_dir: PathBuf::from("temp/video"),
                timeout_seconds: 60,
            },
            audio: AudioConfig {
                audio_dir: PathBuf::from("temp/audio"),
                timeout_seconds: 60,
            },
            render: RenderConfig {
                width: 1920,
                height: 1080,
                font_file: PathBuf::from("data/fonts/quran.ttf"),
                font_size: 120,
                text_color: (255, 255, 255),
                browser_path: PathBuf::from("chromium"),
                overlay_dir: PathBuf::from("temp/overlays"),
                output_file: PathBuf::from("output/recitation.mp4"),
            },
        }
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_reciter(mut self, reciter: Reciter) -> Self {
        self.config.data.reciter = reciter;
        self
    }

    pub fn with_pexels_api_key(mut self, api_key: String) -> Self {
        self.config.footage.api_key = Some(api_key);
        self
    }

    pub fn with_llm_api_key(mut self, api_key: String) -> Self {
        self.config.llm.api_key = Some(api_key);
        self
    }

    pub fn with_selection(mut self, selection: SelectionMethod) -> Self {
        self.config.footage.selection = selection;
        self
    }

    pub fn with_output_file(mut self, path: PathBuf) -> Self {
        self.config.render.output_file = path;
        self
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.config.render.width = width;
        self.config.render.height = height;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data.reciter, Reciter::MahmoudKhalilAlHusary);
        assert_eq!(config.render.width, 1920);
        assert!(config.footage.api_key.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_reciter(Reciter::MuhammadAlMinshawi)
            .with_pexels_api_key("pexels-key".to_string())
            .with_llm_api_key("openai-key".to_string())
            .with_dimensions(1080, 1920)
            .build();

        assert_eq!(config.data.reciter, Reciter::MuhammadAlMinshawi);
        assert_eq!(config.render.height, 1920);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_requires_api_keys() {
        let config = Config::default();
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));

        let config = ConfigBuilder::new()
            .with_pexels_api_key("pexels-key".to_string())
            .build();
        // Pexels key alone is not enough with the OpenAI provider
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_env_overrides_applied() {
        std::env::set_var("QVM_DATA_DIR", "/srv/quran-data");
        let config = Config::default().with_env_overrides();
        std::env::remove_var("QVM_DATA_DIR");

        assert_eq!(config.data.data_dir, PathBuf::from("/srv/quran-data"));
    }

    #[test]
    fn test_timestamp_file_joins_data_dir() {
        let config = ConfigBuilder::new().build();
        let path = config.data.timestamp_file();
        assert!(path.to_string_lossy().contains("al-husary"));
    }

    #[tokio::test]
    async fn test_prompt_template_falls_back_to_default() {
        let prompt = PromptConfig {
            template_file: None,
        };
        let template = prompt.load_template().await.unwrap();
        assert!(template.contains("{quran_verse_data}"));
    }

    #[tokio::test]
    async fn test_prompt_template_missing_file_is_error() {
        let prompt = PromptConfig {
            template_file: Some(PathBuf::from("/nonexistent/prompt.txt")),
        };
        assert!(matches!(
            prompt.load_template().await,
            Err(Error::Configuration(_))
        ));
    }
}

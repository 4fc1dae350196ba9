//! Per-verse recitation audio: fetch the verse MP3s and join them into one
//! continuous file matching the timeline clock.

use crate::download;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use url::Url;

const COMBINED_AUDIO_FILE: &str = "combined_audio.mp3";

/// Downloads verse audio files and concatenates them with ffmpeg
pub struct AudioAssembler {
    client: reqwest::Client,
    audio_dir: PathBuf,
}

impl AudioAssembler {
    pub fn new(audio_dir: PathBuf, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self { client, audio_dir })
    }

    /// Local cache path for a verse audio URL: the URL's last directory
    /// segment keeps recitations from different reciters apart.
    pub fn local_path_for(&self, audio_url: &str) -> Result<PathBuf> {
        let parsed = Url::parse(audio_url)?;
        let segments: Vec<&str> = parsed
            .path_segments()
            .map(|s| s.filter(|part| !part.is_empty()).collect())
            .unwrap_or_default();

        let file_name = segments.last().copied().ok_or_else(|| {
            Error::DataNotFound(format!("audio URL has no file name: {}", audio_url))
        })?;
        let directory = if segments.len() >= 2 {
            segments[segments.len() - 2]
        } else {
            file_name
        };

        Ok(self.audio_dir.join(directory).join(file_name))
    }

    /// Fetch all verse audio files, skipping ones already on disk
    pub async fn fetch_all(&self, urls: &[String]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::with_capacity(urls.len());
        for url in urls {
            let path = self.local_path_for(url)?;
            download::download_if_missing(&self.client, url, &path).await?;
            files.push(path);
        }
        Ok(files)
    }

    /// Concatenate verse audio files, in sorted path order, into one MP3
    pub async fn concat(&self, mut files: Vec<PathBuf>) -> Result<PathBuf> {
        if files.is_empty() {
            return Err(Error::DataNotFound("no audio files to concatenate".to_string()));
        }
        files.sort();

        let list_path = self.audio_dir.join("concat_list.txt");
        let listing = files
            .iter()
            .map(|path| format!("file '{}'", path.display()))
            .collect::<Vec<_>>()
            .join("\n");
        tokio::fs::create_dir_all(&self.audio_dir).await?;
        tokio::fs::write(&list_path, listing).await?;

        let output_path = self.audio_dir.join(COMBINED_AUDIO_FILE);
        let status = run_ffmpeg_concat(&list_path, &output_path).await?;
        if !status.success() {
            return Err(Error::External(format!(
                "audio concatenation failed for {} file(s)",
                files.len()
            )));
        }

        info!("🎵 Combined {} audio file(s) -> {}", files.len(), output_path.display());
        Ok(output_path)
    }

    /// Fetch and concatenate in one step
    pub async fn fetch_and_concat(&self, urls: &[String]) -> Result<PathBuf> {
        let files = self.fetch_all(urls).await?;
        self.concat(files).await
    }
}

async fn run_ffmpeg_concat(list_path: &Path, output_path: &Path) -> Result<std::process::ExitStatus> {
    let list = list_path.to_string_lossy();
    let output = output_path.to_string_lossy();
    let status = tokio::process::Command::new("ffmpeg")
        .args([
            "-f",
            "concat",
            "-safe",
            "0",
            "-i",
            list.as_ref(),
            "-c",
            "copy",
            "-y",
            output.as_ref(),
        ])
        .status()
        .await?;
    Ok(status)
}

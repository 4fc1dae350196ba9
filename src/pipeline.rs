//! The strict linear assembly pipeline: load verses, build the timeline,
//! fetch audio, ask the suggestion agent, validate its plan, fetch footage
//! and render. Each stage completes before the next begins; a structurally
//! broken plan aborts the run before any compositing happens.

use crate::audio::AudioAssembler;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::footage::PexelsClient;
use crate::llm::{self, LLM};
use crate::quran::VerseLoader;
use crate::render::{OverlayRenderer, SegmentClip, VideoCompositor};
use crate::segments::{reconcile, VideoSegment};
use crate::suggestions::parse_suggestions;
use crate::timeline::Timeline;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use tracing::info;

/// Drives one recitation video build from verse range to final file
pub struct VideoAssembler {
    config: Config,
    llm: Box<dyn LLM>,
    pexels: PexelsClient,
}

impl VideoAssembler {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let llm = llm::create_llm(&config.llm)?;
        let api_key = config
            .footage
            .api_key
            .clone()
            .ok_or_else(|| Error::Configuration("Pexels API key required".to_string()))?;
        let pexels = PexelsClient::new(api_key, config.footage.timeout_seconds)?;
        Ok(Self {
            config,
            llm,
            pexels,
        })
    }

    /// Build the timeline and the reconciled segment plan, without touching
    /// footage or rendering. This is the whole planning phase.
    pub async fn plan(
        &self,
        surah: u32,
        verses: RangeInclusive<u32>,
    ) -> Result<(Timeline, Vec<VideoSegment>, Vec<String>)> {
        let loader = VerseLoader::open(&self.config.data).await?;
        let loaded = loader.load_range(surah, verses);
        if loaded.is_empty() {
            return Err(Error::DataNotFound(format!(
                "no verses could be loaded for surah {}",
                surah
            )));
        }

        let timeline = Timeline::build(surah, &loaded);
        let (t_start, t_end) = timeline
            .span()
            .ok_or_else(|| Error::DataNotFound("timeline has no timed words".to_string()))?;
        info!(
            "🕒 Timeline: {} word(s) spanning [{:.2}, {:.2})",
            timeline.len(),
            t_start,
            t_end
        );

        let template = self.config.prompt.load_template().await?;
        let raw = llm::suggest_segments(self.llm.as_ref(), &timeline, &template).await?;
        let suggestions = parse_suggestions(&raw)?;
        let plan = reconcile(&suggestions, t_start, t_end)?;
        info!("🎬 Plan: {} background segment(s)", plan.len());

        let audio_urls = Timeline::audio_urls(&loaded);
        Ok((timeline, plan, audio_urls))
    }

    /// Run the full pipeline and return the final video path
    pub async fn run(&self, surah: u32, verses: RangeInclusive<u32>) -> Result<PathBuf> {
        let (timeline, plan, audio_urls) = self.plan(surah, verses).await?;

        let audio = AudioAssembler::new(
            self.config.audio.audio_dir.clone(),
            self.config.audio.timeout_seconds,
        )?;
        let audio_path = audio.fetch_and_concat(&audio_urls).await?;

        let mut clips = Vec::with_capacity(plan.len());
        for segment in &plan {
            let min_duration = segment.duration().ceil() as u32;
            let path = self
                .pexels
                .select_and_download(
                    &segment.query,
                    self.config.footage.orientation,
                    self.config.footage.quality,
                    Some(min_duration),
                    self.config.footage.selection,
                    &self.config.footage.video_dir,
                )
                .await?;
            clips.push(SegmentClip {
                path,
                start_time: segment.start_time,
                end_time: segment.end_time,
            });
        }

        let renderer = OverlayRenderer::new(self.config.render.clone());
        let overlays = renderer.render_all(&timeline).await?;

        let compositor = VideoCompositor::new(self.config.render.clone());
        compositor
            .compose(&clips, &overlays, &audio_path, &self.config.render.output_file)
            .await?;

        Ok(self.config.render.output_file.clone())
    }
}

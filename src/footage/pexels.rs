use super::{SelectionMethod, VideoOrientation, VideoQuality};
use crate::download;
use crate::error::{Error, Result};
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

const PEXELS_VIDEO_API: &str = "https://api.pexels.com/videos";

/// Pexels video search response
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub videos: Vec<PexelsVideo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PexelsVideo {
    pub id: u64,
    /// Clip length in whole seconds
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub video_files: Vec<VideoFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoFile {
    pub link: String,
    pub quality: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Pexels video API client
#[derive(Clone)]
pub struct PexelsClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl PexelsClient {
    pub fn new(api_key: String, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            api_key,
            base_url: PEXELS_VIDEO_API.to_string(),
        })
    }

    /// Search for videos matching a query
    pub async fn search_videos(
        &self,
        query: &str,
        orientation: Option<VideoOrientation>,
        size: Option<VideoQuality>,
        page: u32,
        per_page: u32,
    ) -> Result<SearchResponse> {
        let mut params: Vec<(&str, String)> = vec![
            ("query", query.to_string()),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        if let Some(orientation) = orientation {
            params.push(("orientation", orientation.as_str().to_string()));
        }
        if let Some(size) = size {
            params.push(("size", size.search_size().to_string()));
        }

        debug!("Searching Pexels for '{}'", query);
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .header("Authorization", &self.api_key)
            .query(&params)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    /// Get details for a specific video
    pub async fn get_video(&self, video_id: u64) -> Result<PexelsVideo> {
        let response = self
            .client
            .get(format!("{}/videos/{}", self.base_url, video_id))
            .header("Authorization", &self.api_key)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    /// Search and pick one video.
    ///
    /// `min_duration` filters out clips too short to cover their segment.
    /// The selection strategy is caller-supplied; failing to match anything
    /// is `DataNotFound` so the caller can decide whether to retry with a
    /// different query.
    pub async fn select_video(
        &self,
        query: &str,
        orientation: Option<VideoOrientation>,
        size: Option<VideoQuality>,
        min_duration: Option<u32>,
        selection: SelectionMethod,
    ) -> Result<u64> {
        let results = self.search_videos(query, orientation, size, 1, 15).await?;

        let mut candidates = results.videos;
        if let Some(min_duration) = min_duration {
            candidates.retain(|video| video.duration >= min_duration);
        }
        if candidates.is_empty() {
            return Err(Error::DataNotFound(format!(
                "no footage matching '{}'",
                query
            )));
        }

        let chosen = match selection {
            SelectionMethod::Best => candidates.first(),
            SelectionMethod::Random => candidates.choose(&mut rand::thread_rng()),
            SelectionMethod::Offset(offset) => candidates.get(offset),
        }
        .ok_or_else(|| {
            Error::DataNotFound(format!(
                "selection offset past the {} result(s) for '{}'",
                candidates.len(),
                query
            ))
        })?;

        Ok(chosen.id)
    }

    /// Download a video by id into `output_dir`, preferring the requested
    /// quality and falling back to the largest available file. Skips the
    /// download when the derived filename already exists.
    pub async fn download_video(
        &self,
        video_id: u64,
        quality: VideoQuality,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        let video = self.get_video(video_id).await?;
        let file = choose_file(&video.video_files, quality.file_quality()).ok_or_else(|| {
            Error::DataNotFound(format!("video {} has no downloadable files", video_id))
        })?;

        let extension = download::extension_from_url(&file.link, ".mp4");
        let output_path = output_dir.join(format!("pexels_video_{}{}", video_id, extension));

        if download::download_if_missing(&self.client, &file.link, &output_path).await? {
            info!("🎥 Downloaded footage {} -> {}", video_id, output_path.display());
        }
        Ok(output_path)
    }

    /// Search, select and download in one step
    pub async fn select_and_download(
        &self,
        query: &str,
        orientation: Option<VideoOrientation>,
        quality: VideoQuality,
        min_duration: Option<u32>,
        selection: SelectionMethod,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        let video_id = self
            .select_video(query, orientation, Some(quality), min_duration, selection)
            .await?;
        self.download_video(video_id, quality, output_dir).await
    }
}

/// Pick the file with the requested quality label, else the largest by area
fn choose_file<'a>(files: &'a [VideoFile], quality: &str) -> Option<&'a VideoFile> {
    files
        .iter()
        .find(|file| file.quality.as_deref() == Some(quality))
        .or_else(|| {
            files.iter().max_by_key(|file| {
                file.width.unwrap_or(0) as u64 * file.height.unwrap_or(0) as u64
            })
        })
}

//! Streaming file downloads with filename-based idempotency.
//!
//! Downloads are keyed by derived filenames: when the target file already
//! exists it is reused without re-verification. A stale or partial file
//! under the same name is therefore reused too; content-addressed caching
//! would be the stronger policy.

use crate::error::Result;
use futures::StreamExt;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;

/// Stream a remote file to `dest`, creating parent directories as needed
pub async fn download_file(client: &reqwest::Client, url: &str, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    info!("⬇️ Downloading {} -> {}", url, dest.display());
    let response = client.get(url).send().await?.error_for_status()?;

    let mut file = tokio::fs::File::create(dest).await?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }
    file.flush().await?;

    Ok(())
}

/// Download unless the target file already exists. Returns whether a
/// download actually happened.
pub async fn download_if_missing(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
) -> Result<bool> {
    if dest.exists() {
        debug!("Reusing existing file: {}", dest.display());
        return Ok(false);
    }
    download_file(client, url, dest).await?;
    Ok(true)
}

/// Last path segment of a URL, used to derive cache filenames
pub fn filename_from_url(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;
    let name = parsed
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|s| !s.is_empty())
        .unwrap_or("downloaded_file");
    Ok(name.to_string())
}

/// File extension of a URL path, with a leading dot, or the default
pub fn extension_from_url(url: &str, default: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|segments| segments.last().map(str::to_string))
        })
        .and_then(|name| {
            name.rsplit_once('.')
                .map(|(_, ext)| format!(".{}", ext))
        })
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_from_url() {
        let name = filename_from_url("https://cdn.example.com/husary/001001.mp3").unwrap();
        assert_eq!(name, "001001.mp3");
    }

    #[test]
    fn test_filename_from_url_without_path() {
        let name = filename_from_url("https://cdn.example.com/").unwrap();
        assert_eq!(name, "downloaded_file");
    }

    #[test]
    fn test_extension_from_url() {
        assert_eq!(
            extension_from_url("https://videos.example.com/clip/4812.mp4?dl=1", ".mp4"),
            ".mp4"
        );
        assert_eq!(
            extension_from_url("https://videos.example.com/clip/4812", ".mp4"),
            ".mp4"
        );
    }

    #[test]
    fn test_invalid_url_is_error() {
        assert!(filename_from_url("not a url").is_err());
    }
}

use std::path::PathBuf;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the video assembly pipeline
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("data not found: {0}")]
    DataNotFound(String),

    #[error("suggestion format error: {0}")]
    SuggestionFormat(String),

    #[error("invalid segment order: {0}")]
    InvalidSegmentOrder(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("external command failed: {0}")]
    External(String),

    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),
}

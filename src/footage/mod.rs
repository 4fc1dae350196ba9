//! Stock-footage layer: Pexels search/download client and the selection
//! strategies callers can plug into it.

pub mod pexels;

use serde::{Deserialize, Serialize};

pub use pexels::{PexelsClient, PexelsVideo, SearchResponse, VideoFile};

/// Search orientation constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoOrientation {
    Landscape,
    Portrait,
    Square,
}

impl VideoOrientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoOrientation::Landscape => "landscape",
            VideoOrientation::Portrait => "portrait",
            VideoOrientation::Square => "square",
        }
    }
}

/// Minimum video size for searches. The values are the Pexels `size`
/// parameter names, which do not match the marketing terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoQuality {
    Hd,
    FullHd,
    Uhd,
}

impl VideoQuality {
    /// Pexels search `size` parameter value
    pub fn search_size(&self) -> &'static str {
        match self {
            VideoQuality::Hd => "small",
            VideoQuality::FullHd => "medium",
            VideoQuality::Uhd => "large",
        }
    }

    /// Quality label carried on downloadable video files
    pub fn file_quality(&self) -> &'static str {
        match self {
            VideoQuality::Hd => "hd",
            VideoQuality::FullHd => "hd",
            VideoQuality::Uhd => "uhd",
        }
    }
}

/// How to pick one video out of the search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMethod {
    /// First result, usually the best match
    Best,
    /// Uniformly random result
    Random,
    /// Result at a fixed offset into the list
    Offset(usize),
}

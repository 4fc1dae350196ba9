/// Quran Video Maker
///
/// Assembles short recitation videos: aligns recitation audio word-by-word
/// with verse text, asks a language model for background-footage segments,
/// fetches matching stock clips and renders word-timed text overlays.

pub mod audio;
pub mod config;
pub mod download;
pub mod error;
pub mod footage;
pub mod llm;
pub mod pipeline;
pub mod quran;
pub mod render;
pub mod segments;
pub mod suggestions;
pub mod timeline;

// Re-export main types for easy access
pub use crate::audio::AudioAssembler;
pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{Error, Result};
pub use crate::footage::{PexelsClient, SelectionMethod, VideoOrientation, VideoQuality};
pub use crate::llm::{create_llm, LLMConfig, LLMProvider, LLM};
pub use crate::pipeline::VideoAssembler;
pub use crate::quran::{LoadedVerse, Reciter, VerseLoader};
pub use crate::render::{OverlayRenderer, VideoCompositor};
pub use crate::segments::{reconcile, VideoSegment};
pub use crate::suggestions::{parse_suggestions, SegmentSuggestion};
pub use crate::timeline::{Timeline, WordRecord};

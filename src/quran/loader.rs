use super::sources::{QuranTextStore, TimestampStore, TranslationStore};
use crate::config::DataConfig;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use tracing::{debug, info, warn};

/// One verse joined across the three data stores, ready for timeline
/// construction. Timestamps are still local to this verse's audio.
#[derive(Debug, Clone)]
pub struct LoadedVerse {
    pub verse: u32,
    /// Whitespace-split display words
    pub words: Vec<String>,
    /// `(word_position, local_start, local_end)` triples, 1-based positions
    pub segments: Vec<(u32, f64, f64)>,
    /// Per-word translations keyed by word position
    pub translations: HashMap<u32, String>,
    pub audio_url: String,
    /// Declared audio duration, absent in older data files
    pub duration: Option<f64>,
}

/// Joins the verse-text, timestamp and translation stores for a verse range
pub struct VerseLoader {
    text: QuranTextStore,
    timestamps: TimestampStore,
    translations: TranslationStore,
}

impl VerseLoader {
    /// Open the three JSON stores named by the data configuration
    pub async fn open(config: &DataConfig) -> Result<Self> {
        let text = QuranTextStore::load(&config.quran_file).await?;
        let timestamps = TimestampStore::load(&config.timestamp_file()).await?;
        let translations = TranslationStore::load(&config.translation_file).await?;
        Ok(Self {
            text,
            timestamps,
            translations,
        })
    }

    /// Load a single verse, failing when it is absent from the text or
    /// timestamp store. A missing individual word translation is not an
    /// error; the word simply carries no translation.
    pub fn load_verse(&self, surah: u32, verse: u32) -> Result<LoadedVerse> {
        let words = self.text.verse_words(surah, verse).ok_or_else(|| {
            Error::DataNotFound(format!("verse {}:{} not in Quran text", surah, verse))
        })?;

        let timed = self.timestamps.verse(surah, verse).ok_or_else(|| {
            Error::DataNotFound(format!("timestamps for {}:{} not found", surah, verse))
        })?;

        let mut translations = HashMap::new();
        for &(position, _, _) in &timed.segments {
            match self.translations.word(surah, verse, position) {
                Some(text) => {
                    translations.insert(position, text.to_string());
                }
                None => debug!("No translation for {}:{}:{}", surah, verse, position),
            }
        }

        Ok(LoadedVerse {
            verse,
            words,
            segments: timed.segments.clone(),
            translations,
            audio_url: timed.audio_url.clone(),
            duration: timed.duration,
        })
    }

    /// Load an inclusive verse range. Verses missing from any store are
    /// skipped with a warning so one bad verse does not fail the run.
    pub fn load_range(&self, surah: u32, verses: RangeInclusive<u32>) -> Vec<LoadedVerse> {
        let mut loaded = Vec::new();
        for verse in verses {
            match self.load_verse(surah, verse) {
                Ok(entry) => loaded.push(entry),
                Err(e) => warn!("Skipping verse {}:{}: {}", surah, verse, e),
            }
        }
        info!("📖 Loaded {} verse(s) from surah {}", loaded.len(), surah);
        loaded
    }
}

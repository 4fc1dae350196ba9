use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Reciters with bundled word-level timestamp data.
///
/// Each variant maps to the JSON file carrying the timestamp segments for
/// that reciter's recitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reciter {
    MahmoudKhalilAlHusary,
    MuhammadAlMinshawi,
}

impl Reciter {
    /// Relative path of the timestamp JSON file for this reciter
    pub fn timestamp_file(&self) -> &'static str {
        match self {
            Reciter::MahmoudKhalilAlHusary => {
                "data/audio/ayah-recitation-mahmoud-khalil-al-husary-murattal-hafs-957_updated.json"
            }
            Reciter::MuhammadAlMinshawi => {
                "data/audio/ayah-recitation-muhammad-siddiq-al-minshawi-murattal-hafs-959_updated.json"
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct VerseText {
    #[serde(rename = "displayText")]
    display_text: String,
}

/// Verse display text keyed by surah then verse number
#[derive(Debug, Clone)]
pub struct QuranTextStore {
    surahs: HashMap<String, HashMap<String, VerseText>>,
}

impl QuranTextStore {
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|_| Error::MissingFile(path.to_path_buf()))?;
        let surahs = serde_json::from_str(&content)?;
        Ok(Self { surahs })
    }

    /// Whitespace-split words of one verse, in display order
    pub fn verse_words(&self, surah: u32, verse: u32) -> Option<Vec<String>> {
        let text = &self
            .surahs
            .get(&surah.to_string())?
            .get(&verse.to_string())?
            .display_text;
        Some(text.split_whitespace().map(str::to_string).collect())
    }
}

/// Timestamp data for one verse's recitation audio.
///
/// Segments are `[word_position, start, end]` triples local to this verse's
/// audio; `word_position` is 1-based. `duration` is the declared length of
/// the audio and may be absent in older data files.
#[derive(Debug, Clone, Deserialize)]
pub struct TimedVerse {
    pub segments: Vec<(u32, f64, f64)>,
    pub audio_url: String,
    pub duration: Option<f64>,
}

/// Per-verse timestamp segments keyed by `"surah:verse"`
#[derive(Debug, Clone)]
pub struct TimestampStore {
    verses: HashMap<String, TimedVerse>,
}

impl TimestampStore {
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|_| Error::MissingFile(path.to_path_buf()))?;
        let verses = serde_json::from_str(&content)?;
        Ok(Self { verses })
    }

    pub fn verse(&self, surah: u32, verse: u32) -> Option<&TimedVerse> {
        self.verses.get(&format!("{}:{}", surah, verse))
    }
}

/// Word-by-word translations keyed by `"surah:verse:word_position"`
#[derive(Debug, Clone)]
pub struct TranslationStore {
    words: HashMap<String, String>,
}

impl TranslationStore {
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|_| Error::MissingFile(path.to_path_buf()))?;
        let words = serde_json::from_str(&content)?;
        Ok(Self { words })
    }

    pub fn word(&self, surah: u32, verse: u32, position: u32) -> Option<&str> {
        self.words
            .get(&format!("{}:{}:{}", surah, verse, position))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_text_store_splits_words() {
        let file = write_temp(r#"{"1": {"1": {"displayText": "بِسْمِ اللَّهِ الرَّحْمَنِ الرَّحِيمِ"}}}"#);
        let store = QuranTextStore::load(file.path()).await.unwrap();

        let words = store.verse_words(1, 1).unwrap();
        assert_eq!(words.len(), 4);
        assert_eq!(words[0], "بِسْمِ");
        assert!(store.verse_words(1, 2).is_none());
    }

    #[tokio::test]
    async fn test_timestamp_store_lookup() {
        let file = write_temp(
            r#"{"1:1": {"segments": [[1, 0.0, 0.48], [2, 0.48, 1.0]], "audio_url": "https://cdn.example.com/husary/001001.mp3", "duration": null}}"#,
        );
        let store = TimestampStore::load(file.path()).await.unwrap();

        let verse = store.verse(1, 1).unwrap();
        assert_eq!(verse.segments.len(), 2);
        assert_eq!(verse.segments[0], (1, 0.0, 0.48));
        assert!(verse.duration.is_none());
        assert!(store.verse(1, 2).is_none());
    }

    #[tokio::test]
    async fn test_translation_store_lookup() {
        let file = write_temp(r#"{"1:1:1": "In (the) name", "1:1:2": "(of) Allah"}"#);
        let store = TranslationStore::load(file.path()).await.unwrap();

        assert_eq!(store.word(1, 1, 1), Some("In (the) name"));
        assert!(store.word(1, 1, 3).is_none());
    }

    #[tokio::test]
    async fn test_missing_file_error() {
        let result = QuranTextStore::load(Path::new("/nonexistent/quran.json")).await;
        assert!(matches!(result, Err(Error::MissingFile(_))));
    }
}

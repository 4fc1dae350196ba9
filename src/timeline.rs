use crate::error::Result;
use crate::quran::LoadedVerse;
use serde::Serialize;
use tracing::debug;

/// One recited word with absolute timing on the recitation clock.
///
/// Times are seconds from the start of the combined recitation audio.
/// `word_position` is the 1-based index of the word within its verse.
#[derive(Debug, Clone, Serialize)]
pub struct WordRecord {
    pub text: String,
    pub surah: u32,
    pub verse: u32,
    pub word_position: u32,
    pub start_time: f64,
    pub end_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}

/// Ordered word records for a verse range, on one continuous clock.
///
/// Built once per run; verse-major, word-position-major order, which equals
/// chronological order by construction.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    words: Vec<WordRecord>,
}

impl Timeline {
    /// Merge per-verse word/segment/translation data into one absolute-time
    /// sequence. Verses must arrive in increasing verse order.
    ///
    /// A running offset turns each verse's locally zero-based timestamps into
    /// absolute times. The offset advances by the verse's declared audio
    /// duration when known, otherwise by the last emitted word's absolute end
    /// time, which can drift when the final timestamp segment stops short of
    /// the verse audio's true end.
    pub fn build(surah: u32, verses: &[LoadedVerse]) -> Self {
        let mut words: Vec<WordRecord> = Vec::new();
        let mut offset = 0.0_f64;
        let mut last_end = 0.0_f64;

        for verse in verses {
            for (i, &(position, local_start, local_end)) in verse.segments.iter().enumerate() {
                // More segments than words: drop the excess silently
                if i >= verse.words.len() {
                    debug!(
                        "Verse {}:{} has {} segments for {} words, truncating",
                        surah,
                        verse.verse,
                        verse.segments.len(),
                        verse.words.len()
                    );
                    break;
                }
                // Positions are 1-based
                let Some(text) = verse.words.get(position.saturating_sub(1) as usize) else {
                    continue;
                };

                let record = WordRecord {
                    text: text.clone(),
                    surah,
                    verse: verse.verse,
                    word_position: position,
                    start_time: local_start + offset,
                    end_time: local_end + offset,
                    translation: verse.translations.get(&position).cloned(),
                };
                last_end = record.end_time;
                words.push(record);
            }

            offset += verse.duration.unwrap_or(last_end);
        }

        Self { words }
    }

    pub fn words(&self) -> &[WordRecord] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Overall `(start, end)` span of the timeline, `None` when empty
    pub fn span(&self) -> Option<(f64, f64)> {
        let first = self.words.first()?;
        let last = self.words.last()?;
        Some((first.start_time, last.end_time))
    }

    /// Audio URL of each verse, in verse order, for the audio stage
    pub fn audio_urls(verses: &[LoadedVerse]) -> Vec<String> {
        verses.iter().map(|v| v.audio_url.clone()).collect()
    }

    /// Word records serialized as the prompt payload for the suggestion agent
    pub fn prompt_payload(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.words)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn verse(
        number: u32,
        words: &[&str],
        segments: &[(u32, f64, f64)],
        duration: Option<f64>,
    ) -> LoadedVerse {
        LoadedVerse {
            verse: number,
            words: words.iter().map(|w| w.to_string()).collect(),
            segments: segments.to_vec(),
            translations: HashMap::new(),
            audio_url: format!("https://cdn.example.com/audio/00100{}.mp3", number),
            duration,
        }
    }

    #[test]
    fn test_single_verse_keeps_local_times() {
        let verses = vec![verse(
            1,
            &["بِسْمِ", "اللَّهِ", "الرَّحْمَنِ", "الرَّحِيمِ"],
            &[(1, 0.0, 0.48), (2, 0.48, 1.0), (3, 1.0, 2.16), (4, 2.16, 5.16)],
            Some(5.16),
        )];

        let timeline = Timeline::build(1, &verses);
        assert_eq!(timeline.len(), 4);
        assert_eq!(timeline.words()[0].start_time, 0.0);
        assert_eq!(timeline.words()[3].end_time, 5.16);
        assert_eq!(timeline.span(), Some((0.0, 5.16)));
    }

    #[test]
    fn test_offset_uses_declared_duration() {
        let verses = vec![
            verse(1, &["a", "b"], &[(1, 0.0, 1.0), (2, 1.0, 2.0)], Some(3.0)),
            verse(2, &["c", "d"], &[(1, 0.0, 1.5), (2, 1.5, 2.5)], Some(2.5)),
        ];

        let timeline = Timeline::build(1, &verses);
        // Verse 2 starts after verse 1's declared 3.0s of audio, not after
        // its last word at 2.0s
        assert_eq!(timeline.words()[2].start_time, 3.0);
        assert_eq!(timeline.words()[3].end_time, 5.5);
    }

    #[test]
    fn test_offset_falls_back_to_last_word_end() {
        let verses = vec![
            verse(1, &["a", "b"], &[(1, 0.0, 1.0), (2, 1.0, 2.0)], None),
            verse(2, &["c"], &[(1, 0.0, 1.0)], Some(1.0)),
        ];

        let timeline = Timeline::build(1, &verses);
        // No declared duration: verse 2 continues from verse 1's last word end
        assert_eq!(timeline.words()[2].start_time, 2.0);
        assert_eq!(timeline.words()[2].end_time, 3.0);
    }

    #[test]
    fn test_output_is_time_monotonic() {
        let verses = vec![
            verse(
                1,
                &["a", "b", "c"],
                &[(1, 0.0, 0.5), (2, 0.5, 1.2), (3, 1.2, 2.0)],
                Some(2.4),
            ),
            verse(2, &["d", "e"], &[(1, 0.0, 0.8), (2, 0.8, 1.6)], None),
            verse(3, &["f"], &[(1, 0.0, 1.1)], Some(1.5)),
        ];

        let timeline = Timeline::build(1, &verses);
        let words = timeline.words();
        for pair in words.windows(2) {
            assert!(
                pair[0].end_time <= pair[1].start_time,
                "{} ends at {} after {} starts at {}",
                pair[0].text,
                pair[0].end_time,
                pair[1].text,
                pair[1].start_time
            );
        }
    }

    #[test]
    fn test_verse_offset_continuity() {
        let verses = vec![
            verse(1, &["a", "b"], &[(1, 0.0, 1.0), (2, 1.0, 2.2)], Some(2.5)),
            verse(2, &["c", "d"], &[(1, 0.1, 0.9), (2, 0.9, 1.8)], Some(2.0)),
        ];

        let timeline = Timeline::build(1, &verses);
        let words = timeline.words();
        let verse_one_end = words
            .iter()
            .filter(|w| w.verse == 1)
            .map(|w| w.end_time)
            .fold(0.0, f64::max);
        let verse_two_start = words
            .iter()
            .find(|w| w.verse == 2)
            .map(|w| w.start_time)
            .unwrap();
        assert!(verse_two_start >= verse_one_end);
    }

    #[test]
    fn test_excess_segments_are_truncated() {
        let verses = vec![verse(
            1,
            &["a", "b"],
            &[(1, 0.0, 0.5), (2, 0.5, 1.0), (3, 1.0, 1.5)],
            Some(1.5),
        )];

        let timeline = Timeline::build(1, &verses);
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.words()[1].word_position, 2);
    }

    #[test]
    fn test_empty_input() {
        let timeline = Timeline::build(1, &[]);
        assert!(timeline.is_empty());
        assert!(timeline.span().is_none());
    }

    #[test]
    fn test_prompt_payload_serializes_words() {
        let mut translations = HashMap::new();
        translations.insert(1, "In (the) name".to_string());
        let verses = vec![LoadedVerse {
            verse: 1,
            words: vec!["بِسْمِ".to_string()],
            segments: vec![(1, 0.0, 0.48)],
            translations,
            audio_url: "https://cdn.example.com/audio/001001.mp3".to_string(),
            duration: Some(0.48),
        }];

        let timeline = Timeline::build(1, &verses);
        let payload = timeline.prompt_payload().unwrap();
        assert!(payload.contains("بِسْمِ"));
        assert!(payload.contains("In (the) name"));
        assert!(payload.contains("word_position"));
    }
}

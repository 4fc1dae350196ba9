//! Prompt construction for the background-video suggestion agent.

use crate::error::{Error, Result};
use crate::timeline::Timeline;

/// Slot in the template that receives the serialized timeline
pub const PAYLOAD_PLACEHOLDER: &str = "{quran_verse_data}";

/// Default planning prompt. Overridable with a template file via
/// `PromptConfig`; a custom template must keep the payload placeholder and
/// the `<video>` output format the parser expects.
pub const DEFAULT_TEMPLATE: &str = r#"You are an experienced Islamic video editor helping Muslims create Quran recitation videos. Given word-by-word verse data with timings, suggest background-video search terms and the time range each clip should cover.

Follow these steps:
1. Consider the meaning and context of the words in each verse.
2. Pick background footage that complements the verses without violating the rules below.
3. If no appropriate footage exists or the idea is too specific, fall back to general nature, object or animal scenes.
4. Align every cut with a word boundary and make the cuts cinematic.
5. Cover every timed word with exactly one video; do not cover silence that carries no words.

Selection rules:
1. Search for concrete things, never concepts or abstract ideas.
2. Never suggest footage of people, body parts, or clothing.
3. Avoid footage that conflicts with Islamic values.
4. If a scene relates to worship, add "islam" to the search query.
5. Avoid queries likely to return people, such as "marketplace", "crowd" or "family".

Timing rules:
1. The first segment starts at the first word's start time.
2. The last segment ends at the last word's end time.
3. Segment boundaries fall on word timings.

Output format, repeated once per suggested clip, with no other markup:

<video>
  <query>background video search term</query>
  <start>start time in seconds</start>
  <end>end time in seconds</end>
</video>

Here is the verse data:

<quran_verse_data>
{quran_verse_data}
</quran_verse_data>
"#;

/// Substitute the serialized timeline into the template
pub fn render_prompt(template: &str, timeline: &Timeline) -> Result<String> {
    if !template.contains(PAYLOAD_PLACEHOLDER) {
        return Err(Error::Configuration(format!(
            "prompt template is missing the {} placeholder",
            PAYLOAD_PLACEHOLDER
        )));
    }
    let payload = timeline.prompt_payload()?;
    Ok(template.replace(PAYLOAD_PLACEHOLDER, &payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quran::LoadedVerse;
    use std::collections::HashMap;

    fn one_word_timeline() -> Timeline {
        let verses = vec![LoadedVerse {
            verse: 1,
            words: vec!["بِسْمِ".to_string()],
            segments: vec![(1, 0.0, 0.48)],
            translations: HashMap::new(),
            audio_url: "https://cdn.example.com/audio/001001.mp3".to_string(),
            duration: Some(0.48),
        }];
        Timeline::build(1, &verses)
    }

    #[test]
    fn test_render_substitutes_payload() {
        let rendered = render_prompt(DEFAULT_TEMPLATE, &one_word_timeline()).unwrap();
        assert!(rendered.contains("بِسْمِ"));
        assert!(!rendered.contains(PAYLOAD_PLACEHOLDER));
        assert!(rendered.contains("<video>"));
    }

    #[test]
    fn test_template_without_placeholder_rejected() {
        let result = render_prompt("suggest some videos", &one_word_timeline());
        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}

//! Parsing of the suggestion agent's output into typed segment proposals.
//!
//! The agent returns free text expected to embed repeated
//! `<video><query>..</query><start>..</start><end>..</end></video>` elements.
//! The text is untrusted: it is parsed as an HTML fragment, which tolerates
//! surrounding prose and sloppy markup, and only the `video` elements are
//! extracted.

use crate::error::{Error, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// A background-video proposal as produced by the agent, unvalidated
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSuggestion {
    pub query: String,
    pub start_time: f64,
    pub end_time: f64,
}

/// Parse agent output into suggestions.
///
/// Fails with `SuggestionFormat` when no `video` element is present, a
/// required child is missing or empty, or a time field is non-numeric. A
/// malformed plan cannot safely drive rendering, so nothing is recovered.
pub fn parse_suggestions(raw: &str) -> Result<Vec<SegmentSuggestion>> {
    let video_selector = selector("video")?;
    let query_selector = selector("query")?;
    let start_selector = selector("start")?;
    let end_selector = selector("end")?;

    let fragment = Html::parse_fragment(raw);
    let mut suggestions = Vec::new();

    for element in fragment.select(&video_selector) {
        let query = child_text(element, &query_selector)
            .ok_or_else(|| Error::SuggestionFormat("video element missing <query>".to_string()))?;
        let start_time = parse_seconds(&child_text(element, &start_selector).ok_or_else(
            || Error::SuggestionFormat(format!("video '{}' missing <start>", query)),
        )?)?;
        let end_time = parse_seconds(&child_text(element, &end_selector).ok_or_else(
            || Error::SuggestionFormat(format!("video '{}' missing <end>", query)),
        )?)?;

        suggestions.push(SegmentSuggestion {
            query,
            start_time,
            end_time,
        });
    }

    if suggestions.is_empty() {
        return Err(Error::SuggestionFormat(
            "no <video> elements found in agent output".to_string(),
        ));
    }

    debug!("Parsed {} segment suggestion(s)", suggestions.len());
    Ok(suggestions)
}

fn selector(name: &str) -> Result<Selector> {
    Selector::parse(name)
        .map_err(|e| Error::SuggestionFormat(format!("bad selector {}: {}", name, e)))
}

/// Trimmed text of the first matching child, `None` when absent or empty
fn child_text(element: ElementRef, selector: &Selector) -> Option<String> {
    let text: String = element.select(selector).next()?.text().collect();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn parse_seconds(value: &str) -> Result<f64> {
    let seconds = value
        .parse::<f64>()
        .map_err(|_| Error::SuggestionFormat(format!("non-numeric time value: '{}'", value)))?;
    // "NaN" and "inf" parse successfully but cannot be ordered
    if !seconds.is_finite() {
        return Err(Error::SuggestionFormat(format!(
            "non-finite time value: '{}'",
            value
        )));
    }
    Ok(seconds)
}

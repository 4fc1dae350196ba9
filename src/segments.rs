//! Coverage reconciliation: turning proposed segments into a plan that
//! exactly tiles the timeline span, with no gap and no overlap. Downstream
//! compositing assumes continuous background coverage.

use crate::error::{Error, Result};
use crate::suggestions::SegmentSuggestion;
use tracing::debug;

/// A reconciled background-clip interval.
///
/// Invariants: `start_time < end_time`, the list is sorted by start time,
/// and the union of `[start_time, end_time)` over the list equals the
/// timeline span it was reconciled against.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSegment {
    pub query: String,
    pub start_time: f64,
    pub end_time: f64,
}

impl VideoSegment {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// Reconcile suggestions against the timeline span `[t_start, t_end)`.
///
/// Suggestions are sorted by start time, the first is clamped back to
/// `t_start` and the last forward to `t_end`. At each boundary the earlier
/// segment's stated end wins: a gap is closed by extending the earlier
/// segment, an overlap by pushing the later segment's start forward. A
/// segment entirely absorbed by its neighbors is dropped. Re-running on the
/// output yields the output unchanged.
pub fn reconcile(
    suggestions: &[SegmentSuggestion],
    t_start: f64,
    t_end: f64,
) -> Result<Vec<VideoSegment>> {
    if suggestions.is_empty() {
        return Err(Error::InvalidSegmentOrder(
            "no segments to reconcile".to_string(),
        ));
    }
    for suggestion in suggestions {
        // NaN compares false against everything, so check finiteness first
        if !suggestion.start_time.is_finite() || !suggestion.end_time.is_finite() {
            return Err(Error::InvalidSegmentOrder(format!(
                "segment '{}' has a non-finite boundary",
                suggestion.query
            )));
        }
        if suggestion.end_time <= suggestion.start_time {
            return Err(Error::InvalidSegmentOrder(format!(
                "segment '{}' ends at {} but starts at {}",
                suggestion.query, suggestion.end_time, suggestion.start_time
            )));
        }
    }

    let mut ordered = suggestions.to_vec();
    ordered.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

    let mut segments: Vec<VideoSegment> = Vec::new();
    for suggestion in ordered {
        let mut start = suggestion.start_time;
        let end = suggestion.end_time;

        match segments.last_mut() {
            None => start = t_start,
            Some(previous) => {
                if previous.end_time < start {
                    // Gap: the earlier segment extends to the boundary
                    debug!(
                        "Closing gap [{}, {}) by extending '{}'",
                        previous.end_time, start, previous.query
                    );
                    previous.end_time = start;
                } else {
                    // Overlap (or exact fit): the later segment is pushed forward
                    start = previous.end_time;
                }
            }
        }

        if start >= end {
            debug!("Dropping absorbed segment '{}'", suggestion.query);
            continue;
        }
        segments.push(VideoSegment {
            query: suggestion.query,
            start_time: start,
            end_time: end,
        });
    }

    // Clamp the tail to the timeline end, dropping segments that now lie
    // entirely past it
    while segments
        .last()
        .is_some_and(|last| last.start_time >= t_end)
    {
        if let Some(dropped) = segments.pop() {
            debug!("Dropping out-of-span segment '{}'", dropped.query);
        }
    }
    if let Some(last) = segments.last_mut() {
        last.end_time = t_end;
    }

    if segments.is_empty() {
        return Err(Error::InvalidSegmentOrder(format!(
            "no segment overlaps the timeline span [{}, {})",
            t_start, t_end
        )));
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(query: &str, start_time: f64, end_time: f64) -> SegmentSuggestion {
        SegmentSuggestion {
            query: query.to_string(),
            start_time,
            end_time,
        }
    }

    fn assert_covers(segments: &[VideoSegment], t_start: f64, t_end: f64) {
        assert_eq!(segments.first().unwrap().start_time, t_start);
        assert_eq!(segments.last().unwrap().end_time, t_end);
        for pair in segments.windows(2) {
            assert_eq!(
                pair[0].end_time, pair[1].start_time,
                "'{}' and '{}' do not meet exactly",
                pair[0].query, pair[1].query
            );
        }
        for segment in segments {
            assert!(segment.start_time < segment.end_time);
        }
    }

    #[test]
    fn test_gap_closed_by_extending_earlier_segment() {
        let suggestions = vec![suggestion("sky", 0.0, 4.0), suggestion("ocean", 6.0, 11.4)];

        let segments = reconcile(&suggestions, 0.0, 11.4).unwrap();
        assert_eq!(
            segments,
            vec![
                VideoSegment {
                    query: "sky".to_string(),
                    start_time: 0.0,
                    end_time: 6.0,
                },
                VideoSegment {
                    query: "ocean".to_string(),
                    start_time: 6.0,
                    end_time: 11.4,
                },
            ]
        );
    }

    #[test]
    fn test_overlap_resolved_earlier_wins() {
        let suggestions = vec![suggestion("a", 0.0, 5.0), suggestion("b", 4.0, 10.0)];

        let segments = reconcile(&suggestions, 0.0, 10.0).unwrap();
        assert_eq!(segments[0].end_time, 5.0);
        assert_eq!(segments[1].start_time, 5.0);
        assert_eq!(segments[1].end_time, 10.0);
    }

    #[test]
    fn test_boundaries_clamped_to_span() {
        let suggestions = vec![suggestion("dunes", 0.5, 6.0), suggestion("stars", 6.0, 10.0)];

        let segments = reconcile(&suggestions, 0.0, 11.4).unwrap();
        assert_covers(&segments, 0.0, 11.4);
    }

    #[test]
    fn test_unsorted_input_is_sorted_first() {
        let suggestions = vec![
            suggestion("late", 6.0, 11.4),
            suggestion("early", 0.0, 6.0),
        ];

        let segments = reconcile(&suggestions, 0.0, 11.4).unwrap();
        assert_eq!(segments[0].query, "early");
        assert_eq!(segments[1].query, "late");
        assert_covers(&segments, 0.0, 11.4);
    }

    #[test]
    fn test_absorbed_segment_is_dropped() {
        // "b" is fully inside "a", so the earlier segment swallows it
        let suggestions = vec![
            suggestion("a", 0.0, 6.0),
            suggestion("b", 2.0, 5.0),
            suggestion("c", 6.0, 10.0),
        ];

        let segments = reconcile(&suggestions, 0.0, 10.0).unwrap();
        let queries: Vec<&str> = segments.iter().map(|s| s.query.as_str()).collect();
        assert_eq!(queries, vec!["a", "c"]);
        assert_covers(&segments, 0.0, 10.0);
    }

    #[test]
    fn test_reversed_times_rejected() {
        let suggestions = vec![suggestion("bad", 5.0, 3.0)];

        let result = reconcile(&suggestions, 0.0, 10.0);
        assert!(matches!(result, Err(Error::InvalidSegmentOrder(_))));
    }

    #[test]
    fn test_non_finite_boundary_rejected() {
        let suggestions = vec![suggestion("bad", f64::NAN, 3.0)];
        let result = reconcile(&suggestions, 0.0, 10.0);
        assert!(matches!(result, Err(Error::InvalidSegmentOrder(_))));

        let suggestions = vec![suggestion("bad", 0.0, f64::INFINITY)];
        let result = reconcile(&suggestions, 0.0, 10.0);
        assert!(matches!(result, Err(Error::InvalidSegmentOrder(_))));
    }

    #[test]
    fn test_empty_input_rejected() {
        let result = reconcile(&[], 0.0, 10.0);
        assert!(matches!(result, Err(Error::InvalidSegmentOrder(_))));
    }

    #[test]
    fn test_totality_over_messy_input() {
        let suggestions = vec![
            suggestion("a", 1.0, 3.5),
            suggestion("b", 3.0, 4.0),
            suggestion("c", 7.0, 9.0),
            suggestion("d", 9.5, 14.0),
        ];

        let segments = reconcile(&suggestions, 0.0, 12.0).unwrap();
        assert_covers(&segments, 0.0, 12.0);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let suggestions = vec![
            suggestion("a", 0.5, 3.0),
            suggestion("b", 4.0, 8.0),
            suggestion("c", 7.5, 11.0),
        ];

        let first = reconcile(&suggestions, 0.0, 11.4).unwrap();
        let as_suggestions: Vec<SegmentSuggestion> = first
            .iter()
            .map(|s| suggestion(&s.query, s.start_time, s.end_time))
            .collect();
        let second = reconcile(&as_suggestions, 0.0, 11.4).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_segment_past_span_end_is_dropped() {
        let suggestions = vec![suggestion("a", 0.0, 5.0), suggestion("b", 12.0, 15.0)];

        let segments = reconcile(&suggestions, 0.0, 10.0).unwrap();
        // The gap is first closed by extending "a" to 12.0, then the tail
        // clamp drops "b" entirely and pulls "a" back to the span end
        let queries: Vec<&str> = segments.iter().map(|s| s.query.as_str()).collect();
        assert_eq!(queries, vec!["a"]);
        assert_covers(&segments, 0.0, 10.0);
    }
}

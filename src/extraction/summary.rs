//! Timeline aggregation.

use crate::core::{DecadeBuckets, DensityFlag, TimelineSpan, TimelineSummary, ValidatedYear};
use crate::extraction::config::ExtractorConfig;

/// Aggregates validated years into a [`TimelineSummary`].
///
/// Span, decade counts and the low-confidence count do not depend on input
/// order. The events themselves are carried through unchanged so ordered
/// consumers keep the original sequence.
///
/// # Examples
///
/// ```
/// use yearline::core::ValidatedYear;
/// use yearline::extraction::{ExtractorConfig, summarize};
///
/// let events: Vec<ValidatedYear> = [1945, 1948, 1951, 1999]
///     .iter()
///     .enumerate()
///     .map(|(i, y)| ValidatedYear::new(*y, i * 100))
///     .collect();
/// let summary = summarize(&events, &ExtractorConfig::new());
/// assert_eq!(summary.decades.get(1940), Some(2));
/// assert_eq!(summary.decades.len(), 3);
/// ```
#[must_use]
pub fn summarize(events: &[ValidatedYear], config: &ExtractorConfig) -> TimelineSummary {
    TimelineSummary {
        span: TimelineSpan::from_events(events),
        decades: DecadeBuckets::from_events(events),
        low_confidence_count: events.iter().filter(|e| e.is_low_confidence()).count(),
        density_flags: find_dense_clusters(
            events,
            config.density_window,
            config.density_min_distinct,
        ),
        events: events.to_vec(),
    }
}

/// Finds stretches of at most `window` characters holding `min_distinct` or
/// more distinct years.
///
/// Clusters do not overlap: scanning resumes after the last event of a
/// reported cluster. Events are expected in text order; an offset that goes
/// backwards ends the current window.
#[must_use]
pub fn find_dense_clusters(
    events: &[ValidatedYear],
    window: usize,
    min_distinct: usize,
) -> Vec<DensityFlag> {
    let mut flags = Vec::new();
    if min_distinct == 0 {
        return flags;
    }

    let mut i = 0;
    while i < events.len() {
        let start = events[i].source_offset;
        let mut distinct: Vec<u16> = Vec::new();
        let mut j = i;

        while j < events.len()
            && events[j].source_offset >= start
            && events[j].source_offset - start <= window
        {
            if !distinct.contains(&events[j].year) {
                distinct.push(events[j].year);
            }
            j += 1;
        }

        if distinct.len() >= min_distinct {
            flags.push(DensityFlag {
                start_offset: start,
                end_offset: events[j - 1].source_offset,
                distinct_years: distinct,
            });
            i = j;
        } else {
            i += 1;
        }
    }

    flags
}

//! Timeline aggregates derived from validated years.

use crate::core::ValidatedYear;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Earliest and latest year covered by a document.
///
/// Only exists when at least one event was found; an empty timeline is
/// `Option::<TimelineSpan>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineSpan {
    /// Smallest validated year.
    pub earliest_year: u16,
    /// Largest validated year.
    pub latest_year: u16,
    /// Number of validated years aggregated.
    pub event_count: usize,
}

impl TimelineSpan {
    /// Computes the span of a sequence, or `None` if it is empty.
    #[must_use]
    pub fn from_events(events: &[ValidatedYear]) -> Option<Self> {
        let earliest_year = events.iter().map(|e| e.year).min()?;
        let latest_year = events.iter().map(|e| e.year).max()?;
        Some(Self {
            earliest_year,
            latest_year,
            event_count: events.len(),
        })
    }

    /// Number of years covered, inclusive of both ends.
    #[must_use]
    pub fn years_covered(&self) -> u32 {
        u32::from(self.latest_year) - u32::from(self.earliest_year) + 1
    }
}

/// Event counts keyed by decade start year.
///
/// Decades with no events are never present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecadeBuckets(BTreeMap<u16, usize>);

impl DecadeBuckets {
    /// Buckets a sequence of validated years.
    #[must_use]
    pub fn from_events(events: &[ValidatedYear]) -> Self {
        let mut buckets = BTreeMap::new();
        for event in events {
            *buckets.entry(event.decade()).or_insert(0) += 1;
        }
        Self(buckets)
    }

    /// Count for the decade starting at `decade`, if any.
    #[must_use]
    pub fn get(&self, decade: u16) -> Option<usize> {
        self.0.get(&decade).copied()
    }

    /// Number of non-empty decades.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no events at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(decade_start, count)` in ascending decade order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, usize)> + '_ {
        self.0.iter().map(|(d, c)| (*d, *c))
    }
}

/// A short stretch of text holding many distinct years.
///
/// Reported for review only; it never changes which years are valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DensityFlag {
    /// Offset of the first year in the cluster.
    pub start_offset: usize,
    /// Offset of the last year in the cluster.
    pub end_offset: usize,
    /// Distinct years in the cluster, in order of first appearance.
    pub distinct_years: Vec<u16>,
}

/// Aggregate view of one document's timeline.
///
/// Carries the ordered events alongside the order-independent aggregates so
/// that consumers needing event sequencing do not have to re-extract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineSummary {
    /// Overall span, `None` when there are no events.
    pub span: Option<TimelineSpan>,
    /// Per-decade counts.
    pub decades: DecadeBuckets,
    /// Number of events flagged low confidence.
    pub low_confidence_count: usize,
    /// Dense clusters of distinct years.
    pub density_flags: Vec<DensityFlag>,
    /// Events in original left-to-right order.
    pub events: Vec<ValidatedYear>,
}

impl TimelineSummary {
    /// Returns true if the document produced no events.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.span.is_none()
    }

    /// Low-confidence events in original order.
    pub fn low_confidence_events(&self) -> impl Iterator<Item = &ValidatedYear> {
        self.events.iter().filter(|e| e.is_low_confidence())
    }
}

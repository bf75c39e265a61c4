//! Year candidates and validated year references.
//!
//! A [`RawMatch`] is a year-shaped token found in text together with the
//! window of text around it. A [`ValidatedYear`] is a match that survived
//! every rejection rule.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 4-digit year-shaped token found during a scan.
///
/// Offsets are character positions (Unicode scalar values) in the source
/// text; `end_offset` is exclusive.
///
/// # Examples
///
/// ```
/// use yearline::core::RawMatch;
///
/// let m = RawMatch::new(1916, 3, 7, "In 1916, Dulles had".to_string());
/// assert_eq!(m.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMatch {
    /// Numeric value of the token.
    pub value: u16,

    /// Character offset of the first digit.
    pub start_offset: usize,

    /// Character offset one past the last digit.
    pub end_offset: usize,

    /// Text around the match, including the match itself, clipped to the
    /// text boundaries.
    pub context: String,
}

impl RawMatch {
    /// Creates a new raw match.
    #[must_use]
    pub const fn new(value: u16, start_offset: usize, end_offset: usize, context: String) -> Self {
        Self {
            value,
            start_offset,
            end_offset,
            context,
        }
    }

    /// Length of the matched token in characters.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    /// Returns true if the match spans no characters.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start_offset == self.end_offset
    }
}

/// Triage marker attached to every validated year.
///
/// `Low` years passed range and context checks but fall in a period where
/// footnote and page-number noise is common; they are kept and left for
/// manual review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Accepted without reservation.
    #[default]
    High,
    /// Accepted but flagged for manual triage.
    Low,
}

impl Confidence {
    /// Returns the lowercase name used in output and storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
        }
    }

    /// Parses the stored name, defaulting to `High` for anything unknown.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("low") {
            Self::Low
        } else {
            Self::High
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A year reference confirmed to denote a calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedYear {
    /// The calendar year.
    pub year: u16,

    /// Character offset of the year in the source text.
    pub source_offset: usize,

    /// Triage marker.
    #[serde(default)]
    pub confidence: Confidence,
}

impl ValidatedYear {
    /// Creates a high-confidence validated year.
    #[must_use]
    pub const fn new(year: u16, source_offset: usize) -> Self {
        Self {
            year,
            source_offset,
            confidence: Confidence::High,
        }
    }

    /// Sets the confidence marker.
    #[must_use]
    pub const fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    /// Start of the decade containing this year (e.g. 1948 -> 1940).
    #[must_use]
    pub const fn decade(&self) -> u16 {
        self.year - self.year % 10
    }

    /// Returns true if the year is flagged for manual triage.
    #[must_use]
    pub fn is_low_confidence(&self) -> bool {
        self.confidence == Confidence::Low
    }
}

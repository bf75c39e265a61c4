//! Extractor configuration.
//!
//! All tunables of the extractor live in one immutable value handed to
//! [`YearExtractor::new`](super::YearExtractor::new), so different eras or
//! corpora can be scanned without code changes.

use crate::error::{ExtractionError, Result};
use serde::{Deserialize, Serialize};

/// Lowest value the candidate pattern can produce.
pub const CANDIDATE_FLOOR: u16 = 1900;

/// Highest value the candidate pattern can produce.
pub const CANDIDATE_CEILING: u16 = 2099;

/// Configuration for year extraction and validation.
///
/// # Examples
///
/// ```
/// use yearline::extraction::ExtractorConfig;
///
/// let config = ExtractorConfig::new()
///     .year_range(1914, 1989)
///     .context_window(15, 25);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Inclusive lower bound for plausible years.
    pub min_year: u16,

    /// Inclusive upper bound for plausible years.
    pub max_year: u16,

    /// Characters of context captured before a match.
    pub context_before: usize,

    /// Characters of context captured after a match.
    pub context_after: usize,

    /// Pattern marking a document identifier such as `B3-2058`.
    pub document_reference_pattern: String,

    /// Pattern marking a run of hyphen-joined 4-digit groups.
    pub hyphen_chain_pattern: String,

    /// Years strictly below this are flagged low confidence.
    pub low_confidence_before: Option<u16>,

    /// Width in characters of the window used for density flags.
    pub density_window: usize,

    /// Distinct years within `density_window` that raise a density flag.
    pub density_min_distinct: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_year: super::DEFAULT_MIN_YEAR,
            max_year: super::DEFAULT_MAX_YEAR,
            context_before: super::DEFAULT_CONTEXT_BEFORE,
            context_after: super::DEFAULT_CONTEXT_AFTER,
            document_reference_pattern: super::DOCUMENT_REFERENCE_PATTERN.to_string(),
            hyphen_chain_pattern: super::HYPHEN_CHAIN_PATTERN.to_string(),
            low_confidence_before: Some(super::DEFAULT_LOW_CONFIDENCE_BEFORE),
            density_window: super::DEFAULT_DENSITY_WINDOW,
            density_min_distinct: super::DEFAULT_DENSITY_MIN_DISTINCT,
        }
    }
}

impl ExtractorConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the inclusive plausible-year bounds.
    #[must_use]
    pub const fn year_range(mut self, min_year: u16, max_year: u16) -> Self {
        self.min_year = min_year;
        self.max_year = max_year;
        self
    }

    /// Sets the context window sizes.
    #[must_use]
    pub const fn context_window(mut self, before: usize, after: usize) -> Self {
        self.context_before = before;
        self.context_after = after;
        self
    }

    /// Sets the document-reference pattern.
    #[must_use]
    pub fn document_reference_pattern(mut self, pattern: &str) -> Self {
        self.document_reference_pattern = pattern.to_string();
        self
    }

    /// Sets the hyphen-chain pattern.
    #[must_use]
    pub fn hyphen_chain_pattern(mut self, pattern: &str) -> Self {
        self.hyphen_chain_pattern = pattern.to_string();
        self
    }

    /// Sets the low-confidence threshold; `None` disables flagging.
    #[must_use]
    pub const fn low_confidence_before(mut self, year: Option<u16>) -> Self {
        self.low_confidence_before = year;
        self
    }

    /// Sets the density window and the distinct-year count that flags it.
    #[must_use]
    pub const fn density(mut self, window: usize, min_distinct: usize) -> Self {
        self.density_window = window;
        self.density_min_distinct = min_distinct;
        self
    }

    /// Checks the configuration for contradictions.
    ///
    /// Regex patterns are checked when the rules are compiled.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::InvalidConfig`] for inverted bounds, bounds
    /// the candidate pattern can never produce, and zero density settings.
    pub fn validate(&self) -> Result<()> {
        if self.min_year > self.max_year {
            return Err(ExtractionError::InvalidConfig {
                reason: format!(
                    "min_year {} is greater than max_year {}",
                    self.min_year, self.max_year
                ),
            }
            .into());
        }
        if self.min_year < CANDIDATE_FLOOR || self.max_year > CANDIDATE_CEILING {
            return Err(ExtractionError::InvalidConfig {
                reason: format!(
                    "year range {}..={} must lie within {CANDIDATE_FLOOR}..={CANDIDATE_CEILING}",
                    self.min_year, self.max_year
                ),
            }
            .into());
        }
        if self.density_window == 0 || self.density_min_distinct < 2 {
            return Err(ExtractionError::InvalidConfig {
                reason: "density_window must be > 0 and density_min_distinct >= 2".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Confidence for a year that passed validation.
    #[must_use]
    pub fn confidence_for(&self, year: u16) -> crate::core::Confidence {
        match self.low_confidence_before {
            Some(threshold) if year < threshold => crate::core::Confidence::Low,
            _ => crate::core::Confidence::High,
        }
    }
}

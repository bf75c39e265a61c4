//! Year extractor.
//!
//! Finds year-shaped tokens in a single left-to-right pass and validates each
//! one against the rule set using only its local context.

use crate::core::{RawMatch, TimelineSummary, ValidatedYear};
use crate::error::{ExtractionError, Result};
use crate::extraction::config::ExtractorConfig;
use crate::extraction::rules::RuleSet;
use crate::io::unicode::{char_window, check_text};
use regex::{Matches, Regex};
use tracing::{debug, info};

/// Extracts validated calendar years from text.
///
/// The extractor is immutable after construction and holds no per-call
/// state, so one instance can serve many threads.
///
/// # Examples
///
/// ```
/// use yearline::extraction::{ExtractorConfig, YearExtractor};
///
/// let extractor = YearExtractor::new(ExtractorConfig::new()).unwrap();
/// let years = extractor
///     .extract_validated_years("In 1916, Dulles had problems with the Nazis.")
///     .unwrap();
/// assert_eq!(years.len(), 1);
/// assert_eq!(years[0].year, 1916);
/// assert_eq!(years[0].source_offset, 3);
/// ```
#[derive(Debug)]
pub struct YearExtractor {
    config: ExtractorConfig,
    candidate: Regex,
    rules: RuleSet,
}

impl YearExtractor {
    /// Creates an extractor with the standard rule set.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a pattern fails
    /// to compile.
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        let rules = RuleSet::standard(&config)?;
        Self::with_rules(config, rules)
    }

    /// Creates an extractor with a caller-supplied rule set.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_rules(config: ExtractorConfig, rules: RuleSet) -> Result<Self> {
        config.validate()?;
        let candidate = Regex::new(super::CANDIDATE_PATTERN).map_err(ExtractionError::from)?;
        Ok(Self {
            config,
            candidate,
            rules,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Returns the rule set.
    #[must_use]
    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Lazily iterates year-shaped tokens in order of occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::InvalidInput`] if the text holds binary data.
    pub fn candidates<'r, 't>(&'r self, text: &'t str) -> Result<Candidates<'r, 't>> {
        check_text(text)?;
        Ok(Candidates {
            matches: self.candidate.find_iter(text),
            text,
            byte_pos: 0,
            char_pos: 0,
            before: self.config.context_before,
            after: self.config.context_after,
        })
    }

    /// Returns every year-shaped token in order, repeats included.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::InvalidInput`] if the text holds binary data.
    pub fn extract_candidate_years(&self, text: &str) -> Result<Vec<RawMatch>> {
        Ok(self.candidates(text)?.collect())
    }

    /// Returns true if no rejection rule objects to `year` in `context`.
    ///
    /// Total over any input: short or empty contexts are fine.
    #[must_use]
    pub fn is_valid_year(&self, context: &str, year: u16) -> bool {
        self.rules.accepts(context, year)
    }

    /// Returns the name of the rule rejecting `year`, if any.
    #[must_use]
    pub fn rejection_reason(&self, context: &str, year: u16) -> Option<&'static str> {
        self.rules.rejection_reason(context, year)
    }

    /// Returns the validated years of `text` in order of occurrence.
    ///
    /// Repeated mentions of the same year are kept as separate events.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::InvalidInput`] if the text holds binary data.
    pub fn extract_validated_years(&self, text: &str) -> Result<Vec<ValidatedYear>> {
        let mut validated = Vec::new();
        let mut candidate_count = 0usize;

        for candidate in self.candidates(text)? {
            candidate_count += 1;
            if let Some(rule) = self.rejection_reason(&candidate.context, candidate.value) {
                debug!(
                    year = candidate.value,
                    offset = candidate.start_offset,
                    rule,
                    "rejected year candidate"
                );
                continue;
            }
            validated.push(
                ValidatedYear::new(candidate.value, candidate.start_offset)
                    .with_confidence(self.config.confidence_for(candidate.value)),
            );
        }

        info!(
            candidates = candidate_count,
            validated = validated.len(),
            "extracted year references"
        );
        Ok(validated)
    }

    /// Extracts and summarizes `text` in one call.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::InvalidInput`] if the text holds binary data.
    pub fn timeline(&self, text: &str) -> Result<TimelineSummary> {
        let events = self.extract_validated_years(text)?;
        Ok(super::summarize(&events, &self.config))
    }
}

/// Iterator over year candidates, see [`YearExtractor::candidates`].
///
/// Character offsets are carried forward from the previous match, so the
/// whole pass is linear in the text length.
#[derive(Debug)]
pub struct Candidates<'r, 't> {
    matches: Matches<'r, 't>,
    text: &'t str,
    byte_pos: usize,
    char_pos: usize,
    before: usize,
    after: usize,
}

impl Iterator for Candidates<'_, '_> {
    type Item = RawMatch;

    fn next(&mut self) -> Option<Self::Item> {
        for m in self.matches.by_ref() {
            self.char_pos += self.text[self.byte_pos..m.start()].chars().count();
            self.byte_pos = m.start();

            // The pattern only admits ASCII digits, so this always parses.
            let Ok(value) = m.as_str().parse::<u16>() else {
                continue;
            };

            let start_offset = self.char_pos;
            let end_offset = start_offset + m.as_str().chars().count();
            let context = char_window(self.text, m.start(), m.end(), self.before, self.after);

            return Some(RawMatch::new(
                value,
                start_offset,
                end_offset,
                context.to_string(),
            ));
        }
        None
    }
}

//! Temporal reference extraction.
//!
//! Scans free-form text for 4-digit year-shaped tokens, discards those that
//! are really identifiers or reference numbers, and aggregates the rest into
//! a timeline:
//!
//! - **Candidates**: every `19xx`/`20xx` token with its surrounding context
//! - **Rules**: independent rejection predicates applied to each candidate
//! - **Summary**: span, per-decade counts and review flags
//! - **Batch**: parallel extraction over independent documents

pub mod batch;
pub mod config;
pub mod extractor;
pub mod rules;
pub mod summary;

pub use batch::{DocumentTimeline, extract_batch, extract_batch_with_threads};
pub use config::ExtractorConfig;
pub use extractor::YearExtractor;
pub use rules::{DocumentReferenceRule, HyphenChainRule, RejectionRule, RuleSet, YearRangeRule};
pub use summary::{find_dense_clusters, summarize};

/// Default inclusive lower bound for plausible years.
pub const DEFAULT_MIN_YEAR: u16 = 1900;

/// Default inclusive upper bound for plausible years.
pub const DEFAULT_MAX_YEAR: u16 = 2025;

/// Default characters of context before a match.
pub const DEFAULT_CONTEXT_BEFORE: usize = 10;

/// Default characters of context after a match.
pub const DEFAULT_CONTEXT_AFTER: usize = 20;

/// Years before this are flagged low confidence by default.
pub const DEFAULT_LOW_CONFIDENCE_BEFORE: u16 = 1940;

/// Default width of the density window in characters.
pub const DEFAULT_DENSITY_WINDOW: usize = 80;

/// Default number of distinct years that makes a window dense.
pub const DEFAULT_DENSITY_MIN_DISTINCT: usize = 4;

/// Year-shaped token: `19xx` or `20xx` standing alone.
pub const CANDIDATE_PATTERN: &str = r"\b(?:19|20)[0-9]{2}\b";

/// Letter-prefixed alphanumeric code, a hyphen, then 4 digits (`B3-2058`).
pub const DOCUMENT_REFERENCE_PATTERN: &str = r"\b[A-Za-z]+[0-9][A-Za-z0-9]*-[0-9]{4}";

/// Three or more 4-digit groups joined by hyphens (`2058-2068-2078`).
pub const HYPHEN_CHAIN_PATTERN: &str = r"[0-9]{4}(?:-[0-9]{4}){2,}";

/// Creates a rejection rule by name.
///
/// # Arguments
///
/// * `name` - Rule tag: "year-range", "document-reference", or "hyphen-chain".
/// * `config` - Configuration supplying bounds and patterns.
///
/// # Errors
///
/// Returns [`crate::error::ExtractionError::UnknownRule`] if the name is not
/// recognized, or a regex error if the configured pattern does not compile.
pub fn create_rule(
    name: &str,
    config: &ExtractorConfig,
) -> crate::error::Result<Box<dyn RejectionRule>> {
    match name.to_lowercase().as_str() {
        "year-range" => Ok(Box::new(YearRangeRule::from_config(config))),
        "document-reference" => Ok(Box::new(DocumentReferenceRule::from_config(config)?)),
        "hyphen-chain" => Ok(Box::new(HyphenChainRule::from_config(config)?)),
        _ => Err(crate::error::ExtractionError::UnknownRule {
            name: name.to_string(),
        }
        .into()),
    }
}

/// Lists built-in rule names in evaluation order.
#[must_use]
pub fn available_rules() -> Vec<&'static str> {
    vec!["year-range", "document-reference", "hyphen-chain"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rule_known_names() {
        let config = ExtractorConfig::new();
        for name in available_rules() {
            let rule = create_rule(name, &config).unwrap();
            assert_eq!(rule.name(), name);
        }
    }

    #[test]
    fn test_create_rule_case_insensitive() {
        let rule = create_rule("HYPHEN-CHAIN", &ExtractorConfig::new()).unwrap();
        assert_eq!(rule.name(), "hyphen-chain");
    }

    #[test]
    fn test_create_rule_unknown() {
        let result = create_rule("zip-code", &ExtractorConfig::new());
        assert!(matches!(
            result,
            Err(crate::error::Error::Extraction(
                crate::error::ExtractionError::UnknownRule { .. }
            ))
        ));
    }

    #[test]
    fn test_create_rule_bad_pattern() {
        let config = ExtractorConfig::new().document_reference_pattern("(");
        assert!(create_rule("document-reference", &config).is_err());
        assert!(create_rule("year-range", &config).is_ok());
    }

    #[test]
    fn test_available_rules() {
        let rules = available_rules();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0], "year-range");
    }
}

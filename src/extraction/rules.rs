//! Rejection rules for year candidates.
//!
//! Each rule looks at one candidate's year and surrounding context and
//! decides whether the token is really part of something else (an
//! identifier, a reference list, noise). Rules are independent and
//! stateless, so new false-positive patterns can be added without touching
//! the scanning code.

use crate::error::{ExtractionError, Result};
use crate::extraction::config::ExtractorConfig;
use regex::Regex;

/// A predicate that rejects year candidates.
///
/// Implementations must be `Send + Sync` so a rule set can be shared across
/// threads during batch extraction. `rejects` must never panic, whatever
/// the context length.
///
/// # Examples
///
/// ```
/// use yearline::extraction::{ExtractorConfig, RejectionRule, YearRangeRule};
///
/// let rule = YearRangeRule::from_config(&ExtractorConfig::new());
/// assert!(rule.rejects("in 2058", 2058));
/// assert!(!rule.rejects("in 1958", 1958));
/// ```
pub trait RejectionRule: Send + Sync {
    /// Returns true if the candidate must be discarded.
    fn rejects(&self, context: &str, year: u16) -> bool;

    /// Tag naming the rule.
    fn name(&self) -> &'static str;

    /// Returns a description of what the rule catches.
    fn description(&self) -> &'static str {
        "No description available"
    }
}

/// Rejects years outside the plausible range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRangeRule {
    min_year: u16,
    max_year: u16,
}

impl YearRangeRule {
    /// Creates a rule accepting `min_year..=max_year`.
    #[must_use]
    pub const fn new(min_year: u16, max_year: u16) -> Self {
        Self { min_year, max_year }
    }

    /// Creates the rule from configured bounds.
    #[must_use]
    pub const fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(config.min_year, config.max_year)
    }
}

impl RejectionRule for YearRangeRule {
    fn rejects(&self, _context: &str, year: u16) -> bool {
        year < self.min_year || year > self.max_year
    }

    fn name(&self) -> &'static str {
        "year-range"
    }

    fn description(&self) -> &'static str {
        "Rejects values outside the configured plausible-year bounds"
    }
}

/// Rejects candidates near a document identifier like `B3-2058`.
#[derive(Debug, Clone)]
pub struct DocumentReferenceRule {
    pattern: Regex,
}

impl DocumentReferenceRule {
    /// Compiles the rule from a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Regex`] if the pattern does not compile.
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(ExtractionError::from)?;
        Ok(Self { pattern })
    }

    /// Compiles the configured document-reference pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Regex`] if the pattern does not compile.
    pub fn from_config(config: &ExtractorConfig) -> Result<Self> {
        Self::new(&config.document_reference_pattern)
    }
}

impl RejectionRule for DocumentReferenceRule {
    fn rejects(&self, context: &str, _year: u16) -> bool {
        self.pattern.is_match(context)
    }

    fn name(&self) -> &'static str {
        "document-reference"
    }

    fn description(&self) -> &'static str {
        "Rejects numbers that belong to a letter-prefixed identifier such as B3-2058"
    }
}

/// Rejects candidates inside a run of hyphen-joined 4-digit groups.
#[derive(Debug, Clone)]
pub struct HyphenChainRule {
    pattern: Regex,
}

impl HyphenChainRule {
    /// Compiles the rule from a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Regex`] if the pattern does not compile.
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(ExtractionError::from)?;
        Ok(Self { pattern })
    }

    /// Compiles the configured hyphen-chain pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Regex`] if the pattern does not compile.
    pub fn from_config(config: &ExtractorConfig) -> Result<Self> {
        Self::new(&config.hyphen_chain_pattern)
    }
}

impl RejectionRule for HyphenChainRule {
    fn rejects(&self, context: &str, _year: u16) -> bool {
        self.pattern.is_match(context)
    }

    fn name(&self) -> &'static str {
        "hyphen-chain"
    }

    fn description(&self) -> &'static str {
        "Rejects enumerated reference numbers such as 2058-2068-2078"
    }
}

/// Ordered list of rejection rules.
///
/// A candidate is valid only if no rule rejects it. Rules are evaluated in
/// insertion order and evaluation stops at the first rejection.
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<Box<dyn RejectionRule>>,
}

impl RuleSet {
    /// Creates an empty rule set, which accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the standard rules: range, document reference, hyphen chain.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured pattern does not compile.
    pub fn standard(config: &ExtractorConfig) -> Result<Self> {
        let mut set = Self::new();
        for name in super::available_rules() {
            set.push(super::create_rule(name, config)?);
        }
        Ok(set)
    }

    /// Appends a rule.
    pub fn push(&mut self, rule: Box<dyn RejectionRule>) {
        self.rules.push(rule);
    }

    /// Appends a rule, builder style.
    #[must_use]
    pub fn with_rule(mut self, rule: Box<dyn RejectionRule>) -> Self {
        self.push(rule);
        self
    }

    /// Returns the name of the first rule rejecting the candidate.
    #[must_use]
    pub fn rejection_reason(&self, context: &str, year: u16) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|rule| rule.rejects(context, year))
            .map(|rule| rule.name())
    }

    /// Returns true if no rule rejects the candidate.
    #[must_use]
    pub fn accepts(&self, context: &str, year: u16) -> bool {
        self.rejection_reason(context, year).is_none()
    }

    /// Iterates the rules in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn RejectionRule> {
        self.rules.iter().map(|rule| &**rule)
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the set holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| r.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn standard() -> RuleSet {
        RuleSet::standard(&ExtractorConfig::new()).unwrap()
    }

    #[test_case(1899, true ; "just below floor")]
    #[test_case(1900, false ; "floor")]
    #[test_case(1962, false ; "middle")]
    #[test_case(2025, false ; "ceiling")]
    #[test_case(2026, true ; "just above ceiling")]
    #[test_case(2087, true ; "far future")]
    fn test_year_range_rule(year: u16, rejected: bool) {
        let rule = YearRangeRule::from_config(&ExtractorConfig::new());
        assert_eq!(rule.rejects("", year), rejected);
    }

    #[test_case("resolution B3-2058 was", true ; "letter digit code")]
    #[test_case("doc A12-1999, filed", true ; "multi digit code")]
    #[test_case("file xB7-1950 here", true ; "lowercase prefix")]
    #[test_case("in the mid-1950s", false ; "hyphenated word")]
    #[test_case("the pre-1940 era", false ; "letters only prefix")]
    #[test_case("In 1916, Dulles had", false ; "plain year")]
    #[test_case("B3-", false ; "truncated at boundary")]
    fn test_document_reference_rule(context: &str, rejected: bool) {
        let rule = DocumentReferenceRule::from_config(&ExtractorConfig::new()).unwrap();
        assert_eq!(rule.rejects(context, 1950), rejected);
    }

    #[test_case("2058-2068-2078 and", true ; "three groups")]
    #[test_case("1991-1992-1993-1994", true ; "four groups")]
    #[test_case("from 1939-1945 the", false ; "year range pair")]
    #[test_case("2087-90 and", false ; "abbreviated range")]
    #[test_case("1991-1992-19", false ; "clipped third group")]
    fn test_hyphen_chain_rule(context: &str, rejected: bool) {
        let rule = HyphenChainRule::from_config(&ExtractorConfig::new()).unwrap();
        assert_eq!(rule.rejects(context, 1991), rejected);
    }

    #[test]
    fn test_invalid_pattern_is_error() {
        assert!(DocumentReferenceRule::new("[unclosed").is_err());
        assert!(HyphenChainRule::new("(").is_err());
    }

    #[test]
    fn test_rule_set_reason_names_first_rejecting_rule() {
        let rules = standard();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules.rejection_reason("B3-2058", 2058), Some("year-range"));
        assert_eq!(rules.rejection_reason("B3-1958", 1958), Some("document-reference"));
        assert_eq!(
            rules.rejection_reason("1958-1968-1978", 1958),
            Some("hyphen-chain")
        );
        assert_eq!(rules.rejection_reason("In 1958 we", 1958), None);
    }

    #[test]
    fn test_rule_set_total_on_short_context() {
        let rules = standard();
        assert!(rules.accepts("", 1950));
        assert!(rules.accepts("-", 1950));
        assert!(!rules.accepts("", 3000));
    }

    #[test]
    fn test_empty_rule_set_accepts_everything() {
        let rules = RuleSet::new();
        assert!(rules.is_empty());
        assert!(rules.accepts("B3-2058-2068-2078", 2058));
    }

    struct PageNumberRule;

    impl RejectionRule for PageNumberRule {
        fn rejects(&self, context: &str, _year: u16) -> bool {
            context.contains("p. ")
        }

        fn name(&self) -> &'static str {
            "page-number"
        }
    }

    #[test]
    fn test_custom_rule_extends_set() {
        let rules = standard().with_rule(Box::new(PageNumberRule));
        assert_eq!(rules.rejection_reason("see p. 1932", 1932), Some("page-number"));
        assert_eq!(PageNumberRule.description(), "No description available");
        assert_eq!(format!("{rules:?}"), r#"["year-range", "document-reference", "hyphen-chain", "page-number"]"#);
    }
}

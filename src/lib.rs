//! # yearline
//!
//! Temporal reference extraction for long-form text.
//!
//! yearline scans transcripts, memoirs and reports for 4-digit calendar
//! years, discards tokens that are really document identifiers or numeric
//! reference chains, and builds ordered timelines with per-decade counts.
//!
//! ## Features
//!
//! - **Extraction**: single-pass candidate scan with pluggable rejection rules
//! - **Timelines**: span, decade buckets, low-confidence and density flags
//! - **Batch**: parallel extraction over many documents with rayon
//! - **`SQLite` Storage**: persisted timelines with JSON export and import
//!
//! ## Example
//!
//! ```
//! use yearline::{ExtractorConfig, YearExtractor};
//!
//! let extractor = YearExtractor::new(ExtractorConfig::new()).unwrap();
//! let summary = extractor
//!     .timeline("In 1916, Dulles had problems. See B3-2058 for details.")
//!     .unwrap();
//! assert_eq!(summary.events.len(), 1);
//! assert_eq!(summary.span.unwrap().earliest_year, 1916);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
// Note: unsafe is needed for memory-mapped I/O (memmap2)
#![warn(unsafe_code)]

pub mod cli;
pub mod core;
pub mod error;
pub mod extraction;
pub mod io;
pub mod storage;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export core domain types
pub use core::{
    Confidence, DecadeBuckets, DensityFlag, Document, DocumentRecord, RawMatch, TimelineSpan,
    TimelineSummary, ValidatedYear,
};

// Re-export extraction types
pub use extraction::{
    DocumentTimeline, ExtractorConfig, RejectionRule, RuleSet, YearExtractor, available_rules,
    create_rule, extract_batch, summarize,
};

// Re-export storage types
pub use storage::{DEFAULT_DB_PATH, SqliteStore, TimelineStore};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};

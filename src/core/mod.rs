//! Core domain models for yearline.
//!
//! Year matches, timeline aggregates and documents. These are pure domain
//! models with no I/O dependencies.

pub mod document;
pub mod timeline;
pub mod year;

pub use document::{Document, DocumentRecord};
pub use timeline::{DecadeBuckets, DensityFlag, TimelineSpan, TimelineSummary};
pub use year::{Confidence, RawMatch, ValidatedYear};

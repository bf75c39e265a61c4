//! Parallel extraction over independent documents.
//!
//! Each document is scanned on its own with a shared, immutable
//! [`YearExtractor`]; nothing is shared between runs, so documents are
//! simply fanned out over rayon's pool.

use crate::core::{Document, DocumentRecord, TimelineSummary};
use crate::error::{ExtractionError, Result};
use crate::extraction::extractor::YearExtractor;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

/// Timeline extracted from one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentTimeline {
    /// Record describing the scanned document.
    pub record: DocumentRecord,
    /// Summary, including the ordered events.
    pub summary: TimelineSummary,
}

impl DocumentTimeline {
    /// Scans a single document.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::InvalidInput`] if the document holds
    /// binary data.
    pub fn scan(extractor: &YearExtractor, document: &Document) -> Result<Self> {
        let summary = extractor.timeline(&document.content)?;
        let record = DocumentRecord::from_document(document, summary.events.len())
            .with_config(extractor.config().clone());
        Ok(Self { record, summary })
    }
}

/// Scans documents in parallel on the global rayon pool.
///
/// Results are returned in the order of `documents`; a failing document does
/// not affect the others.
///
/// # Examples
///
/// ```
/// use yearline::core::Document;
/// use yearline::extraction::{ExtractorConfig, YearExtractor, extract_batch};
///
/// let extractor = YearExtractor::new(ExtractorConfig::new()).unwrap();
/// let docs = vec![
///     Document::from_named("a".to_string(), "In 1945.".to_string()),
///     Document::from_named("b".to_string(), "In 1990.".to_string()),
/// ];
/// let results = extract_batch(&extractor, &docs);
/// assert_eq!(results.len(), 2);
/// ```
pub fn extract_batch(
    extractor: &YearExtractor,
    documents: &[Document],
) -> Vec<Result<DocumentTimeline>> {
    let results: Vec<Result<DocumentTimeline>> = documents
        .par_iter()
        .map(|document| {
            DocumentTimeline::scan(extractor, document).inspect_err(|e| {
                warn!(document = %document.display_name(), error = %e, "document rejected");
            })
        })
        .collect();

    info!(
        documents = documents.len(),
        failed = results.iter().filter(|r| r.is_err()).count(),
        "batch extraction finished"
    );
    results
}

/// Scans documents on a dedicated pool of `threads` workers.
///
/// # Errors
///
/// Returns [`ExtractionError::BatchFailed`] if the pool cannot be built.
/// Per-document failures are reported inside the returned vector.
pub fn extract_batch_with_threads(
    extractor: &YearExtractor,
    documents: &[Document],
    threads: usize,
) -> Result<Vec<Result<DocumentTimeline>>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()
        .map_err(|e| ExtractionError::BatchFailed {
            reason: e.to_string(),
        })?;

    Ok(pool.install(|| extract_batch(extractor, documents)))
}

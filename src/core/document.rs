//! Documents scanned for year references.
//!
//! A [`Document`] is the in-memory text handed to the extractor. A
//! [`DocumentRecord`] is what the timeline store keeps once the document has
//! been processed; the text itself is not persisted.

use crate::extraction::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A text document loaded for extraction.
///
/// # Examples
///
/// ```
/// use yearline::core::Document;
///
/// let doc = Document::from_content("In 1916, Dulles had problems.".to_string());
/// assert_eq!(doc.size(), 29);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Optional name for the document.
    pub name: Option<String>,

    /// Source file path (if loaded from file).
    pub source: Option<PathBuf>,

    /// Document text.
    pub content: String,
}

impl Document {
    /// Creates an unnamed document from text.
    #[must_use]
    pub const fn from_content(content: String) -> Self {
        Self {
            name: None,
            source: None,
            content,
        }
    }

    /// Creates a document from a file path and its text.
    ///
    /// The file name becomes the document name.
    #[must_use]
    pub fn from_file(path: PathBuf, content: String) -> Self {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(ToString::to_string);

        Self {
            name,
            source: Some(path),
            content,
        }
    }

    /// Creates a named document from text.
    #[must_use]
    pub const fn from_named(name: String, content: String) -> Self {
        Self {
            name: Some(name),
            source: None,
            content,
        }
    }

    /// Size of the text in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Checks if the document has no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Returns the display name for this document.
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(ref name) = self.name {
            return name.clone();
        }
        if let Some(name) = self
            .source
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
        {
            return name.to_string();
        }
        "unnamed".to_string()
    }

    /// Hash of the text, used to recognise re-scans of the same content.
    #[must_use]
    pub fn content_hash(&self) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        self.content.hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }
}

/// A processed document as kept by the timeline store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Unique identifier (assigned by storage layer).
    pub id: Option<i64>,

    /// Document name.
    pub name: Option<String>,

    /// Source file path.
    pub source: Option<PathBuf>,

    /// Text size in bytes.
    pub size: usize,

    /// Hash of the text at scan time.
    pub content_hash: Option<String>,

    /// Number of validated years stored for the document.
    pub event_count: usize,

    /// Unix timestamp when the record was created.
    pub created_at: i64,

    /// Extractor settings the events were produced with. Imported timelines
    /// without recorded settings have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ExtractorConfig>,
}

impl DocumentRecord {
    /// Builds a record describing `document` with `event_count` events.
    #[must_use]
    pub fn from_document(document: &Document, event_count: usize) -> Self {
        Self {
            id: None,
            name: Some(document.display_name()),
            source: document.source.clone(),
            size: document.size(),
            content_hash: Some(document.content_hash()),
            event_count,
            created_at: current_timestamp(),
            config: None,
        }
    }

    /// Records the extractor settings used to produce the events.
    #[must_use]
    pub fn with_config(mut self, config: ExtractorConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Settings to summarize the stored events with.
    ///
    /// Falls back to the defaults when none were recorded.
    #[must_use]
    pub fn effective_config(&self) -> ExtractorConfig {
        self.config.clone().unwrap_or_default()
    }

    /// Builds a record for an imported timeline with no source text.
    #[must_use]
    pub fn imported(name: String, event_count: usize) -> Self {
        Self {
            name: Some(name),
            event_count,
            created_at: current_timestamp(),
            ..Default::default()
        }
    }

    /// Returns the display name for this record.
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(ref name) = self.name {
            return name.clone();
        }
        self.id
            .map_or_else(|| "unnamed".to_string(), |id| format!("document-{id}"))
    }
}

/// Returns the current Unix timestamp in seconds.
#[allow(clippy::cast_possible_wrap)]
fn current_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_from_content() {
        let doc = Document::from_content("Hello, world!".to_string());
        assert!(doc.name.is_none());
        assert!(doc.source.is_none());
        assert_eq!(doc.size(), 13);
        assert!(!doc.is_empty());
        assert_eq!(doc.display_name(), "unnamed");
    }

    #[test]
    fn test_document_from_file() {
        let doc = Document::from_file(PathBuf::from("dir/memoir.txt"), "text".to_string());
        assert_eq!(doc.source, Some(PathBuf::from("dir/memoir.txt")));
        assert_eq!(doc.name, Some("memoir.txt".to_string()));
        assert_eq!(doc.display_name(), "memoir.txt");
    }

    #[test]
    fn test_content_hash_stable() {
        let a = Document::from_content("same".to_string());
        let b = Document::from_named("other".to_string(), "same".to_string());
        assert_eq!(a.content_hash(), b.content_hash());
        assert_eq!(a.content_hash().len(), 16);
    }

    #[test]
    fn test_record_from_document() {
        let doc = Document::from_named("memoir".to_string(), "In 1916.".to_string());
        let record = DocumentRecord::from_document(&doc, 1);
        assert!(record.id.is_none());
        assert_eq!(record.name.as_deref(), Some("memoir"));
        assert_eq!(record.size, 8);
        assert_eq!(record.event_count, 1);
        assert!(record.content_hash.is_some());
    }

    #[test]
    fn test_record_config_falls_back_to_defaults() {
        let record = DocumentRecord::imported("memoir".to_string(), 0);
        assert!(record.config.is_none());
        assert_eq!(record.effective_config(), ExtractorConfig::new());

        let tuned = ExtractorConfig::new().density(40, 3);
        let record = record.with_config(tuned.clone());
        assert_eq!(record.effective_config(), tuned);
    }

    #[test]
    fn test_record_display_name_falls_back_to_id() {
        let record = DocumentRecord {
            id: Some(7),
            ..Default::default()
        };
        assert_eq!(record.display_name(), "document-7");
        assert_eq!(DocumentRecord::default().display_name(), "unnamed");
    }
}

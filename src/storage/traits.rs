//! Storage trait definition.
//!
//! Defines the interface for persistent timeline stores, enabling
//! pluggable storage implementations.

use crate::core::{DocumentRecord, ValidatedYear};
use crate::error::Result;
use serde::Serialize;

/// Trait for persistent timeline stores.
///
/// A store keeps one [`DocumentRecord`] per scanned or imported document
/// and that document's validated years in their original order.
pub trait TimelineStore: Send {
    /// Initializes storage (creates schema, runs migrations).
    ///
    /// Should be idempotent - safe to call multiple times.
    ///
    /// # Errors
    ///
    /// Returns an error if schema creation or migration fails.
    fn init(&mut self) -> Result<()>;

    /// Checks if storage is initialized.
    ///
    /// # Errors
    ///
    /// Returns an error if the check cannot be performed.
    fn is_initialized(&self) -> Result<bool>;

    /// Deletes all documents and events but preserves the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails.
    fn reset(&mut self) -> Result<()>;

    // ==================== Document Operations ====================

    /// Adds a document record and returns its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be inserted.
    fn add_document(&mut self, record: &DocumentRecord) -> Result<i64>;

    /// Retrieves a document record by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_document(&self, id: i64) -> Result<Option<DocumentRecord>>;

    /// Retrieves the most recent document record with `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_document_by_name(&self, name: &str) -> Result<Option<DocumentRecord>>;

    /// Lists all document records in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_documents(&self) -> Result<Vec<DocumentRecord>>;

    /// Deletes a document and its events.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::DocumentNotFound`](crate::error::StorageError::DocumentNotFound)
    /// if no document has `id`.
    fn delete_document(&mut self, id: i64) -> Result<()>;

    // ==================== Event Operations ====================

    /// Appends events to a document atomically, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; nothing is written then.
    fn add_events(&mut self, document_id: i64, events: &[ValidatedYear]) -> Result<()>;

    /// Retrieves a document's events in original order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_events(&self, document_id: i64) -> Result<Vec<ValidatedYear>>;

    /// Returns the number of events stored for a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the count query fails.
    fn event_count(&self, document_id: i64) -> Result<usize>;

    /// Stores a document together with its events.
    ///
    /// # Errors
    ///
    /// Returns an error if either insert fails.
    fn save_timeline(&mut self, record: &DocumentRecord, events: &[ValidatedYear]) -> Result<i64> {
        let id = self.add_document(record)?;
        self.add_events(id, events)?;
        Ok(id)
    }

    /// Stores a timeline in place of every stored document with the same
    /// name, as one atomic change. Unnamed records are simply added.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails; the earlier timeline is kept then.
    fn replace_timeline(
        &mut self,
        record: &DocumentRecord,
        events: &[ValidatedYear],
    ) -> Result<i64>;

    // ==================== Utility Operations ====================

    /// Gets storage statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if statistics cannot be gathered.
    fn stats(&self) -> Result<StoreStats>;
}

/// Storage statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreStats {
    /// Number of documents stored.
    pub document_count: usize,
    /// Total number of events across all documents.
    pub event_count: usize,
    /// Earliest stored year, if any.
    pub earliest_year: Option<u16>,
    /// Latest stored year, if any.
    pub latest_year: Option<u16>,
    /// Schema version.
    pub schema_version: u32,
    /// Database file size in bytes (if applicable).
    pub db_size: Option<u64>,
}

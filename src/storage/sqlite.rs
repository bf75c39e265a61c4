//! `SQLite` storage implementation.
//!
//! Provides persistent timeline storage using `SQLite` with proper
//! transaction management and migration support.

// SQLite stores all integers as i64. These casts are intentional and safe
// because we only store non-negative values that fit in usize.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

use crate::core::{Confidence, DocumentRecord, ValidatedYear};
use crate::error::{Result, StorageError};
use crate::storage::schema::{
    CHECK_SCHEMA_SQL, CURRENT_SCHEMA_VERSION, GET_VERSION_SQL, SCHEMA_SQL, SET_VERSION_SQL,
};
use crate::storage::traits::{StoreStats, TimelineStore};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DOCUMENT_COLUMNS: &str =
    "id, name, source_path, size, content_hash, event_count, created_at, config";

/// SQLite-based timeline store.
///
/// # Examples
///
/// ```no_run
/// use yearline::storage::{SqliteStore, TimelineStore};
///
/// let mut store = SqliteStore::open(".yearline/timeline.db").unwrap();
/// store.init().unwrap();
/// ```
pub struct SqliteStore {
    /// `SQLite` connection.
    conn: Connection,
    /// Path to the database file (None for in-memory).
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Opens or creates a `SQLite` database at the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the database file. Missing parent directories
    ///   are created.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Database(e.to_string()))?;
        }

        let conn = Connection::open(&path).map_err(StorageError::from)?;

        conn.execute("PRAGMA foreign_keys = ON;", [])
            .map_err(StorageError::from)?;

        // journal_mode returns the new mode as a row
        let _: String = conn
            .query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))
            .map_err(StorageError::from)?;

        debug!(path = %path.display(), "opened timeline store");

        Ok(Self {
            conn,
            path: Some(path),
        })
    }

    /// Creates an in-memory `SQLite` database.
    ///
    /// Useful for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        conn.execute("PRAGMA foreign_keys = ON;", [])
            .map_err(StorageError::from)?;

        Ok(Self { conn, path: None })
    }

    /// Returns the database path (None for in-memory).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Gets the current schema version.
    fn get_schema_version(&self) -> Result<Option<u32>> {
        let version: Option<String> = self
            .conn
            .query_row(GET_VERSION_SQL, [], |row| row.get(0))
            .optional()
            .map_err(StorageError::from)?;

        Ok(version.and_then(|v| v.parse().ok()))
    }

    /// Sets the schema version.
    fn set_schema_version(&self, version: u32) -> Result<()> {
        self.conn
            .execute(SET_VERSION_SQL, params![version.to_string()])
            .map_err(StorageError::from)?;
        Ok(())
    }

    fn document_from_row(row: &Row<'_>) -> rusqlite::Result<DocumentRecord> {
        Ok(DocumentRecord {
            id: Some(row.get::<_, i64>(0)?),
            name: row.get(1)?,
            source: row.get::<_, Option<String>>(2)?.map(PathBuf::from),
            size: row.get::<_, i64>(3)? as usize,
            content_hash: row.get(4)?,
            event_count: row.get::<_, i64>(5)? as usize,
            created_at: row.get(6)?,
            config: row
                .get::<_, Option<String>>(7)?
                .map(|json| serde_json::from_str(&json))
                .transpose()
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e))
                })?,
        })
    }

    fn event_from_row(row: &Row<'_>) -> rusqlite::Result<ValidatedYear> {
        let confidence: String = row.get(2)?;
        Ok(ValidatedYear::new(row.get::<_, u16>(0)?, row.get::<_, i64>(1)? as usize)
            .with_confidence(Confidence::parse(&confidence)))
    }
}

impl TimelineStore for SqliteStore {
    fn init(&mut self) -> Result<()> {
        let is_init: i64 = self
            .conn
            .query_row(CHECK_SCHEMA_SQL, [], |row| row.get(0))
            .map_err(StorageError::from)?;

        if is_init == 0 {
            self.conn
                .execute_batch(SCHEMA_SQL)
                .map_err(StorageError::from)?;
            self.set_schema_version(CURRENT_SCHEMA_VERSION)?;
            info!(version = CURRENT_SCHEMA_VERSION, "created timeline schema");
        } else if let Some(current) = self.get_schema_version()?
            && current < CURRENT_SCHEMA_VERSION
        {
            let migrations = crate::storage::schema::get_migrations_from(current);
            for migration in migrations {
                self.conn
                    .execute_batch(migration.sql)
                    .map_err(|e| StorageError::Migration(e.to_string()))?;
                info!(
                    from = migration.from_version,
                    to = migration.to_version,
                    "migrated timeline schema"
                );
            }
            self.set_schema_version(CURRENT_SCHEMA_VERSION)?;
        }

        Ok(())
    }

    fn is_initialized(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(CHECK_SCHEMA_SQL, [], |row| row.get(0))
            .map_err(StorageError::from)?;
        Ok(count > 0)
    }

    fn reset(&mut self) -> Result<()> {
        self.conn
            .execute_batch(
                r"
            DELETE FROM events;
            DELETE FROM documents;
        ",
            )
            .map_err(StorageError::from)?;
        Ok(())
    }

    // ==================== Document Operations ====================

    fn add_document(&mut self, record: &DocumentRecord) -> Result<i64> {
        insert_document(&self.conn, record)
    }

    fn get_document(&self, id: i64) -> Result<Option<DocumentRecord>> {
        let result = self
            .conn
            .query_row(
                &format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?"),
                params![id],
                Self::document_from_row,
            )
            .optional()
            .map_err(StorageError::from)?;

        Ok(result)
    }

    fn get_document_by_name(&self, name: &str) -> Result<Option<DocumentRecord>> {
        let result = self
            .conn
            .query_row(
                &format!(
                    "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE name = ? ORDER BY id DESC LIMIT 1"
                ),
                params![name],
                Self::document_from_row,
            )
            .optional()
            .map_err(StorageError::from)?;

        Ok(result)
    }

    fn list_documents(&self) -> Result<Vec<DocumentRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {DOCUMENT_COLUMNS} FROM documents ORDER BY id"))
            .map_err(StorageError::from)?;

        let documents = stmt
            .query_map([], Self::document_from_row)
            .map_err(StorageError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StorageError::from)?;

        Ok(documents)
    }

    fn delete_document(&mut self, id: i64) -> Result<()> {
        // Events are deleted automatically via CASCADE
        let deleted = self
            .conn
            .execute("DELETE FROM documents WHERE id = ?", params![id])
            .map_err(StorageError::from)?;

        if deleted == 0 {
            return Err(StorageError::DocumentNotFound {
                identifier: id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    // ==================== Event Operations ====================

    fn add_events(&mut self, document_id: i64, events: &[ValidatedYear]) -> Result<()> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| StorageError::Transaction(e.to_string()))?;

        insert_events(&tx, document_id, events)?;

        tx.commit()
            .map_err(|e| StorageError::Transaction(e.to_string()))?;

        debug!(document_id, events = events.len(), "stored events");
        Ok(())
    }

    fn get_events(&self, document_id: i64) -> Result<Vec<ValidatedYear>> {
        let mut stmt = self
            .conn
            .prepare(
                r"
            SELECT year, source_offset, confidence
            FROM events WHERE document_id = ?
            ORDER BY seq
        ",
            )
            .map_err(StorageError::from)?;

        let events = stmt
            .query_map(params![document_id], Self::event_from_row)
            .map_err(StorageError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StorageError::from)?;

        Ok(events)
    }

    fn save_timeline(&mut self, record: &DocumentRecord, events: &[ValidatedYear]) -> Result<i64> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| StorageError::Transaction(e.to_string()))?;

        let id = insert_document(&tx, record)?;
        insert_events(&tx, id, events)?;

        tx.commit()
            .map_err(|e| StorageError::Transaction(e.to_string()))?;
        Ok(id)
    }

    fn replace_timeline(
        &mut self,
        record: &DocumentRecord,
        events: &[ValidatedYear],
    ) -> Result<i64> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| StorageError::Transaction(e.to_string()))?;

        // Events of replaced documents go with them via CASCADE
        let replaced = match record.name.as_deref() {
            Some(name) => tx
                .execute("DELETE FROM documents WHERE name = ?", params![name])
                .map_err(StorageError::from)?,
            None => 0,
        };

        let id = insert_document(&tx, record)?;
        insert_events(&tx, id, events)?;

        tx.commit()
            .map_err(|e| StorageError::Transaction(e.to_string()))?;

        if replaced > 0 {
            info!(name = ?record.name, id, replaced, "replaced stored timeline");
        }
        Ok(id)
    }

    fn event_count(&self, document_id: i64) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM events WHERE document_id = ?",
                params![document_id],
                |row| row.get(0),
            )
            .map_err(StorageError::from)?;
        Ok(count as usize)
    }

    // ==================== Utility Operations ====================

    fn stats(&self) -> Result<StoreStats> {
        let document_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))
            .map_err(StorageError::from)?;

        let (event_count, earliest_year, latest_year): (i64, Option<u16>, Option<u16>) = self
            .conn
            .query_row("SELECT COUNT(*), MIN(year), MAX(year) FROM events", [], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .map_err(StorageError::from)?;

        let schema_version = self.get_schema_version()?.unwrap_or(0);

        let db_size = self
            .path
            .as_ref()
            .and_then(|p| std::fs::metadata(p).ok().map(|m| m.len()));

        Ok(StoreStats {
            document_count: document_count as usize,
            event_count: event_count as usize,
            earliest_year,
            latest_year,
            schema_version,
            db_size,
        })
    }
}

/// Inserts a document row and returns its ID.
fn insert_document(conn: &Connection, record: &DocumentRecord) -> Result<i64> {
    let config = record
        .config
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(StorageError::from)?;

    conn.execute(
        r"
        INSERT INTO documents (
            name, source_path, size, content_hash, event_count, created_at, config
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
    ",
        params![
            record.name,
            record
                .source
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            record.size as i64,
            record.content_hash,
            record.event_count as i64,
            record.created_at,
            config,
        ],
    )
    .map_err(StorageError::from)?;

    Ok(conn.last_insert_rowid())
}

/// Appends events after a document's existing ones and refreshes its count.
///
/// Callers own the transaction.
fn insert_events(conn: &Connection, document_id: i64, events: &[ValidatedYear]) -> Result<()> {
    let next_seq: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(seq) + 1, 0) FROM events WHERE document_id = ?",
            params![document_id],
            |row| row.get(0),
        )
        .map_err(StorageError::from)?;

    let mut stmt = conn
        .prepare(
            r"
        INSERT INTO events (document_id, seq, year, source_offset, confidence)
        VALUES (?, ?, ?, ?, ?)
    ",
        )
        .map_err(StorageError::from)?;

    for (i, event) in events.iter().enumerate() {
        stmt.execute(params![
            document_id,
            next_seq + i as i64,
            event.year,
            event.source_offset as i64,
            event.confidence.as_str(),
        ])
        .map_err(StorageError::from)?;
    }

    conn.execute(
        r"
        UPDATE documents
        SET event_count = (SELECT COUNT(*) FROM events WHERE document_id = ?1)
        WHERE id = ?1
    ",
        params![document_id],
    )
    .map_err(StorageError::from)?;

    Ok(())
}

//! Storage layer for yearline.
//!
//! Persists document records and their validated years in `SQLite` with
//! transaction support, so timelines can be reported and exported later.

pub mod schema;
pub mod sqlite;
pub mod traits;

pub use schema::{CURRENT_SCHEMA_VERSION, SCHEMA_SQL};
pub use sqlite::SqliteStore;
pub use traits::{StoreStats, TimelineStore};

/// Default database path relative to the working directory.
pub const DEFAULT_DB_PATH: &str = ".yearline/timeline.db";

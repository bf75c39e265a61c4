//! Database schema definitions.
//!
//! Contains SQL schema and migration logic for the timeline `SQLite`
//! database.

/// Current schema version.
pub const CURRENT_SCHEMA_VERSION: u32 = 3;

/// SQL schema for initial database setup.
pub const SCHEMA_SQL: &str = r"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_info (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- Scanned or imported documents (the text itself is not kept)
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    source_path TEXT,
    size INTEGER NOT NULL,
    content_hash TEXT,
    event_count INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    config TEXT
);

-- Index for document lookup by name
CREATE INDEX IF NOT EXISTS idx_documents_name ON documents(name);

-- Validated years, one row per mention
CREATE TABLE IF NOT EXISTS events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    document_id INTEGER NOT NULL,
    seq INTEGER NOT NULL,
    year INTEGER NOT NULL,
    source_offset INTEGER NOT NULL,
    confidence TEXT NOT NULL DEFAULT 'high',
    FOREIGN KEY (document_id) REFERENCES documents(id) ON DELETE CASCADE
);

-- Index for event ordering
CREATE INDEX IF NOT EXISTS idx_events_order ON events(document_id, seq);

-- Index for year range queries (v2)
CREATE INDEX IF NOT EXISTS idx_events_year ON events(year);
";

/// SQL to check if schema is initialized.
pub const CHECK_SCHEMA_SQL: &str = r"
SELECT COUNT(*) FROM sqlite_master
WHERE type='table' AND name='schema_info';
";

/// SQL to get schema version.
pub const GET_VERSION_SQL: &str = r"
SELECT value FROM schema_info WHERE key = 'version';
";

/// SQL to set schema version.
pub const SET_VERSION_SQL: &str = r"
INSERT OR REPLACE INTO schema_info (key, value) VALUES ('version', ?);
";

/// Migrations from older schema versions.
pub struct Migration {
    /// Version this migration upgrades from.
    pub from_version: u32,
    /// Version this migration upgrades to.
    pub to_version: u32,
    /// SQL statements to execute.
    pub sql: &'static str,
}

/// SQL for v1 to v2 migration (adds confidence markers).
const MIGRATION_V1_TO_V2: &str = r"
ALTER TABLE events ADD COLUMN confidence TEXT NOT NULL DEFAULT 'high';

CREATE INDEX IF NOT EXISTS idx_events_year ON events(year);
";

/// SQL for v2 to v3 migration (keeps the extractor settings per document).
const MIGRATION_V2_TO_V3: &str = r"
ALTER TABLE documents ADD COLUMN config TEXT;
";

/// Available migrations.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        from_version: 1,
        to_version: 2,
        sql: MIGRATION_V1_TO_V2,
    },
    Migration {
        from_version: 2,
        to_version: 3,
        sql: MIGRATION_V2_TO_V3,
    },
];

/// Gets migrations needed to upgrade from a version.
#[must_use]
pub fn get_migrations_from(current_version: u32) -> Vec<&'static Migration> {
    MIGRATIONS
        .iter()
        .filter(|m| m.from_version >= current_version && m.to_version <= CURRENT_SCHEMA_VERSION)
        .collect()
}

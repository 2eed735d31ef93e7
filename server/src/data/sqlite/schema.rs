//! SQLite schema definitions
//!
//! Documents are stored as JSON text bodies keyed by collection. `seq` gives
//! the natural (insertion) order returned by queries. `folded` holds the
//! lower-cased text fields of `body` for case-insensitive matching, since
//! SQLite's `lower()` only folds ASCII.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL,
    execution_time_ms INTEGER,
    success INTEGER NOT NULL DEFAULT 1
);

-- =============================================================================
-- Documents
-- =============================================================================
CREATE TABLE IF NOT EXISTS documents (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    collection TEXT NOT NULL CHECK(length(collection) >= 1),
    body TEXT NOT NULL CHECK(json_valid(body)),
    folded TEXT NOT NULL DEFAULT '{}' CHECK(json_valid(folded)),
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection, seq);
"#;

/// Version 2: case-folded shadow of document text fields
pub const MIGRATION_V2_FOLDED: &str = r#"
ALTER TABLE documents ADD COLUMN folded TEXT NOT NULL DEFAULT '{}' CHECK(json_valid(folded));
"#;

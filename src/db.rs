// ==========================================
// Price Catalog - SQLite connection setup
// ==========================================
// Every connection goes through open_sqlite_connection so PRAGMAs
// and busy_timeout are identical across modules.
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::path::Path;
use std::time::Duration;

/// Default busy_timeout (ms)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Schema version written by ensure_schema
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    manufacturer    TEXT    NOT NULL,
    article         TEXT    NOT NULL,
    name            TEXT    NOT NULL,
    cost_basis      REAL    NOT NULL,
    price           INTEGER NOT NULL,
    lead_time       TEXT    NOT NULL,
    lead_time_label TEXT    NOT NULL,
    fast_qty        REAL    NOT NULL DEFAULT 0,
    standard_qty    REAL    NOT NULL DEFAULT 0,
    catalog_url     TEXT,
    image_url       TEXT,
    updated_at      TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_products_manufacturer_article
    ON products (manufacturer, article);

CREATE TABLE IF NOT EXISTS article_name_cache (
    article TEXT PRIMARY KEY,
    name    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS schema_version (
    version    INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Shared PRAGMAs; foreign_keys and busy_timeout are per connection
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Opens a connection and applies the shared configuration
pub fn open_sqlite_connection(db_path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Creates the catalog tables when absent and records the schema version.
///
/// Idempotent: existing tables and rows are left untouched.
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, ?2)",
        rusqlite::params![CURRENT_SCHEMA_VERSION, chrono::Utc::now().to_rfc3339()],
    )?;

    if let Some(found) = read_schema_version(conn)? {
        if found > CURRENT_SCHEMA_VERSION {
            tracing::warn!(
                found,
                expected = CURRENT_SCHEMA_VERSION,
                "database schema is newer than this build"
            );
        }
    }
    Ok(())
}

/// Reads schema_version (None when the table does not exist)
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

// ==========================================
// Price Catalog - Name cache snapshot
// ==========================================
// Reads article_name_cache(article, name) once per run.
// The snapshot is read-only; nothing in a run writes to it.
// ==========================================

use crate::engine::name_resolver::NameCache;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub struct NameCacheRepository {
    db_path: PathBuf,
}

impl NameCacheRepository {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Loads the snapshot, keys canonicalized.
    ///
    /// A missing database file or table yields an empty cache (every
    /// nameless record then gets a placeholder).
    pub fn load(&self) -> RepositoryResult<NameCache> {
        if !self.db_path.exists() {
            warn!(path = %self.db_path.display(), "name cache database not found, using empty cache");
            return Ok(NameCache::new());
        }

        let conn = Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| {
            RepositoryError::DatabaseConnectionError(format!("{}: {}", self.db_path.display(), e))
        })?;

        let cache = load_from_connection(&conn)?;
        info!(path = %self.db_path.display(), entries = cache.len(), "name cache loaded");
        Ok(cache)
    }
}

pub fn load_from_connection(conn: &Connection) -> RepositoryResult<NameCache> {
    let has_table = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='article_name_cache' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);
    if !has_table {
        warn!("table article_name_cache not found, using empty cache");
        return Ok(NameCache::new());
    }

    let mut stmt = conn.prepare("SELECT article, name FROM article_name_cache")?;
    let pairs = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NameCache::from_pairs(pairs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let repo = NameCacheRepository::new(dir.path().join("absent.db"));
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn test_missing_table_gives_empty_cache() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(load_from_connection(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_keys_are_canonicalized() {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::ensure_schema(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO article_name_cache (article, name) VALUES (' X1 ', 'Widget');
             INSERT INTO article_name_cache (article, name) VALUES ('', 'Orphan');",
        )
        .unwrap();

        let cache = load_from_connection(&conn).unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("x1"), Some("Widget"));
    }
}

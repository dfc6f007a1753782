// ==========================================
// Price Catalog - SQLite catalog sink
// ==========================================
// Storage: `products` table (see db::ensure_schema).
// replace_all runs DELETE + batch INSERT in one transaction, so a run
// either publishes the whole catalog or leaves the previous one.
// ==========================================

use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::product::CatalogRow;
use crate::domain::types::LeadTimeCategory;
use crate::i18n::lead_time_label;
use crate::perf::{install_sqlite_tracing, StageTimer};
use crate::repository::catalog_repo::CatalogRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, Row, Transaction};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument};

pub struct CatalogRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
    locale: String,
}

impl CatalogRepositoryImpl {
    /// Opens (or creates) the sink database and ensures its schema.
    ///
    /// `locale` selects the stored lead-time label text.
    pub fn new(db_path: &Path, locale: &str) -> RepositoryResult<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    RepositoryError::DatabaseConnectionError(format!(
                        "{}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }
        let mut conn = open_sqlite_connection(db_path).map_err(|e| {
            RepositoryError::DatabaseConnectionError(format!("{}: {}", db_path.display(), e))
        })?;
        install_sqlite_tracing(&mut conn);
        Self::from_connection(Arc::new(Mutex::new(conn)), locale)
    }

    /// Wraps an existing connection; PRAGMAs and schema are applied again (idempotent)
    pub fn from_connection(conn: Arc<Mutex<Connection>>, locale: &str) -> RepositoryResult<Self> {
        {
            let guard = conn.lock()?;
            crate::db::configure_sqlite_connection(&guard)?;
            ensure_schema(&guard)?;
        }
        Ok(Self {
            conn,
            locale: locale.to_string(),
        })
    }

    fn insert_rows_tx(tx: &Transaction, rows: &[CatalogRow], locale: &str) -> RepositoryResult<usize> {
        let updated_at = chrono::Utc::now().to_rfc3339();
        let mut stmt = tx.prepare(
            r#"
            INSERT INTO products (
                manufacturer, article, name, cost_basis, price,
                lead_time, lead_time_label, fast_qty, standard_qty,
                catalog_url, image_url, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )?;

        let mut count = 0;
        for row in rows {
            stmt.execute(params![
                row.manufacturer,
                row.article,
                row.name,
                row.cost_basis,
                row.customer_price,
                row.lead_time.as_code(),
                lead_time_label(row.lead_time, locale),
                row.fast_qty,
                row.standard_qty,
                row.catalog_url,
                row.image_url,
                updated_at,
            ])?;
            count += 1;
        }
        Ok(count)
    }

    fn map_row(row: &Row) -> rusqlite::Result<(CatalogRow, String)> {
        let code: String = row.get(5)?;
        let catalog_row = CatalogRow {
            manufacturer: row.get(0)?,
            article: row.get(1)?,
            name: row.get(2)?,
            cost_basis: row.get(3)?,
            customer_price: row.get(4)?,
            // Replaced below; rusqlite cannot carry our error type out of the closure
            lead_time: LeadTimeCategory::OnRequest,
            fast_qty: row.get(6)?,
            standard_qty: row.get(7)?,
            catalog_url: row.get(8)?,
            image_url: row.get(9)?,
        };
        Ok((catalog_row, code))
    }
}

#[async_trait]
impl CatalogRepository for CatalogRepositoryImpl {
    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    async fn replace_all(&self, rows: &[CatalogRow]) -> RepositoryResult<usize> {
        let mut timer = StageTimer::new("sink_reload");
        let mut conn = self.conn.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let removed = tx.execute("DELETE FROM products", [])?;
        let written = Self::insert_rows_tx(&tx, rows, &self.locale)?;
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        timer.set_rows(written);
        info!(removed, written, "product table reloaded");
        Ok(written)
    }

    async fn count(&self) -> RepositoryResult<usize> {
        let conn = self.conn.lock()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM products", [], |r| r.get(0))?;
        Ok(n as usize)
    }

    async fn count_manufacturers(&self) -> RepositoryResult<usize> {
        let conn = self.conn.lock()?;
        let n: i64 = conn.query_row(
            "SELECT COUNT(DISTINCT manufacturer) FROM products",
            [],
            |r| r.get(0),
        )?;
        Ok(n as usize)
    }

    async fn list_by_manufacturer(&self, manufacturer: &str) -> RepositoryResult<Vec<CatalogRow>> {
        let conn = self.conn.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT manufacturer, article, name, cost_basis, price, lead_time,
                   fast_qty, standard_qty, catalog_url, image_url
            FROM products
            WHERE manufacturer = ?1
            ORDER BY article, id
            "#,
        )?;

        let raw = stmt
            .query_map(params![manufacturer], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(|(mut row, code)| {
                row.lead_time = LeadTimeCategory::from_code(&code).ok_or_else(|| {
                    RepositoryError::FieldValueError {
                        field: "lead_time".to_string(),
                        message: format!("unknown code '{}'", code),
                    }
                })?;
                Ok(row)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(manufacturer: &str, article: &str, lead_time: LeadTimeCategory) -> CatalogRow {
        CatalogRow {
            manufacturer: manufacturer.to_string(),
            article: article.to_string(),
            name: format!("name {}", article),
            cost_basis: 120.5,
            customer_price: 1928,
            lead_time,
            fast_qty: 3.0,
            standard_qty: 0.0,
            catalog_url: None,
            image_url: Some("https://img/x.png".to_string()),
        }
    }

    fn repo() -> CatalogRepositoryImpl {
        let conn = Connection::open_in_memory().unwrap();
        CatalogRepositoryImpl::from_connection(Arc::new(Mutex::new(conn)), "ru").unwrap()
    }

    #[tokio::test]
    async fn test_replace_all_truncates_previous_rows() {
        let repo = repo();
        let first = vec![
            row("ABB", "a1", LeadTimeCategory::Fast),
            row("ABB", "a2", LeadTimeCategory::Medium),
            row("Jung", "j1", LeadTimeCategory::OnRequest),
        ];
        assert_eq!(repo.replace_all(&first).await.unwrap(), 3);
        assert_eq!(repo.count_manufacturers().await.unwrap(), 2);

        let second = vec![row("Wago", "w1", LeadTimeCategory::Fast)];
        assert_eq!(repo.replace_all(&second).await.unwrap(), 1);
        assert_eq!(repo.count().await.unwrap(), 1);
        assert!(repo.list_by_manufacturer("ABB").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rows_round_trip_with_lead_time_code() {
        let repo = repo();
        let rows = vec![
            row("ABB", "a2", LeadTimeCategory::Medium),
            row("ABB", "a1", LeadTimeCategory::Fast),
        ];
        repo.replace_all(&rows).await.unwrap();

        let stored = repo.list_by_manufacturer("ABB").await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].article, "a1");
        assert_eq!(stored[0].lead_time, LeadTimeCategory::Fast);
        assert_eq!(stored[1], rows[0]);
    }

    #[tokio::test]
    async fn test_label_stored_in_configured_locale() {
        let repo = repo();
        repo.replace_all(&[row("ABB", "a1", LeadTimeCategory::OnRequest)])
            .await
            .unwrap();
        let conn = repo.conn.lock().unwrap();
        let label: String = conn
            .query_row("SELECT lead_time_label FROM products", [], |r| r.get(0))
            .unwrap();
        assert_eq!(label, "по запросу");
    }

    #[tokio::test]
    async fn test_duplicate_keys_are_both_stored() {
        let repo = repo();
        let rows = vec![
            row("ABB", "a1", LeadTimeCategory::Fast),
            row("ABB", "a1", LeadTimeCategory::Medium),
        ];
        assert_eq!(repo.replace_all(&rows).await.unwrap(), 2);
        let stored = repo.list_by_manufacturer("ABB").await.unwrap();
        assert_eq!(stored[0].lead_time, LeadTimeCategory::Fast);
        assert_eq!(stored[1].lead_time, LeadTimeCategory::Medium);
    }
}

// ==========================================
// Price Catalog - SQLite sink on disk
// ==========================================


use price_catalog::db::{open_sqlite_connection, read_schema_version, CURRENT_SCHEMA_VERSION};
use price_catalog::domain::CatalogRow;
use price_catalog::repository::{CatalogRepository, CatalogRepositoryImpl, NameCacheRepository};
use price_catalog::LeadTimeCategory;

fn row(manufacturer: &str, article: &str, price: i64) -> CatalogRow {
    CatalogRow {
        manufacturer: manufacturer.to_string(),
        article: article.to_string(),
        name: format!("{} {}", manufacturer, article),
        cost_basis: price as f64 * 2.5,
        customer_price: price,
        lead_time: LeadTimeCategory::Medium,
        fast_qty: 0.0,
        standard_qty: 4.0,
        catalog_url: None,
        image_url: None,
    }
}

#[tokio::test]
async fn test_catalog_survives_reopen() {
    let (_temp, db_path) = test_helpers::create_test_db().unwrap();

    {
        let repo = CatalogRepositoryImpl::new(&db_path, "en").unwrap();
        let rows: Vec<CatalogRow> = (0..250)
            .map(|i| row(if i % 2 == 0 { "ABB" } else { "Jung" }, &format!("a{:03}", i), 100 + i))
            .collect();
        assert_eq!(repo.replace_all(&rows).await.unwrap(), 250);
    }

    let repo = CatalogRepositoryImpl::new(&db_path, "en").unwrap();
    assert_eq!(repo.count().await.unwrap(), 250);
    assert_eq!(repo.count_manufacturers().await.unwrap(), 2);

    let jung = repo.list_by_manufacturer("Jung").await.unwrap();
    assert_eq!(jung.len(), 125);
    assert_eq!(jung[0].article, "a001");
    assert_eq!(jung[0].customer_price, 101);

    let conn = open_sqlite_connection(&db_path).unwrap();
    let label: String = conn
        .query_row("SELECT lead_time_label FROM products LIMIT 1", [], |r| r.get(0))
        .unwrap();
    assert_eq!(label, "10-14 days");
    assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
}

#[tokio::test]
async fn test_sink_created_in_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("catalog.db");

    let repo = CatalogRepositoryImpl::new(&db_path, "ru").unwrap();
    assert_eq!(repo.replace_all(&[row("ABB", "a1", 10)]).await.unwrap(), 1);
    assert!(db_path.exists());
}

#[test]
fn test_name_cache_reads_sink_database() {
    let (_temp, db_path) = test_helpers::create_test_db().unwrap();
    test_helpers::seed_name_cache(&db_path, &[("MTN1", "Switch"), ("mtn2", "Frame")]).unwrap();

    let cache = NameCacheRepository::new(&db_path).load().unwrap();
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get("mtn1"), Some("Switch"));
    assert_eq!(cache.get("MTN1"), None);
}

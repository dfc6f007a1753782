// ==========================================
// Price Catalog - end-to-end run
// ==========================================
// CSV feeds on disk -> Runner -> CSV views + SQLite sink
// ==========================================


use async_trait::async_trait;
use price_catalog::app::StepOutcome;
use price_catalog::domain::CatalogRow;
use price_catalog::importer::RejectionReason;
use price_catalog::repository::{
    CatalogRepository, CatalogRepositoryImpl, RepositoryError, RepositoryResult,
};
use price_catalog::{ConfigManager, LeadTimeCategory, RunConfig, Runner};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ==========================================
// Fixture
// ==========================================
struct Workspace {
    dir: TempDir,
    _db_file: tempfile::NamedTempFile,
    db_path: std::path::PathBuf,
}

fn workspace() -> Workspace {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    std::fs::create_dir_all(&input).unwrap();

    test_helpers::write_csv(&input, "fast.csv", &["Article,Qty", "j1,14", "W2,0"]).unwrap();
    test_helpers::write_csv(&input, "standard.csv", &["Article,Qty", "J1,2", "w1,5"]).unwrap();
    test_helpers::write_csv(
        &input,
        "jung.csv",
        &[
            "Article,Name,Price,Catalog,Image",
            "J1,Switch,10000,https://c/j1,https://i/j1",
            "j0,,1000,,",
            " ,Blank,100,,",
            "J2,Bad,abc,,",
            "J3,Zero,0,,",
        ],
    )
    .unwrap();
    test_helpers::write_csv(
        &input,
        "axima.csv",
        &[
            "Article,Brand,Name,Price",
            "W1,WAGO,Clamp,6000",
            "X1,Other,Foo,100",
            "W2,wago,,1000",
        ],
    )
    .unwrap();

    let (db_file, db_path) = test_helpers::create_test_db().unwrap();
    test_helpers::seed_name_cache(&db_path, &[("J0", "Frame"), ("w1", "Should not win")]).unwrap();

    Workspace {
        dir,
        _db_file: db_file,
        db_path,
    }
}

fn run_config(ws: &Workspace, extra_catalog: &str) -> RunConfig {
    let json = format!(
        r#"{{
            "input_dir": {input},
            "output_dir": {output},
            "database_path": {db},
            "name_cache_path": {db},
            "warehouses": {{
                "fast": {{ "path": "fast.csv", "header_skip_rows": 1, "quantity_column": 1 }},
                "standard": {{ "path": "standard.csv", "header_skip_rows": 1, "quantity_column": 1 }}
            }},
            "catalogs": [
                {{
                    "name": "jung",
                    "path": "jung.csv",
                    "schema": {{
                        "kind": "fixed_columns",
                        "manufacturer": "Jung",
                        "header_skip_rows": 1,
                        "article_column": 0,
                        "name_column": 1,
                        "price_column": 2,
                        "catalog_url_column": 3,
                        "image_url_column": 4,
                        "price_basis": "list_price"
                    }}
                }},
                {{
                    "name": "axima",
                    "path": "axima.csv",
                    "schema": {{
                        "kind": "brand_filtered",
                        "header_skip_rows": 1,
                        "brand_column": 1,
                        "article_column": 0,
                        "name_column": 2,
                        "price_column": 3,
                        "brand_allowlist": ["Wago"],
                        "price_basis": "dealer"
                    }}
                }}{extra}
            ]
        }}"#,
        input = serde_json::to_string(&ws.dir.path().join("in")).unwrap(),
        output = serde_json::to_string(&ws.dir.path().join("out")).unwrap(),
        db = serde_json::to_string(&ws.db_path).unwrap(),
        extra = extra_catalog,
    );
    RunConfig::from_json(&json).unwrap()
}

fn runner(ws: &Workspace, extra_catalog: &str) -> Runner {
    let config = ConfigManager::from_parts(run_config(ws, extra_catalog), test_helpers::sample_bundle("ru"));
    let sink = CatalogRepositoryImpl::new(&ws.db_path, "ru").unwrap();
    Runner::new(config).with_sink(Arc::new(sink))
}

fn read_csv(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect()
}

// ==========================================
// Tests
// ==========================================

#[tokio::test]
async fn test_full_run_prices_sorts_and_publishes() {
    price_catalog::logging::init_test();
    let ws = workspace();
    let mut runner = runner(&ws, "");

    let output = runner.run().await.unwrap();
    let report = &output.report;
    assert!(report.succeeded());
    assert_eq!(report.export, StepOutcome::Done { rows: 4 });
    assert_eq!(report.sink, StepOutcome::Done { rows: 4 });
    assert_eq!(report.manufacturers, 2);
    assert_eq!(report.build.collisions, 0);
    assert_eq!(report.build.name_hits, 1);
    assert_eq!(report.build.name_misses, 1);

    let jung = &report.build.feeds[0];
    assert_eq!(jung.accepted, 2);
    assert_eq!(jung.rejected_for(RejectionReason::BlankArticle), 1);
    assert_eq!(jung.rejected_for(RejectionReason::InvalidPrice), 1);
    assert_eq!(jung.rejected_for(RejectionReason::NonPositivePrice), 1);
    let axima = &report.build.feeds[1];
    assert_eq!(axima.accepted, 2);
    assert_eq!(axima.rejected_for(RejectionReason::BrandNotAllowed), 1);

    let summary: Vec<(&str, &str, &str, i64, LeadTimeCategory)> = output
        .catalog
        .iter()
        .map(|r| {
            (
                r.manufacturer.as_str(),
                r.article.as_str(),
                r.name.as_str(),
                r.customer_price,
                r.lead_time,
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Jung", "j0", "Frame", 180, LeadTimeCategory::OnRequest),
            ("Jung", "j1", "Switch", 1800, LeadTimeCategory::Fast),
            ("Wago", "w1", "Clamp", 1680, LeadTimeCategory::Medium),
            ("Wago", "w2", "[W2]", 320, LeadTimeCategory::OnRequest),
        ]
    );

    // views
    let public = read_csv(&ws.dir.path().join("out").join("PUBLIC.csv"));
    assert_eq!(public.len(), 4);
    assert_eq!(public[1][..5], ["Jung", "j1", "Switch", "1800", "6-10 дней"]);
    assert_eq!(public[1][5], "https://c/j1");
    let internal = read_csv(&ws.dir.path().join("out").join("INTERNAL.csv"));
    assert_eq!(internal[1][3], "6000.0");

    // sink
    let repo = CatalogRepositoryImpl::new(&ws.db_path, "ru").unwrap();
    assert_eq!(repo.count().await.unwrap(), 4);
    let wago = repo.list_by_manufacturer("Wago").await.unwrap();
    assert_eq!(wago[0].standard_qty, 5.0);
    assert_eq!(wago[0].fast_qty, 0.0);
}

#[tokio::test]
async fn test_run_twice_is_idempotent() {
    let ws = workspace();
    let first = runner(&ws, "").run().await.unwrap();
    let second = runner(&ws, "").run().await.unwrap();

    assert_eq!(first.catalog.rows, second.catalog.rows);
    let repo = CatalogRepositoryImpl::new(&ws.db_path, "ru").unwrap();
    assert_eq!(repo.count().await.unwrap(), 4);
}

#[tokio::test]
async fn test_missing_feed_is_skipped() {
    let ws = workspace();
    let extra = r#",
        {
            "name": "absent",
            "path": "absent.csv",
            "schema": {
                "kind": "fixed_columns",
                "manufacturer": "ABB",
                "header_skip_rows": 1,
                "article_column": 0,
                "price_column": 1
            }
        }"#;
    let output = runner(&ws, extra).run().await.unwrap();
    assert_eq!(output.report.skipped_feeds, vec!["absent".to_string()]);
    assert_eq!(output.catalog.len(), 4);
    assert!(output.report.succeeded());
}

#[tokio::test]
async fn test_missing_warehouse_means_on_request() {
    let ws = workspace();
    std::fs::remove_file(ws.dir.path().join("in").join("fast.csv")).unwrap();
    std::fs::remove_file(ws.dir.path().join("in").join("standard.csv")).unwrap();

    let output = runner(&ws, "").run().await.unwrap();
    assert!(output
        .catalog
        .iter()
        .all(|r| r.lead_time == LeadTimeCategory::OnRequest));
}

#[tokio::test]
async fn test_empty_catalog_skips_outputs() {
    let ws = workspace();
    let input = ws.dir.path().join("in");
    test_helpers::write_csv(&input, "jung.csv", &["Article,Name,Price"]).unwrap();
    test_helpers::write_csv(&input, "axima.csv", &["Article,Brand,Name,Price"]).unwrap();

    // earlier catalog must survive an empty run
    let repo = CatalogRepositoryImpl::new(&ws.db_path, "ru").unwrap();
    repo.replace_all(&[CatalogRow {
        manufacturer: "ABB".to_string(),
        article: "a1".to_string(),
        name: "kept".to_string(),
        cost_basis: 1.0,
        customer_price: 1,
        lead_time: LeadTimeCategory::Fast,
        fast_qty: 1.0,
        standard_qty: 0.0,
        catalog_url: None,
        image_url: None,
    }])
    .await
    .unwrap();

    let output = runner(&ws, "").run().await.unwrap();
    assert!(output.catalog.is_empty());
    assert!(matches!(output.report.export, StepOutcome::Skipped { .. }));
    assert!(matches!(output.report.sink, StepOutcome::Skipped { .. }));
    assert!(!ws.dir.path().join("out").join("PUBLIC.csv").exists());
    assert_eq!(repo.count().await.unwrap(), 1);
}

// ==========================================
// Sink failures and retry
// ==========================================

/// Fails the first `failures` reloads, then records what it receives
struct FlakySink {
    failures: AtomicUsize,
    received: Mutex<Vec<CatalogRow>>,
}

#[async_trait]
impl CatalogRepository for FlakySink {
    async fn replace_all(&self, rows: &[CatalogRow]) -> RepositoryResult<usize> {
        if self.failures.load(Ordering::SeqCst) > 0 {
            self.failures.fetch_sub(1, Ordering::SeqCst);
            return Err(RepositoryError::DatabaseConnectionError("sink offline".to_string()));
        }
        *self.received.lock().unwrap() = rows.to_vec();
        Ok(rows.len())
    }

    async fn count(&self) -> RepositoryResult<usize> {
        Ok(self.received.lock().unwrap().len())
    }

    async fn count_manufacturers(&self) -> RepositoryResult<usize> {
        Ok(0)
    }

    async fn list_by_manufacturer(&self, _manufacturer: &str) -> RepositoryResult<Vec<CatalogRow>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_sink_failure_is_reported_and_retryable() {
    let ws = workspace();
    let sink = Arc::new(FlakySink {
        failures: AtomicUsize::new(1),
        received: Mutex::new(Vec::new()),
    });
    let config = ConfigManager::from_parts(run_config(&ws, ""), test_helpers::sample_bundle("en"));
    let mut runner = Runner::new(config).with_sink(sink.clone());

    let output = runner.run().await.unwrap();
    assert!(!output.report.succeeded());
    assert!(matches!(output.report.sink, StepOutcome::Failed { ref error } if error.contains("sink offline")));
    // export is independent of the sink
    assert_eq!(output.report.export, StepOutcome::Done { rows: 4 });
    assert_eq!(output.catalog.len(), 4);

    let retried = runner.retry_publish(&output.catalog).await;
    assert_eq!(retried, StepOutcome::Done { rows: 4 });
    assert_eq!(sink.count().await.unwrap(), 4);
    assert_eq!(sink.received.lock().unwrap()[..], output.catalog.rows[..]);
}

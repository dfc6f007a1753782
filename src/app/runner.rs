// ==========================================
// Price Catalog - Run orchestration
// ==========================================
// One run: configuration -> name cache -> warehouses -> feeds
//   -> CatalogBuilder -> export views -> sink reload
// Configuration problems abort before any output is written.
// Export/sink problems are recorded in the RunReport; the in-memory
// catalog is kept so the sink reload can be retried.
// ==========================================

use crate::config::{ConfigError, ConfigManager, WarehouseFeed};
use crate::domain::product::FinalizedCatalog;
use crate::engine::{BuildReport, CatalogBuilder, FeedInput, PriceEngine, StockIndex};
use crate::export::CatalogExporter;
use crate::importer::{build_normalizer, FileParser, ImportError, RawSheet, UniversalFileParser};
use crate::perf::StageTimer;
use crate::repository::{CatalogRepository, CatalogRepositoryImpl, NameCacheRepository};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

// ==========================================
// RunReport
// ==========================================

/// Result of one output step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Done { rows: usize },
    Skipped { reason: String },
    Failed { error: String },
}

impl StepOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub build: BuildReport,
    pub manufacturers: usize,
    /// Configured feeds whose file or sheet was absent
    pub skipped_feeds: Vec<String>,
    pub export: StepOutcome,
    pub sink: StepOutcome,
}

impl RunReport {
    /// False when any integration step failed
    pub fn succeeded(&self) -> bool {
        !self.export.is_failed() && !self.sink.is_failed()
    }
}

pub struct RunOutput {
    pub report: RunReport,
    pub catalog: FinalizedCatalog,
}

// ==========================================
// Runner
// ==========================================
pub struct Runner {
    config: ConfigManager,
    parser: Box<dyn FileParser>,
    sink: Option<Arc<dyn CatalogRepository>>,
}

impl Runner {
    /// The sink is opened on first publish at `ConfigManager::database_path`
    pub fn new(config: ConfigManager) -> Self {
        Self {
            config,
            parser: Box::new(UniversalFileParser),
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn CatalogRepository>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_parser(mut self, parser: Box<dyn FileParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn config(&self) -> &ConfigManager {
        &self.config
    }

    /// Executes one full run.
    ///
    /// # Returns
    /// - Ok(RunOutput): catalog computed; check `report.succeeded()` for
    ///   export/sink failures
    /// - Err: configuration or source decoding failure, nothing written
    #[instrument(skip_all)]
    pub async fn run(&mut self) -> anyhow::Result<RunOutput> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let started_at = Utc::now();
        info!(run_id = %run_id, "catalog run started");

        let pricing = PriceEngine::new(self.config.settings().exchange_rate)?;

        let cache_path = self.config.name_cache_path();
        let names = NameCacheRepository::new(&cache_path)
            .load()
            .map_err(|e| ConfigError::source_error(cache_path.display().to_string(), e))
            .context("loading name cache")?;

        let warehouses = self.config.warehouse_feeds();
        let fast_raw = self.read_warehouse(&warehouses.fast)?;
        let standard_raw = self.read_warehouse(&warehouses.standard)?;
        let stock = StockIndex::build(
            &fast_raw,
            &warehouses.fast.layout,
            &standard_raw,
            &warehouses.standard.layout,
        );

        let mut inputs = Vec::new();
        let mut skipped_feeds = Vec::new();
        for feed in self.config.catalog_feeds()? {
            match read_optional(self.parser.as_ref(), &feed.path, feed.sheet.as_deref())? {
                Some(raw) => inputs.push(FeedInput::new(build_normalizer(&feed), raw)),
                None => {
                    warn!(feed = %feed.name, path = %feed.path.display(), "catalog feed not found, skipped");
                    skipped_feeds.push(feed.name.clone());
                }
            }
        }

        let builder = CatalogBuilder::new(&stock, &names, self.config.margins(), pricing);
        let output = {
            let mut timer = StageTimer::new("catalog_build");
            let output = builder.build(&inputs);
            timer.set_rows(output.catalog.len());
            output
        };
        let catalog = output.catalog;

        let (export, sink) = if catalog.is_empty() {
            warn!("no products to publish, export and sink reload skipped");
            let skipped = || StepOutcome::Skipped {
                reason: "empty catalog".to_string(),
            };
            (skipped(), skipped())
        } else {
            (self.export(&catalog), self.publish(&catalog).await)
        };

        let report = RunReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            build: output.report,
            manufacturers: catalog.manufacturer_count(),
            skipped_feeds,
            export,
            sink,
        };

        if report.succeeded() {
            info!(run_id = %report.run_id, rows = catalog.len(), "catalog run finished");
        } else {
            error!(run_id = %report.run_id, "catalog run finished with integration failures");
        }

        Ok(RunOutput { report, catalog })
    }

    /// Reloads the sink from an already computed catalog, without re-reading any feed
    pub async fn retry_publish(&mut self, catalog: &FinalizedCatalog) -> StepOutcome {
        info!(rows = catalog.len(), "retrying sink reload");
        self.publish(catalog).await
    }

    fn export(&self, catalog: &FinalizedCatalog) -> StepOutcome {
        let mut timer = StageTimer::new("export");
        timer.set_rows(catalog.len());
        let exporter = CatalogExporter::new(self.config.output_dir(), self.config.locale());
        match exporter.export(catalog) {
            Ok(summary) => StepOutcome::Done { rows: summary.rows },
            Err(e) => {
                error!(error = %e, "export failed");
                StepOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn publish(&mut self, catalog: &FinalizedCatalog) -> StepOutcome {
        let sink = match self.sink() {
            Ok(sink) => sink,
            Err(e) => {
                error!(error = %e, "sink unreachable");
                return StepOutcome::Failed {
                    error: e.to_string(),
                };
            }
        };

        match sink.replace_all(&catalog.rows).await {
            Ok(rows) => StepOutcome::Done { rows },
            Err(e) => {
                error!(error = %e, "sink reload failed, previous catalog kept");
                StepOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    fn sink(&mut self) -> anyhow::Result<Arc<dyn CatalogRepository>> {
        if let Some(sink) = &self.sink {
            return Ok(Arc::clone(sink));
        }
        let path = self.config.database_path();
        info!(path = %path.display(), "opening catalog sink");
        let repo = CatalogRepositoryImpl::new(&path, self.config.locale())
            .with_context(|| format!("opening sink database {}", path.display()))?;
        let sink: Arc<dyn CatalogRepository> = Arc::new(repo);
        self.sink = Some(Arc::clone(&sink));
        Ok(sink)
    }

    fn read_warehouse(&self, feed: &WarehouseFeed) -> anyhow::Result<RawSheet> {
        match read_optional(self.parser.as_ref(), &feed.path, feed.sheet.as_deref())? {
            Some(raw) => Ok(raw),
            None => {
                warn!(path = %feed.path.display(), "warehouse feed not found, treated as empty");
                Ok(RawSheet::new(feed.path.display().to_string(), Vec::new()))
            }
        }
    }
}

/// Missing file or sheet -> None; a file that exists but cannot be decoded
/// is an error, so a damaged feed never publishes a truncated catalog.
fn read_optional(
    parser: &dyn FileParser,
    path: &Path,
    sheet: Option<&str>,
) -> anyhow::Result<Option<RawSheet>> {
    match parser.parse_sheet(path, sheet) {
        Ok(raw) => Ok(Some(raw)),
        Err(ImportError::FileNotFound(_)) | Err(ImportError::SheetNotFound { .. }) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
    }
}

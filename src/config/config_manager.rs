// ==========================================
// Price Catalog - Configuration manager
// ==========================================
// Combines the run configuration (JSON) with the settings workbook
// and resolves every path a run needs.
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::feed_layout::{CatalogFeed, WarehouseFeeds};
use crate::config::margin_rules::MarginRules;
use crate::config::run_config::RunConfig;
use crate::config::settings::Settings;
use crate::config::workbook::{load_settings_workbook, SettingsBundle};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DB_PATH_ENV: &str = "PRICE_CATALOG_DB_PATH";
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
const DB_FILE_NAME: &str = "price_catalog.db";

// ==========================================
// ConfigManager
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    run: RunConfig,
    bundle: SettingsBundle,
}

impl ConfigManager {
    /// Loads the run configuration and the settings workbook it names.
    ///
    /// Any failure here is fatal: nothing has been read from the feeds yet.
    pub fn load(config_path: &Path) -> ConfigResult<Self> {
        let run = RunConfig::load(config_path)?;
        let workbook = run.resolve_input(&run.settings_workbook);
        debug!(config = %config_path.display(), settings = %workbook.display(), "loading configuration");
        let bundle = load_settings_workbook(&workbook)?;
        let manager = Self::from_parts(run, bundle);
        // Expand sheet layouts now so bad 'Config' rows fail before any feed is read
        manager.catalog_feeds()?;
        info!(
            exchange_rate = manager.settings().exchange_rate,
            global_margin = manager.settings().global_margin,
            locale = %manager.settings().locale,
            "configuration loaded"
        );
        Ok(manager)
    }

    pub fn from_parts(run: RunConfig, bundle: SettingsBundle) -> Self {
        Self { run, bundle }
    }

    pub fn run_config(&self) -> &RunConfig {
        &self.run
    }

    pub fn settings(&self) -> &Settings {
        &self.bundle.settings
    }

    pub fn margins(&self) -> &MarginRules {
        &self.bundle.margins
    }

    pub fn locale(&self) -> &str {
        &self.bundle.settings.locale
    }

    pub fn output_dir(&self) -> &Path {
        &self.run.output_dir
    }

    /// Catalog feeds in processing order: explicit feeds first, then
    /// one feed per 'Config' sheet row.
    pub fn catalog_feeds(&self) -> ConfigResult<Vec<CatalogFeed>> {
        let mut feeds: Vec<CatalogFeed> = self
            .run
            .catalogs
            .iter()
            .map(|feed| CatalogFeed {
                path: self.run.resolve_input(&feed.path),
                ..feed.clone()
            })
            .collect();

        if !self.bundle.sheet_layouts.is_empty() {
            let workbook = self.run.sheet_layout_workbook.as_ref().ok_or_else(|| {
                ConfigError::InvalidLayout(
                    "'Config' sheet present but sheet_layout_workbook is not set".to_string(),
                )
            })?;
            let workbook = self.run.resolve_input(workbook);
            for layout in &self.bundle.sheet_layouts {
                let feed = layout.clone().into_feed(workbook.clone())?;
                if feeds.iter().any(|f| f.name == feed.name) {
                    return Err(ConfigError::InvalidLayout(format!(
                        "catalog feed name '{}' used twice",
                        feed.name
                    )));
                }
                feeds.push(feed);
            }
        }
        Ok(feeds)
    }

    pub fn warehouse_feeds(&self) -> WarehouseFeeds {
        let mut feeds = self.run.warehouses.clone();
        feeds.fast.path = self.run.resolve_input(&feeds.fast.path);
        feeds.standard.path = self.run.resolve_input(&feeds.standard.path);
        feeds
    }

    /// SQLite sink location.
    ///
    /// Precedence: `PRICE_CATALOG_DB_PATH`, `DATABASE_URL`, run config,
    /// settings workbook, per-user data directory.
    pub fn database_path(&self) -> PathBuf {
        resolve_database_path(
            std::env::var(DB_PATH_ENV).ok().as_deref(),
            std::env::var(DATABASE_URL_ENV).ok().as_deref(),
            self.run.database_path.as_deref(),
            self.bundle.settings.database_url.as_deref(),
        )
        .unwrap_or_else(default_db_path)
    }

    /// Name-cache snapshot; the sink database unless configured apart
    pub fn name_cache_path(&self) -> PathBuf {
        match &self.run.name_cache_path {
            Some(path) => self.run.resolve_input(path),
            None => self.database_path(),
        }
    }
}

/// First non-blank candidate, `sqlite://` prefixes stripped.
/// `None` means fall back to the default location.
pub fn resolve_database_path(
    env_path: Option<&str>,
    env_url: Option<&str>,
    configured: Option<&Path>,
    settings_url: Option<&str>,
) -> Option<PathBuf> {
    let from_str = |raw: Option<&str>| -> Option<PathBuf> {
        let trimmed = raw?.trim();
        let trimmed = trimmed
            .strip_prefix("sqlite://")
            .or_else(|| trimmed.strip_prefix("sqlite:"))
            .unwrap_or(trimmed);
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    };

    from_str(env_path)
        .or_else(|| from_str(env_url))
        .or_else(|| configured.map(Path::to_path_buf))
        .or_else(|| from_str(settings_url))
}

/// Per-user data directory, falling back to the working directory.
pub fn default_db_path() -> PathBuf {
    match dirs::data_dir() {
        Some(data_dir) => {
            #[cfg(debug_assertions)]
            let dir = data_dir.join("price-catalog-dev");
            #[cfg(not(debug_assertions))]
            let dir = data_dir.join("price-catalog");

            std::fs::create_dir_all(&dir).ok();
            dir.join(DB_FILE_NAME)
        }
        None => PathBuf::from(".").join(DB_FILE_NAME),
    }
}

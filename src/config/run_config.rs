// ==========================================
// Price Catalog - Run configuration file
// ==========================================
// JSON document naming the input files and their layouts.
// Relative feed paths resolve against `input_dir`.
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::feed_layout::{CatalogFeed, WarehouseFeeds};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_input_dir() -> PathBuf {
    PathBuf::from("input")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_settings_workbook() -> PathBuf {
    PathBuf::from("settings.xlsx")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_settings_workbook")]
    pub settings_workbook: PathBuf,
    /// SQLite sink; see ConfigManager::database_path for precedence
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    /// Name-cache snapshot; defaults to the sink database
    #[serde(default)]
    pub name_cache_path: Option<PathBuf>,
    /// Multi-sheet supplier workbook described by the 'Config' sheet
    #[serde(default)]
    pub sheet_layout_workbook: Option<PathBuf>,
    pub warehouses: WarehouseFeeds,
    #[serde(default)]
    pub catalogs: Vec<CatalogFeed>,
}

impl RunConfig {
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::source_error(path.display().to_string(), e))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> ConfigResult<Self> {
        let config: RunConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let mut seen = std::collections::HashSet::new();
        for feed in &self.catalogs {
            if feed.name.trim().is_empty() {
                return Err(ConfigError::InvalidLayout(
                    "catalog feed without a name".to_string(),
                ));
            }
            if !seen.insert(feed.name.as_str()) {
                return Err(ConfigError::InvalidLayout(format!(
                    "catalog feed name '{}' used twice",
                    feed.name
                )));
            }
            feed.schema.validate()?;
        }
        Ok(())
    }

    /// Absolute paths are kept, relative ones live under `input_dir`
    pub fn resolve_input(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.input_dir.join(path)
        }
    }
}

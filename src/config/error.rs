// ==========================================
// Price Catalog - Configuration errors
// ==========================================
// Fatal: raised before any row is processed and abort the run.
// Every variant names the offending key/sheet/file.
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("required setting '{key}' is missing (sheet 'Settings' of the settings workbook)")]
    MissingKey { key: String },

    #[error("setting '{key}' has invalid value '{value}': {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },

    #[error("margin table '{sheet}' is missing from the settings workbook")]
    MissingMarginTable { sheet: String },

    #[error("margin for '{key}' in '{table}' must be a non-negative number, got '{value}'")]
    InvalidMargin {
        table: String,
        key: String,
        value: String,
    },

    #[error("configuration source unreadable ({path}): {message}")]
    Source { path: String, message: String },

    #[error("invalid feed layout: {0}")]
    InvalidLayout(String),
}

impl ConfigError {
    pub fn source_error(path: impl Into<String>, err: impl std::fmt::Display) -> Self {
        ConfigError::Source {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::InvalidLayout(err.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

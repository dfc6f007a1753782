// ==========================================
// Price Catalog - Run settings
// ==========================================
// Scalar settings from the 'Settings' sheet (parameter | value).
// Validated once, fail-fast, before any feed is read.
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::importer::data_cleaner::parse_number;
use std::collections::HashMap;

/// Setting keys as curators write them in the workbook
pub mod setting_keys {
    pub const EXCHANGE_RATE: &str = "exchange_rate";
    /// Legacy spelling of `exchange_rate`
    pub const EXCHANGE_RATE_LEGACY: &str = "kurs";
    pub const GLOBAL_MARGIN: &str = "global_margin";
    pub const DATABASE_URL: &str = "database_url";
    pub const LOCALE: &str = "locale";
}

pub const DEFAULT_LOCALE: &str = "ru";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Source currency units per one customer currency unit (> 0)
    pub exchange_rate: f64,
    /// Fallback markup (>= 0)
    pub global_margin: f64,
    pub database_url: Option<String>,
    pub locale: String,
}

impl Settings {
    /// Builds validated settings from raw key/value pairs.
    ///
    /// Keys are matched case-insensitively after trimming.
    pub fn from_map(raw: &HashMap<String, String>) -> ConfigResult<Self> {
        let lookup: HashMap<String, &str> = raw
            .iter()
            .map(|(k, v)| (k.trim().to_lowercase(), v.as_str()))
            .filter(|(_, v)| !v.trim().is_empty())
            .collect();

        let (rate_key, rate_raw) = match lookup.get(setting_keys::EXCHANGE_RATE) {
            Some(v) => (setting_keys::EXCHANGE_RATE, *v),
            None => match lookup.get(setting_keys::EXCHANGE_RATE_LEGACY) {
                Some(v) => (setting_keys::EXCHANGE_RATE_LEGACY, *v),
                None => {
                    return Err(ConfigError::MissingKey {
                        key: setting_keys::EXCHANGE_RATE.to_string(),
                    })
                }
            },
        };
        let exchange_rate = parse_positive(rate_key, rate_raw)?;

        let margin_raw = lookup
            .get(setting_keys::GLOBAL_MARGIN)
            .copied()
            .ok_or_else(|| ConfigError::MissingKey {
                key: setting_keys::GLOBAL_MARGIN.to_string(),
            })?;
        let global_margin = parse_non_negative(setting_keys::GLOBAL_MARGIN, margin_raw)?;

        Ok(Self {
            exchange_rate,
            global_margin,
            database_url: lookup
                .get(setting_keys::DATABASE_URL)
                .map(|v| v.trim().to_string()),
            locale: lookup
                .get(setting_keys::LOCALE)
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
        })
    }
}

fn parse_positive(key: &str, raw: &str) -> ConfigResult<f64> {
    match parse_number(raw) {
        Some(v) if v > 0.0 => Ok(v),
        Some(_) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            message: "must be greater than zero".to_string(),
        }),
        None => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            message: "not a number".to_string(),
        }),
    }
}

fn parse_non_negative(key: &str, raw: &str) -> ConfigResult<f64> {
    match parse_number(raw) {
        Some(v) if v >= 0.0 => Ok(v),
        Some(_) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            message: "must not be negative".to_string(),
        }),
        None => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            message: "not a number".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_settings_complete() {
        let s = Settings::from_map(&map(&[("exchange_rate", "5"), ("global_margin", "0.6")]))
            .unwrap();
        assert_eq!(s.exchange_rate, 5.0);
        assert_eq!(s.global_margin, 0.6);
        assert_eq!(s.locale, DEFAULT_LOCALE);
        assert_eq!(s.database_url, None);
    }

    #[test]
    fn test_settings_legacy_rate_key() {
        let s = Settings::from_map(&map(&[("kurs", "5,5"), ("global_margin", "0.6")])).unwrap();
        assert_eq!(s.exchange_rate, 5.5);
    }

    #[test]
    fn test_missing_exchange_rate_names_key() {
        let err = Settings::from_map(&map(&[("global_margin", "0.6")])).unwrap_err();
        match err {
            ConfigError::MissingKey { key } => assert_eq!(key, "exchange_rate"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_blank_global_margin_is_missing() {
        let err =
            Settings::from_map(&map(&[("exchange_rate", "5"), ("global_margin", "  ")])).unwrap_err();
        assert!(err.to_string().contains("global_margin"));
    }

    #[test]
    fn test_zero_exchange_rate_rejected() {
        let err =
            Settings::from_map(&map(&[("exchange_rate", "0"), ("global_margin", "0.6")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "exchange_rate"));
    }

    #[test]
    fn test_zero_global_margin_accepted() {
        let s = Settings::from_map(&map(&[("exchange_rate", "5"), ("global_margin", "0")]))
            .unwrap();
        assert_eq!(s.global_margin, 0.0);

        let err = Settings::from_map(&map(&[("exchange_rate", "5"), ("global_margin", "-0.1")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "global_margin"));
    }

    #[test]
    fn test_non_numeric_margin_rejected() {
        let err = Settings::from_map(&map(&[("exchange_rate", "5"), ("global_margin", "sixty")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "global_margin"));
    }
}

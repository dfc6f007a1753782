// ==========================================
// Price Catalog - Margin rule set
// ==========================================
// Three levels: article > manufacturer > global.
// The global margin is a required field, so a rule set that exists
// can always resolve.
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::types::normalize_article;
use crate::importer::data_cleaner::parse_number;
use std::collections::HashMap;

pub const MANUFACTURER_MARGIN_SHEET: &str = "Margins_by_Manufacturer";
pub const ARTICLE_MARGIN_SHEET: &str = "Margins_by_Article";

#[derive(Debug, Clone, PartialEq)]
pub struct MarginRules {
    pub global_margin: f64,
    pub by_manufacturer: HashMap<String, f64>,
    /// Keyed by canonical (lowercase) article
    pub by_article: HashMap<String, f64>,
}

impl MarginRules {
    pub fn new(global_margin: f64) -> Self {
        Self {
            global_margin,
            by_manufacturer: HashMap::new(),
            by_article: HashMap::new(),
        }
    }

    pub fn with_manufacturer(mut self, manufacturer: &str, margin: f64) -> Self {
        self.by_manufacturer
            .insert(manufacturer.trim().to_string(), margin);
        self
    }

    pub fn with_article(mut self, article: &str, margin: f64) -> Self {
        self.by_article.insert(normalize_article(article), margin);
        self
    }

    /// Loads override rows `(key, margin)` read from a margin sheet.
    ///
    /// Rows with a blank key or a blank/non-numeric margin are skipped,
    /// negative margins are a configuration error.
    pub fn load_manufacturer_rows<'a, I>(&mut self, rows: I) -> ConfigResult<usize>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut loaded = 0;
        for (key, raw) in rows {
            if let Some(margin) = parse_override(MANUFACTURER_MARGIN_SHEET, key, raw)? {
                self.by_manufacturer.insert(key.trim().to_string(), margin);
                loaded += 1;
            }
        }
        Ok(loaded)
    }

    pub fn load_article_rows<'a, I>(&mut self, rows: I) -> ConfigResult<usize>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut loaded = 0;
        for (key, raw) in rows {
            if let Some(margin) = parse_override(ARTICLE_MARGIN_SHEET, key, raw)? {
                self.by_article.insert(normalize_article(key), margin);
                loaded += 1;
            }
        }
        Ok(loaded)
    }
}

fn parse_override(table: &str, key: &str, raw: &str) -> ConfigResult<Option<f64>> {
    if key.trim().is_empty() {
        return Ok(None);
    }
    match parse_number(raw) {
        None => Ok(None),
        Some(v) if v < 0.0 => Err(ConfigError::InvalidMargin {
            table: table.to_string(),
            key: key.trim().to_string(),
            value: raw.to_string(),
        }),
        Some(v) => Ok(Some(v)),
    }
}

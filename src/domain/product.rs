// ==========================================
// Price Catalog - Product domain model
// ==========================================
// ProductRecord: created by a feed normalizer, enriched by the
// name resolver and the lead-time classifier, priced by the
// catalog builder. Lives only for one run.
// ==========================================

use crate::domain::types::LeadTimeCategory;
use serde::{Deserialize, Serialize};

// ==========================================
// ProductRecord - canonical catalog entry
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    // ===== Identity =====
    pub manufacturer: String,
    pub article: String,     // canonical key (trimmed, lowercase, never empty)
    pub raw_article: String, // source text, original casing kept

    // ===== Description =====
    pub name: String, // blank until the name resolver runs on feeds without names

    // ===== Pricing =====
    pub cost_basis: f64, // source currency, 2 decimals, always > 0

    // ===== Stock =====
    pub lead_time: LeadTimeCategory,
    pub warehouse_qty: Option<f64>, // quantity column of the supplier sheet, when configured

    // ===== Links =====
    pub catalog_url: Option<String>,
    pub image_url: Option<String>,

    // ===== Provenance =====
    pub feed: String,
    pub row_number: usize, // 1-based row of the source sheet
}

impl ProductRecord {
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Sort/collision key of the finalized catalog
    pub fn catalog_key(&self) -> (&str, &str) {
        (self.manufacturer.as_str(), self.article.as_str())
    }
}

// ==========================================
// CatalogRow - finalized output row
// ==========================================
// Handed to the sink and to both export views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
    pub manufacturer: String,
    pub article: String,
    pub name: String,
    pub cost_basis: f64,     // internal view only
    pub customer_price: i64, // customer currency, whole units
    pub lead_time: LeadTimeCategory,
    pub fast_qty: f64,
    pub standard_qty: f64,
    pub catalog_url: Option<String>,
    pub image_url: Option<String>,
}

// ==========================================
// FinalizedCatalog
// ==========================================
// Rows sorted ascending by (manufacturer, article); equal keys keep
// their input order and are never merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalizedCatalog {
    pub rows: Vec<CatalogRow>,
    /// Rows whose (manufacturer, article) repeats an earlier row
    pub collisions: usize,
}

impl FinalizedCatalog {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn manufacturer_count(&self) -> usize {
        let mut names: Vec<&str> = self.rows.iter().map(|r| r.manufacturer.as_str()).collect();
        names.dedup();
        names.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogRow> {
        self.rows.iter()
    }
}

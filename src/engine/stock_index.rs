// ==========================================
// Price Catalog - Stock index
// ==========================================
// Two independent article -> quantity maps (fast / standard
// warehouse), rebuilt every run. Repeated rows sum, never overwrite.
// ==========================================

use crate::config::feed_layout::WarehouseLayout;
use crate::domain::types::normalize_article;
use crate::importer::data_cleaner::{cell_number, cell_text};
use crate::importer::file_parser::RawSheet;
use std::collections::HashMap;
use tracing::info;

// ==========================================
// WarehouseStock - one warehouse
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WarehouseStock {
    quantities: HashMap<String, f64>,
}

impl WarehouseStock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregates a raw stock sheet.
    ///
    /// Only rows with a non-blank article and a strictly positive numeric
    /// quantity contribute; anything else is treated as absent stock.
    pub fn from_sheet(raw: &RawSheet, layout: &WarehouseLayout) -> Self {
        let mut stock = Self::new();
        for (_, row) in raw.data_rows(layout.header_skip_rows) {
            let Some(article) = cell_text(row, layout.article_column) else {
                continue;
            };
            if let Some(qty) = cell_number(row, layout.quantity_column) {
                stock.add(article, qty);
            }
        }
        stock
    }

    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut stock = Self::new();
        for (article, qty) in pairs {
            stock.add(article, qty);
        }
        stock
    }

    /// Adds stock for an article; non-positive quantities are ignored
    pub fn add(&mut self, article: &str, qty: f64) {
        let key = normalize_article(article);
        if key.is_empty() || qty.is_nan() || qty <= 0.0 {
            return;
        }
        *self.quantities.entry(key).or_insert(0.0) += qty;
    }

    /// Quantity for a canonical article; 0 when absent
    pub fn quantity(&self, article: &str) -> f64 {
        self.quantities.get(article).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }
}

// ==========================================
// StockIndex - both warehouses
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockIndex {
    pub fast: WarehouseStock,
    pub standard: WarehouseStock,
}

impl StockIndex {
    pub fn new(fast: WarehouseStock, standard: WarehouseStock) -> Self {
        Self { fast, standard }
    }

    pub fn build(
        fast_raw: &RawSheet,
        fast_layout: &WarehouseLayout,
        standard_raw: &RawSheet,
        standard_layout: &WarehouseLayout,
    ) -> Self {
        let index = Self::new(
            WarehouseStock::from_sheet(fast_raw, fast_layout),
            WarehouseStock::from_sheet(standard_raw, standard_layout),
        );
        info!(
            fast = index.fast.len(),
            standard = index.standard.len(),
            "stock index built"
        );
        index
    }

    pub fn fast_qty(&self, article: &str) -> f64 {
        self.fast.quantity(article)
    }

    pub fn standard_qty(&self, article: &str) -> f64 {
        self.standard.quantity(article)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(skip: usize) -> WarehouseLayout {
        WarehouseLayout {
            header_skip_rows: skip,
            article_column: 0,
            quantity_column: 2,
        }
    }

    #[test]
    fn test_repeated_rows_sum() {
        let sheet = RawSheet::from_rows(
            "stock",
            &[
                &["Stock report"],
                &["ART-1", "x", "5"],
                &["art-1 ", "x", "2,5"],
                &["ART-2", "x", "1"],
            ],
        );
        let stock = WarehouseStock::from_sheet(&sheet, &layout(1));
        assert_eq!(stock.quantity("art-1"), 7.5);
        assert_eq!(stock.quantity("art-2"), 1.0);
        assert_eq!(stock.len(), 2);
    }

    #[test]
    fn test_invalid_rows_are_absent() {
        let sheet = RawSheet::from_rows(
            "stock",
            &[
                &["", "x", "5"],
                &["A", "x", "0"],
                &["B", "x", "-3"],
                &["C", "x", "many"],
                &["D", "x"],
            ],
        );
        let stock = WarehouseStock::from_sheet(&sheet, &layout(0));
        assert!(stock.is_empty());
        assert_eq!(stock.quantity("a"), 0.0);
    }

    #[test]
    fn test_header_rows_never_count() {
        let sheet = RawSheet::from_rows("stock", &[&["A", "x", "100"], &["A", "x", "1"]]);
        let stock = WarehouseStock::from_sheet(&sheet, &layout(1));
        assert_eq!(stock.quantity("a"), 1.0);
    }

    #[test]
    fn test_warehouses_are_independent() {
        let fast = RawSheet::from_rows("fast", &[&["A", "", "3"]]);
        let standard = RawSheet::from_rows("standard", &[&["B", "", "4"]]);
        let index = StockIndex::build(&fast, &layout(0), &standard, &layout(0));
        assert_eq!(index.fast_qty("a"), 3.0);
        assert_eq!(index.standard_qty("a"), 0.0);
        assert_eq!(index.standard_qty("b"), 4.0);
        assert_eq!(index.fast_qty("b"), 0.0);
    }
}

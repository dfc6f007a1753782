// ==========================================
// Price Catalog - Feed layouts
// ==========================================
// Positional layouts of supplier and warehouse sheets.
// Supplied by configuration, never discovered at runtime.
// Column indices are 0-based unless stated otherwise.
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Fixed supplier discount: dealer cost = list price x 0.6
pub const SUPPLIER_DISCOUNT_FACTOR: f64 = 0.6;

// ==========================================
// PriceBasis - meaning of the price cell
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceBasis {
    /// Recommended retail price, discounted by SUPPLIER_DISCOUNT_FACTOR
    #[default]
    ListPrice,
    /// Already the dealer cost
    Dealer,
}

impl PriceBasis {
    /// Cost basis for a source price, rounded to 2 decimals
    pub fn cost_basis(&self, price: f64) -> f64 {
        let raw = match self {
            PriceBasis::ListPrice => price * SUPPLIER_DISCOUNT_FACTOR,
            PriceBasis::Dealer => price,
        };
        round_cents(raw)
    }
}

/// Rounds to 2 decimals against the exact binary value, ties to even:
/// 2.675 is stored as 2.67499999... and gives 2.67, 0.125 gives 0.12.
pub fn round_cents(value: f64) -> f64 {
    let scaled = value * 100.0;
    // scaled + residual is the exact product
    let residual = value.mul_add(100.0, -scaled);

    let mut lower = scaled.floor();
    if scaled == lower && residual < 0.0 {
        lower -= 1.0;
    }
    let distance = (scaled - (lower + 0.5)) + residual;

    let cents = if distance < 0.0 {
        lower
    } else if distance > 0.0 {
        lower + 1.0
    } else if lower % 2.0 == 0.0 {
        lower
    } else {
        lower + 1.0
    };
    cents / 100.0
}

// ==========================================
// Warehouse stock layout
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseLayout {
    pub header_skip_rows: usize,
    #[serde(default)]
    pub article_column: usize,
    pub quantity_column: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseFeed {
    pub path: PathBuf,
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(flatten)]
    pub layout: WarehouseLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseFeeds {
    pub fast: WarehouseFeed,
    pub standard: WarehouseFeed,
}

// ==========================================
// Catalog feed schemas
// ==========================================

/// Single supplier, one manufacturer per sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedColumnSchema {
    pub manufacturer: String,
    pub header_skip_rows: usize,
    pub article_column: usize,
    #[serde(default)]
    pub name_column: Option<usize>,
    pub price_column: usize,
    #[serde(default)]
    pub warehouse_qty_column: Option<usize>,
    #[serde(default)]
    pub catalog_url_column: Option<usize>,
    #[serde(default)]
    pub image_url_column: Option<usize>,
    #[serde(default)]
    pub price_basis: PriceBasis,
}

/// Multi-brand distributor sheet, manufacturer taken from a brand column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandFilteredSchema {
    pub header_skip_rows: usize,
    pub brand_column: usize,
    pub article_column: usize,
    #[serde(default)]
    pub name_column: Option<usize>,
    pub price_column: usize,
    #[serde(default)]
    pub warehouse_qty_column: Option<usize>,
    pub brand_allowlist: Vec<String>,
    #[serde(default)]
    pub price_basis: PriceBasis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedSchema {
    FixedColumns(FixedColumnSchema),
    BrandFiltered(BrandFilteredSchema),
}

impl FeedSchema {
    pub fn validate(&self) -> ConfigResult<()> {
        match self {
            FeedSchema::FixedColumns(s) => {
                if s.manufacturer.trim().is_empty() {
                    return Err(ConfigError::InvalidLayout(
                        "fixed_columns feed without manufacturer".to_string(),
                    ));
                }
                if s.article_column == s.price_column {
                    return Err(ConfigError::InvalidLayout(format!(
                        "feed for '{}': article and price share column {}",
                        s.manufacturer, s.article_column
                    )));
                }
            }
            FeedSchema::BrandFiltered(s) => {
                if s.brand_allowlist.iter().all(|b| b.trim().is_empty()) {
                    return Err(ConfigError::InvalidLayout(
                        "brand_filtered feed with empty brand_allowlist".to_string(),
                    ));
                }
                if s.article_column == s.price_column {
                    return Err(ConfigError::InvalidLayout(format!(
                        "brand_filtered feed: article and price share column {}",
                        s.article_column
                    )));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogFeed {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub sheet: Option<String>,
    pub schema: FeedSchema,
}

// ==========================================
// SheetLayout - one row of the 'Config' sheet
// ==========================================
// Curators write 1-based rows/columns; converted on the way in.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub sheet_name: String,
    pub manufacturer: String,
    pub start_row: usize,
    pub col_article: usize,
    pub col_name: usize,
    pub col_price: usize,
}

impl SheetLayout {
    pub fn into_feed(self, workbook: PathBuf) -> ConfigResult<CatalogFeed> {
        if self.start_row == 0 || self.col_article == 0 || self.col_name == 0 || self.col_price == 0
        {
            return Err(ConfigError::InvalidLayout(format!(
                "sheet '{}': rows and columns in 'Config' are 1-based",
                self.sheet_name
            )));
        }

        let schema = FeedSchema::FixedColumns(FixedColumnSchema {
            manufacturer: self.manufacturer,
            header_skip_rows: self.start_row - 1,
            article_column: self.col_article - 1,
            name_column: Some(self.col_name - 1),
            price_column: self.col_price - 1,
            warehouse_qty_column: None,
            catalog_url_column: None,
            image_url_column: None,
            price_basis: PriceBasis::ListPrice,
        });
        schema.validate()?;

        Ok(CatalogFeed {
            name: self.sheet_name.clone(),
            path: workbook,
            sheet: Some(self.sheet_name),
            schema,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_price_discount() {
        assert_eq!(PriceBasis::ListPrice.cost_basis(10000.0), 6000.0);
        assert_eq!(PriceBasis::ListPrice.cost_basis(3.33), 2.0);
        assert_eq!(PriceBasis::Dealer.cost_basis(1234.567), 1234.57);
    }

    #[test]
    fn test_cents_follow_stored_value_and_ties_to_even() {
        assert_eq!(PriceBasis::Dealer.cost_basis(2.675), 2.67);
        assert_eq!(PriceBasis::Dealer.cost_basis(1.005), 1.0);
        assert_eq!(round_cents(0.125), 0.12);
        assert_eq!(round_cents(0.375), 0.38);
        assert_eq!(round_cents(2.5), 2.5);
        // 4.475 * 0.6 = 2.685 on paper, 2.6849999... in binary
        assert_eq!(PriceBasis::ListPrice.cost_basis(4.475), 2.68);
    }

    #[test]
    fn test_schema_from_json() {
        let json = r#"{
            "kind": "brand_filtered",
            "header_skip_rows": 3,
            "brand_column": 2,
            "article_column": 0,
            "name_column": 7,
            "price_column": 13,
            "brand_allowlist": ["Wago"],
            "price_basis": "dealer"
        }"#;
        let schema: FeedSchema = serde_json::from_str(json).unwrap();
        match &schema {
            FeedSchema::BrandFiltered(s) => {
                assert_eq!(s.price_basis, PriceBasis::Dealer);
                assert_eq!(s.warehouse_qty_column, None);
            }
            other => panic!("unexpected schema: {other:?}"),
        }
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_empty_allowlist_is_invalid() {
        let schema = FeedSchema::BrandFiltered(BrandFilteredSchema {
            header_skip_rows: 0,
            brand_column: 1,
            article_column: 0,
            name_column: None,
            price_column: 2,
            warehouse_qty_column: None,
            brand_allowlist: vec![" ".to_string()],
            price_basis: PriceBasis::Dealer,
        });
        assert!(matches!(schema.validate(), Err(ConfigError::InvalidLayout(_))));
    }

    #[test]
    fn test_sheet_layout_converts_to_zero_based() {
        let layout = SheetLayout {
            sheet_name: "Jung".to_string(),
            manufacturer: "Jung".to_string(),
            start_row: 5,
            col_article: 1,
            col_name: 2,
            col_price: 4,
        };
        let feed = layout.into_feed(PathBuf::from("all.xlsx")).unwrap();
        assert_eq!(feed.sheet.as_deref(), Some("Jung"));
        match feed.schema {
            FeedSchema::FixedColumns(s) => {
                assert_eq!(s.header_skip_rows, 4);
                assert_eq!(s.article_column, 0);
                assert_eq!(s.name_column, Some(1));
                assert_eq!(s.price_column, 3);
            }
            other => panic!("unexpected schema: {other:?}"),
        }
    }

    #[test]
    fn test_sheet_layout_rejects_zero_column() {
        let layout = SheetLayout {
            sheet_name: "Bad".to_string(),
            manufacturer: "X".to_string(),
            start_row: 1,
            col_article: 0,
            col_name: 2,
            col_price: 3,
        };
        assert!(layout.into_feed(PathBuf::from("all.xlsx")).is_err());
    }
}

// ==========================================
// Price Catalog - Brand-filtered normalizer
// ==========================================
// Multi-brand distributor sheet. The manufacturer is read from a
// brand column and must be on the configured allow-list.
// ==========================================

use crate::config::feed_layout::BrandFilteredSchema;
use crate::domain::product::ProductRecord;
use crate::domain::types::{normalize_article, LeadTimeCategory};
use crate::importer::data_cleaner::{cell_number, cell_text};
use crate::importer::file_parser::RawSheet;
use crate::importer::normalizer::{FeedNormalizer, RejectionReason, RowOutcome, RowRejection};
use std::collections::HashMap;

pub struct BrandFilteredNormalizer {
    feed_name: String,
    schema: BrandFilteredSchema,
    /// lowercase brand -> spelling from the allow-list
    allowed: HashMap<String, String>,
}

impl BrandFilteredNormalizer {
    pub fn new(feed_name: String, schema: BrandFilteredSchema) -> Self {
        let allowed = schema
            .brand_allowlist
            .iter()
            .map(|b| b.trim())
            .filter(|b| !b.is_empty())
            .map(|b| (b.to_lowercase(), b.to_string()))
            .collect();
        Self {
            feed_name,
            schema,
            allowed,
        }
    }

    fn manufacturer_for(&self, brand: Option<&str>) -> Option<&str> {
        brand
            .and_then(|b| self.allowed.get(&b.to_lowercase()))
            .map(String::as_str)
    }

    fn normalize_row(&self, row_number: usize, row: &[String]) -> RowOutcome {
        let s = &self.schema;
        let reject = |reason| RowRejection { row_number, reason };

        let manufacturer = self
            .manufacturer_for(cell_text(row, s.brand_column))
            .ok_or_else(|| reject(RejectionReason::BrandNotAllowed))?;

        let raw_article = cell_text(row, s.article_column)
            .ok_or_else(|| reject(RejectionReason::BlankArticle))?;

        let price = cell_number(row, s.price_column)
            .ok_or_else(|| reject(RejectionReason::InvalidPrice))?;
        if price <= 0.0 {
            return Err(reject(RejectionReason::NonPositivePrice));
        }
        let cost_basis = s.price_basis.cost_basis(price);
        if cost_basis <= 0.0 {
            return Err(reject(RejectionReason::NonPositivePrice));
        }

        Ok(ProductRecord {
            manufacturer: manufacturer.to_string(),
            article: normalize_article(raw_article),
            raw_article: raw_article.to_string(),
            name: s
                .name_column
                .and_then(|c| cell_text(row, c))
                .unwrap_or_default()
                .to_string(),
            cost_basis,
            lead_time: LeadTimeCategory::OnRequest,
            warehouse_qty: s.warehouse_qty_column.and_then(|c| cell_number(row, c)),
            catalog_url: None,
            image_url: None,
            feed: self.feed_name.clone(),
            row_number,
        })
    }
}

impl FeedNormalizer for BrandFilteredNormalizer {
    fn feed_name(&self) -> &str {
        &self.feed_name
    }

    fn parse<'a>(&'a self, raw: &'a RawSheet) -> Box<dyn Iterator<Item = RowOutcome> + 'a> {
        Box::new(
            raw.data_rows(self.schema.header_skip_rows)
                .filter(|(_, row)| row.iter().any(|c| !c.trim().is_empty()))
                .map(move |(row_number, row)| self.normalize_row(row_number, row)),
        )
    }
}

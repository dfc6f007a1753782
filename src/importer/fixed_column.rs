// ==========================================
// Price Catalog - Fixed-column normalizer
// ==========================================
// Single-supplier sheet: manufacturer comes from configuration,
// article/name/price sit at fixed column indices.
// ==========================================

use crate::config::feed_layout::FixedColumnSchema;
use crate::domain::product::ProductRecord;
use crate::domain::types::{normalize_article, LeadTimeCategory};
use crate::importer::data_cleaner::{cell_number, cell_text, normalize_null};
use crate::importer::file_parser::RawSheet;
use crate::importer::normalizer::{FeedNormalizer, RejectionReason, RowOutcome, RowRejection};

pub struct FixedColumnNormalizer {
    feed_name: String,
    schema: FixedColumnSchema,
}

impl FixedColumnNormalizer {
    pub fn new(feed_name: String, schema: FixedColumnSchema) -> Self {
        Self { feed_name, schema }
    }

    fn normalize_row(&self, row_number: usize, row: &[String]) -> RowOutcome {
        let s = &self.schema;
        let reject = |reason| RowRejection { row_number, reason };

        let raw_article = cell_text(row, s.article_column)
            .ok_or_else(|| reject(RejectionReason::BlankArticle))?;

        let price = cell_number(row, s.price_column)
            .ok_or_else(|| reject(RejectionReason::InvalidPrice))?;
        if price <= 0.0 {
            return Err(reject(RejectionReason::NonPositivePrice));
        }
        let cost_basis = s.price_basis.cost_basis(price);
        if cost_basis <= 0.0 {
            // sub-cent prices round to zero
            return Err(reject(RejectionReason::NonPositivePrice));
        }

        let name = s
            .name_column
            .and_then(|c| cell_text(row, c))
            .unwrap_or_default()
            .to_string();

        Ok(ProductRecord {
            manufacturer: s.manufacturer.trim().to_string(),
            article: normalize_article(raw_article),
            raw_article: raw_article.to_string(),
            name,
            cost_basis,
            lead_time: LeadTimeCategory::OnRequest,
            warehouse_qty: s.warehouse_qty_column.and_then(|c| cell_number(row, c)),
            catalog_url: normalize_null(s.catalog_url_column.and_then(|c| cell_text(row, c))),
            image_url: normalize_null(s.image_url_column.and_then(|c| cell_text(row, c))),
            feed: self.feed_name.clone(),
            row_number,
        })
    }
}

impl FeedNormalizer for FixedColumnNormalizer {
    fn feed_name(&self) -> &str {
        &self.feed_name
    }

    fn parse<'a>(&'a self, raw: &'a RawSheet) -> Box<dyn Iterator<Item = RowOutcome> + 'a> {
        Box::new(
            raw.data_rows(self.schema.header_skip_rows)
                // fully blank rows are layout, not data
                .filter(|(_, row)| row.iter().any(|c| !c.trim().is_empty()))
                .map(move |(row_number, row)| self.normalize_row(row_number, row)),
        )
    }
}

// ==========================================
// Price Catalog - Feed normalizer contract
// ==========================================
// One polymorphic contract, one implementation per feed shape:
//   FixedColumnNormalizer  - single supplier, fixed columns
//   BrandFilteredNormalizer - multi-brand sheet + allow-list
// A row that fails validation is a RowRejection value, never an error.
// ==========================================

use crate::config::feed_layout::{CatalogFeed, FeedSchema};
use crate::domain::product::ProductRecord;
use crate::importer::brand_filtered::BrandFilteredNormalizer;
use crate::importer::file_parser::RawSheet;
use crate::importer::fixed_column::FixedColumnNormalizer;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

// ==========================================
// Row rejection
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    BlankArticle,
    InvalidPrice,     // missing or non-numeric
    NonPositivePrice, // <= 0
    BrandNotAllowed,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RejectionReason::BlankArticle => "blank_article",
            RejectionReason::InvalidPrice => "invalid_price",
            RejectionReason::NonPositivePrice => "non_positive_price",
            RejectionReason::BrandNotAllowed => "brand_not_allowed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRejection {
    pub row_number: usize,
    pub reason: RejectionReason,
}

pub type RowOutcome = Result<ProductRecord, RowRejection>;

// ==========================================
// FeedNormalizer trait
// ==========================================
pub trait FeedNormalizer: Send + Sync {
    fn feed_name(&self) -> &str;

    /// Lazily maps raw rows to outcomes. Pure: the same sheet always
    /// yields the same sequence.
    fn parse<'a>(&'a self, raw: &'a RawSheet) -> Box<dyn Iterator<Item = RowOutcome> + 'a>;
}

/// Picks the adapter for a configured feed
pub fn build_normalizer(feed: &CatalogFeed) -> Box<dyn FeedNormalizer> {
    match &feed.schema {
        FeedSchema::FixedColumns(schema) => {
            Box::new(FixedColumnNormalizer::new(feed.name.clone(), schema.clone()))
        }
        FeedSchema::BrandFiltered(schema) => {
            Box::new(BrandFilteredNormalizer::new(feed.name.clone(), schema.clone()))
        }
    }
}

// ==========================================
// FeedStats - per-feed counters
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedStats {
    pub feed: String,
    pub accepted: usize,
    pub rejected: usize,
    pub rejections: BTreeMap<RejectionReason, usize>,
    pub by_manufacturer: BTreeMap<String, usize>,
}

impl FeedStats {
    pub fn new(feed: impl Into<String>) -> Self {
        Self {
            feed: feed.into(),
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: &RowOutcome) {
        match outcome {
            Ok(product) => {
                self.accepted += 1;
                *self
                    .by_manufacturer
                    .entry(product.manufacturer.clone())
                    .or_insert(0) += 1;
            }
            Err(rejection) => {
                self.rejected += 1;
                *self.rejections.entry(rejection.reason).or_insert(0) += 1;
            }
        }
    }

    pub fn rejected_for(&self, reason: RejectionReason) -> usize {
        self.rejections.get(&reason).copied().unwrap_or(0)
    }
}

/// Drains a normalizer over one sheet, tallying every outcome.
pub fn normalize_feed(
    normalizer: &dyn FeedNormalizer,
    raw: &RawSheet,
) -> (Vec<ProductRecord>, FeedStats) {
    let mut stats = FeedStats::new(normalizer.feed_name());
    let mut products = Vec::new();

    for outcome in normalizer.parse(raw) {
        stats.record(&outcome);
        match outcome {
            Ok(product) => products.push(product),
            Err(rejection) => debug!(
                feed = normalizer.feed_name(),
                row = rejection.row_number,
                reason = %rejection.reason,
                "row skipped"
            ),
        }
    }

    info!(
        feed = %stats.feed,
        accepted = stats.accepted,
        rejected = stats.rejected,
        rejections = ?stats.rejections,
        by_manufacturer = ?stats.by_manufacturer,
        "feed normalized"
    );

    (products, stats)
}

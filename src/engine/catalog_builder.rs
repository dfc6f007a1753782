// ==========================================
// Price Catalog - Catalog builder
// ==========================================
// Flow per run (single thread, fully in memory):
//   normalize each feed -> fill blank names -> classify lead time
//   -> concatenate -> stable sort by (manufacturer, article) -> price
// Equal (manufacturer, article) pairs are kept and only counted.
// ==========================================

use crate::config::margin_rules::MarginRules;
use crate::domain::product::{CatalogRow, FinalizedCatalog, ProductRecord};
use crate::engine::lead_time::classify;
use crate::engine::margin::MarginResolver;
use crate::engine::name_resolver::{NameCache, NameResolver};
use crate::engine::pricing::PriceEngine;
use crate::engine::stock_index::StockIndex;
use crate::importer::file_parser::RawSheet;
use crate::importer::normalizer::{normalize_feed, FeedNormalizer, FeedStats};
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Collision keys quoted in the warning log
const COLLISION_SAMPLE: usize = 5;

pub struct FeedInput {
    pub normalizer: Box<dyn FeedNormalizer>,
    pub raw: RawSheet,
}

impl FeedInput {
    pub fn new(normalizer: Box<dyn FeedNormalizer>, raw: RawSheet) -> Self {
        Self { normalizer, raw }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub feeds: Vec<FeedStats>,
    pub name_hits: usize,
    pub name_misses: usize,
    pub collisions: usize,
    pub total_rows: usize,
}

#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub catalog: FinalizedCatalog,
    pub report: BuildReport,
}

// ==========================================
// CatalogBuilder
// ==========================================
pub struct CatalogBuilder<'a> {
    stock: &'a StockIndex,
    names: &'a NameCache,
    margins: MarginResolver<'a>,
    pricing: PriceEngine,
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(
        stock: &'a StockIndex,
        names: &'a NameCache,
        margins: &'a MarginRules,
        pricing: PriceEngine,
    ) -> Self {
        Self {
            stock,
            names,
            margins: MarginResolver::new(margins),
            pricing,
        }
    }

    #[instrument(skip_all, fields(feeds = feeds.len()))]
    pub fn build(&self, feeds: &[FeedInput]) -> BuildOutput {
        let mut resolver = NameResolver::new(self.names);
        let mut records = Vec::new();
        let mut feed_stats = Vec::with_capacity(feeds.len());

        for input in feeds {
            let (mut products, stats) = normalize_feed(input.normalizer.as_ref(), &input.raw);
            for product in &mut products {
                resolver.resolve(product);
                product.lead_time = classify(&product.article, self.stock);
            }
            records.extend(products);
            feed_stats.push(stats);
        }

        info!(
            hits = resolver.hits(),
            misses = resolver.misses(),
            "names resolved"
        );

        let catalog = self.finalize(records);

        let report = BuildReport {
            feeds: feed_stats,
            name_hits: resolver.hits(),
            name_misses: resolver.misses(),
            collisions: catalog.collisions,
            total_rows: catalog.len(),
        };

        info!(
            rows = report.total_rows,
            manufacturers = catalog.manufacturer_count(),
            collisions = report.collisions,
            "catalog built"
        );

        BuildOutput { catalog, report }
    }

    /// Sorts, counts collisions and prices already enriched records.
    pub fn finalize(&self, mut records: Vec<ProductRecord>) -> FinalizedCatalog {
        sort_records(&mut records);
        let collisions = count_collisions(&records);

        let rows = records
            .into_iter()
            .map(|record| self.to_row(record))
            .collect();

        FinalizedCatalog { rows, collisions }
    }

    fn to_row(&self, record: ProductRecord) -> CatalogRow {
        let margin = self.margins.resolve(&record.article, &record.manufacturer);
        CatalogRow {
            customer_price: self.pricing.price(record.cost_basis, margin),
            fast_qty: self.stock.fast_qty(&record.article),
            standard_qty: self.stock.standard_qty(&record.article),
            manufacturer: record.manufacturer,
            article: record.article,
            name: record.name,
            cost_basis: record.cost_basis,
            lead_time: record.lead_time,
            catalog_url: record.catalog_url,
            image_url: record.image_url,
        }
    }
}

/// Stable ascending sort by (manufacturer, article)
pub fn sort_records(records: &mut [ProductRecord]) {
    records.sort_by(|a, b| a.catalog_key().cmp(&b.catalog_key()));
}

/// Rows repeating the key of the row before them; expects sorted input.
pub fn count_collisions(records: &[ProductRecord]) -> usize {
    let colliding: Vec<String> = records
        .windows(2)
        .filter(|pair| pair[0].catalog_key() == pair[1].catalog_key())
        .map(|pair| format!("{}/{}", pair[1].manufacturer, pair[1].article))
        .collect();

    if !colliding.is_empty() {
        warn!(
            collisions = colliding.len(),
            sample = ?colliding.iter().take(COLLISION_SAMPLE).collect::<Vec<_>>(),
            "duplicate (manufacturer, article) pairs kept"
        );
    }
    colliding.len()
}

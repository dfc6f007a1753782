// ==========================================
// Price Catalog - Engine layer
// ==========================================
// Pure decision rules: stock, lead time, names, margins, prices,
// and the builder that runs them over all feeds.
// ==========================================

pub mod catalog_builder;
pub mod lead_time;
pub mod margin;
pub mod name_resolver;
pub mod pricing;
pub mod stock_index;

pub use catalog_builder::{BuildOutput, BuildReport, CatalogBuilder, FeedInput};
pub use lead_time::{classify, classify_quantities};
pub use margin::{resolve_margin, MarginResolver};
pub use name_resolver::{NameCache, NameResolution, NameResolver};
pub use pricing::{compute_price, PriceEngine};
pub use stock_index::{StockIndex, WarehouseStock};

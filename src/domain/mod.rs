// ==========================================
// Price Catalog - Domain layer
// ==========================================

pub mod product;
pub mod types;

pub use product::{CatalogRow, FinalizedCatalog, ProductRecord};
pub use types::{normalize_article, LeadTimeCategory};

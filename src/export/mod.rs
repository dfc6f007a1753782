// ==========================================
// Price Catalog - Export layer
// ==========================================

pub mod catalog_exporter;
pub mod error;

pub use catalog_exporter::{CatalogExporter, ExportSummary, INTERNAL_FILE, PUBLIC_FILE};
pub use error::{ExportError, ExportResult};

// ==========================================
// Price Catalog - Import layer
// ==========================================
// Raw supplier/warehouse files -> positional sheets -> ProductRecord
// Supports: Excel, CSV
// ==========================================

pub mod brand_filtered;
pub mod data_cleaner;
pub mod error;
pub mod file_parser;
pub mod fixed_column;
pub mod normalizer;

pub use brand_filtered::BrandFilteredNormalizer;
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawSheet, UniversalFileParser};
pub use fixed_column::FixedColumnNormalizer;
pub use normalizer::{
    build_normalizer, normalize_feed, FeedNormalizer, FeedStats, RejectionReason, RowOutcome,
    RowRejection,
};

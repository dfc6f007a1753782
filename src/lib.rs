// ==========================================
// Price Catalog - Core library
// ==========================================
// Supplier spreadsheets + warehouse stock -> priced, sorted catalog
// published to a SQLite sink and two CSV views.
// ==========================================

// Localized labels (locales/*.yml)
rust_i18n::i18n!("locales", fallback = "ru");

// ==========================================
// Modules
// ==========================================

// Domain - records and categories
pub mod domain;

// Configuration - run config + settings workbook
pub mod config;

// Import - files -> positional sheets -> records
pub mod importer;

// Engine - stock, lead time, names, margins, prices
pub mod engine;

// Repository - SQLite sink and name cache
pub mod repository;

// Export - INTERNAL/PUBLIC views
pub mod export;

// Application - run orchestration
pub mod app;

// SQLite connection setup
pub mod db;

pub mod logging;
pub mod perf;
pub mod i18n;

// ==========================================
// Re-exports
// ==========================================

pub use domain::{CatalogRow, FinalizedCatalog, LeadTimeCategory, ProductRecord};

pub use config::{ConfigError, ConfigManager, MarginRules, RunConfig, Settings};

pub use engine::{
    classify, compute_price, resolve_margin, CatalogBuilder, NameCache, NameResolver,
    PriceEngine, StockIndex,
};

pub use importer::{FeedNormalizer, ImportError, RawSheet};

pub use repository::{CatalogRepository, CatalogRepositoryImpl, RepositoryError};

pub use export::{CatalogExporter, ExportError};

pub use app::{RunReport, Runner};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "price-catalog";

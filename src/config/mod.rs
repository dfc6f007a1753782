// ==========================================
// Price Catalog - Configuration layer
// ==========================================
// Run configuration (JSON) + settings workbook (xlsx).
// Every error here is fatal and surfaces before any row is read.
// ==========================================

pub mod config_manager;
pub mod error;
pub mod feed_layout;
pub mod margin_rules;
pub mod run_config;
pub mod settings;
pub mod workbook;

pub use config_manager::{default_db_path, resolve_database_path, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use feed_layout::{
    BrandFilteredSchema, CatalogFeed, FeedSchema, FixedColumnSchema, PriceBasis, SheetLayout,
    WarehouseFeed, WarehouseFeeds, WarehouseLayout, SUPPLIER_DISCOUNT_FACTOR,
};
pub use margin_rules::MarginRules;
pub use run_config::RunConfig;
pub use settings::{setting_keys, Settings};
pub use workbook::{load_settings_workbook, SettingsBundle};

// ==========================================
// Price Catalog - Logging
// ==========================================
// tracing + tracing-subscriber, filter from RUST_LOG.
// PRICE_CATALOG_LOG_FORMAT=json switches to one JSON object per line.
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_FORMAT_ENV: &str = "PRICE_CATALOG_LOG_FORMAT";

/// Initializes the global subscriber.
///
/// # Environment
/// - RUST_LOG: filter (default: info),
///   e.g. `RUST_LOG=price_catalog::importer=debug`
/// - PRICE_CATALOG_LOG_FORMAT: `json` for structured output
///
/// # Example
/// ```no_run
/// use price_catalog::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.trim().eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Test subscriber: debug level, captured by the test harness
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

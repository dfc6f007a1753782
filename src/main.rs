// ==========================================
// Price Catalog - Command line entry
// ==========================================
// Usage: price-catalog [config.json]
// Exit code 1 on configuration error or integration failure.
// ==========================================

use anyhow::Context;
use price_catalog::{logging, ConfigManager, Runner};
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_CONFIG: &str = "price_catalog.json";

fn main() -> ExitCode {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} {}", price_catalog::APP_NAME, price_catalog::VERSION);
    tracing::info!("==================================================");

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "run aborted");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<bool> {
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));

    let config = ConfigManager::load(&config_path)
        .with_context(|| format!("loading configuration {}", config_path.display()))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting runtime")?;

    let output = runtime.block_on(async { Runner::new(config).run().await })?;
    let report = &output.report;

    tracing::info!(
        run_id = %report.run_id,
        rows = report.build.total_rows,
        manufacturers = report.manufacturers,
        collisions = report.build.collisions,
        name_misses = report.build.name_misses,
        "run summary"
    );
    if let Ok(json) = serde_json::to_string(report) {
        tracing::debug!(report = %json, "run report");
    }

    Ok(report.succeeded())
}

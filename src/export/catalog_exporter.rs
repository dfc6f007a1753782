// ==========================================
// Price Catalog - Catalog views
// ==========================================
// INTERNAL.csv: full row including cost basis (staff only)
// PUBLIC.csv:   customer columns only
// Both keep the catalog order; lead time is written as localized text.
// ==========================================

use crate::domain::product::{CatalogRow, FinalizedCatalog};
use crate::export::error::{ExportError, ExportResult};
use crate::i18n::lead_time_label;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const INTERNAL_FILE: &str = "INTERNAL.csv";
pub const PUBLIC_FILE: &str = "PUBLIC.csv";

#[derive(Debug, Serialize)]
struct InternalRow<'a> {
    manufacturer: &'a str,
    article: &'a str,
    name: &'a str,
    cost_basis: f64,
    customer_price: i64,
    lead_time: String,
    catalog_url: Option<&'a str>,
    image_url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct PublicRow<'a> {
    manufacturer: &'a str,
    article: &'a str,
    name: &'a str,
    customer_price: i64,
    lead_time: String,
    catalog_url: Option<&'a str>,
    image_url: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSummary {
    pub internal_path: PathBuf,
    pub public_path: PathBuf,
    pub rows: usize,
}

pub struct CatalogExporter {
    output_dir: PathBuf,
    locale: String,
}

impl CatalogExporter {
    pub fn new(output_dir: impl Into<PathBuf>, locale: &str) -> Self {
        Self {
            output_dir: output_dir.into(),
            locale: locale.to_string(),
        }
    }

    /// Writes both views, replacing earlier files
    pub fn export(&self, catalog: &FinalizedCatalog) -> ExportResult<ExportSummary> {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| ExportError::OutputDir {
            path: self.output_dir.display().to_string(),
            source,
        })?;

        let internal_path = self.output_dir.join(INTERNAL_FILE);
        let public_path = self.output_dir.join(PUBLIC_FILE);

        write_rows(&internal_path, catalog.iter().map(|row| InternalRow {
            manufacturer: &row.manufacturer,
            article: &row.article,
            name: &row.name,
            cost_basis: row.cost_basis,
            customer_price: row.customer_price,
            lead_time: self.label(row),
            catalog_url: row.catalog_url.as_deref(),
            image_url: row.image_url.as_deref(),
        }))?;

        write_rows(&public_path, catalog.iter().map(|row| PublicRow {
            manufacturer: &row.manufacturer,
            article: &row.article,
            name: &row.name,
            customer_price: row.customer_price,
            lead_time: self.label(row),
            catalog_url: row.catalog_url.as_deref(),
            image_url: row.image_url.as_deref(),
        }))?;

        info!(
            rows = catalog.len(),
            internal = %internal_path.display(),
            public = %public_path.display(),
            "catalog views written"
        );

        Ok(ExportSummary {
            internal_path,
            public_path,
            rows: catalog.len(),
        })
    }

    fn label(&self, row: &CatalogRow) -> String {
        lead_time_label(row.lead_time, &self.locale)
    }
}

fn write_rows<T, I>(path: &Path, rows: I) -> ExportResult<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let write_err = |message: String| ExportError::Write {
        path: path.display().to_string(),
        message,
    };

    let mut writer = csv::Writer::from_path(path).map_err(|e| write_err(e.to_string()))?;
    for row in rows {
        writer.serialize(row).map_err(|e| write_err(e.to_string()))?;
    }
    writer.flush().map_err(|e| write_err(e.to_string()))?;
    Ok(())
}

// ==========================================
// Price Catalog - Export errors
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("cannot create output directory {path}: {source}")]
    OutputDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {message}")]
    Write { path: String, message: String },
}

pub type ExportResult<T> = Result<T, ExportError>;

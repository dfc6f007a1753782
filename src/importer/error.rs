// ==========================================
// Price Catalog - Importer errors
// ==========================================
// File-level failures only. Row-level problems are not errors:
// they come out of the normalizers as RowRejection values.
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    // ===== File =====
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("unsupported file format: {0} (expected .xlsx/.xls/.csv)")]
    UnsupportedFormat(String),

    #[error("file read failed: {0}")]
    FileReadError(String),

    // ===== Decoding =====
    #[error("Excel decode failed: {0}")]
    ExcelParseError(String),

    #[error("CSV decode failed: {0}")]
    CsvParseError(String),

    #[error("sheet '{sheet}' not found in {file}")]
    SheetNotFound { file: String, sheet: String },
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

pub type ImportResult<T> = Result<T, ImportError>;

// ==========================================
// Price Catalog - File parsers
// ==========================================
// Excel (.xlsx/.xls) / CSV (.csv) -> positional RawSheet.
// Supplier sheets have no stable headers, so nothing here
// interprets a header row; cells are addressed by index.
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::path::Path;

// ==========================================
// RawSheet - one decoded sheet
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Builds a sheet from string slices (fixtures, settings tables)
    pub fn from_rows(name: impl Into<String>, rows: &[&[&str]]) -> Self {
        Self::new(
            name,
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows after the header block, with their 1-based sheet row number
    pub fn data_rows(&self, header_skip_rows: usize) -> impl Iterator<Item = (usize, &[String])> {
        self.rows
            .iter()
            .enumerate()
            .skip(header_skip_rows)
            .map(|(idx, row)| (idx + 1, row.as_slice()))
    }
}

pub trait FileParser: Send + Sync {
    /// Decodes one sheet; `sheet = None` means the first sheet.
    fn parse_sheet(&self, file_path: &Path, sheet: Option<&str>) -> ImportResult<RawSheet>;
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CSV Parser
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_sheet(&self, file_path: &Path, _sheet: Option<&str>) -> ImportResult<RawSheet> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(file_path)?;

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(|v| v.trim().to_string()).collect());
        }

        let name = file_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("csv")
            .to_string();
        Ok(RawSheet::new(name, rows))
    }
}

// ==========================================
// Excel Parser
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    pub fn sheet_names(&self, file_path: &Path) -> ImportResult<Vec<String>> {
        ensure_exists(file_path)?;
        let workbook = open_workbook_auto(file_path)?;
        Ok(workbook.sheet_names())
    }
}

impl FileParser for ExcelParser {
    fn parse_sheet(&self, file_path: &Path, sheet: Option<&str>) -> ImportResult<RawSheet> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;
        let sheet_names = workbook.sheet_names();

        let sheet_name = match sheet {
            Some(name) => {
                if !sheet_names.iter().any(|s| s == name) {
                    return Err(ImportError::SheetNotFound {
                        file: file_path.display().to_string(),
                        sheet: name.to_string(),
                    });
                }
                name.to_string()
            }
            None => sheet_names.first().cloned().ok_or_else(|| {
                ImportError::ExcelParseError(format!(
                    "{} has no worksheets",
                    file_path.display()
                ))
            })?,
        };

        let range = workbook.worksheet_range(&sheet_name)?;

        // calamine trims leading empty rows/columns; restore them so that
        // configured indices stay absolute.
        let (start_row, start_col) = range.start().unwrap_or((0, 0));
        let mut rows: Vec<Vec<String>> = vec![Vec::new(); start_row as usize];
        for data_row in range.rows() {
            let mut row = vec![String::new(); start_col as usize];
            row.extend(data_row.iter().map(cell_to_string));
            rows.push(row);
        }

        Ok(RawSheet::new(sheet_name, rows))
    }
}

/// Renders a cell the way a curator sees it.
///
/// Integral floats lose the trailing ".0" so numeric article codes stay
/// stable keys ("12345", not "12345.0").
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

// ==========================================
// Universal parser (dispatch on extension)
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_sheet(&self, file_path: &Path, sheet: Option<&str>) -> ImportResult<RawSheet> {
        match extension_of(file_path).as_str() {
            "csv" => CsvParser.parse_sheet(file_path, sheet),
            "xlsx" | "xls" => ExcelParser.parse_sheet(file_path, sheet),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

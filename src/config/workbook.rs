// ==========================================
// Price Catalog - Settings workbook
// ==========================================
// Sheets (first row is a header, matched case-insensitively):
//   Settings                 parameter | value            (required)
//   Margins_by_Manufacturer  manufacturer | margin        (required)
//   Margins_by_Article       article | margin             (required)
//   Config                   sheet_name | manufacturer | start_row |
//                            col_article | col_name | col_price (optional)
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::feed_layout::SheetLayout;
use crate::config::margin_rules::{MarginRules, ARTICLE_MARGIN_SHEET, MANUFACTURER_MARGIN_SHEET};
use crate::config::settings::Settings;
use crate::importer::data_cleaner::{cell_text, parse_number};
use crate::importer::file_parser::{ExcelParser, FileParser, RawSheet};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

pub const SETTINGS_SHEET: &str = "Settings";
pub const SHEET_LAYOUT_SHEET: &str = "Config";

/// Everything the settings workbook carries, validated
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsBundle {
    pub settings: Settings,
    pub margins: MarginRules,
    pub sheet_layouts: Vec<SheetLayout>,
}

pub fn load_settings_workbook(path: &Path) -> ConfigResult<SettingsBundle> {
    let source = path.display().to_string();
    let parser = ExcelParser;
    let sheet_names = parser
        .sheet_names(path)
        .map_err(|e| ConfigError::source_error(source.clone(), e))?;

    let read = |name: &str| -> ConfigResult<Option<RawSheet>> {
        if !sheet_names.iter().any(|s| s == name) {
            return Ok(None);
        }
        parser
            .parse_sheet(path, Some(name))
            .map(Some)
            .map_err(|e| ConfigError::source_error(source.clone(), e))
    };

    let settings = read(SETTINGS_SHEET)?.ok_or_else(|| ConfigError::Source {
        path: source.clone(),
        message: format!("sheet '{}' not found", SETTINGS_SHEET),
    })?;
    let by_manufacturer = read(MANUFACTURER_MARGIN_SHEET)?;
    let by_article = read(ARTICLE_MARGIN_SHEET)?;
    let layouts = read(SHEET_LAYOUT_SHEET)?;

    let bundle = bundle_from_sheets(
        &settings,
        by_manufacturer.as_ref(),
        by_article.as_ref(),
        layouts.as_ref(),
    )?;

    info!(
        path = %source,
        manufacturer_margins = bundle.margins.by_manufacturer.len(),
        article_margins = bundle.margins.by_article.len(),
        sheet_layouts = bundle.sheet_layouts.len(),
        "settings workbook loaded"
    );
    Ok(bundle)
}

/// Builds the bundle from already decoded sheets.
pub fn bundle_from_sheets(
    settings_sheet: &RawSheet,
    by_manufacturer: Option<&RawSheet>,
    by_article: Option<&RawSheet>,
    layouts: Option<&RawSheet>,
) -> ConfigResult<SettingsBundle> {
    let columns = header_columns(settings_sheet, &["parameter", "value"])?;
    let mut raw = HashMap::new();
    for (_, row) in settings_sheet.data_rows(1) {
        if let Some(key) = cell_text(row, columns[0]) {
            let value = cell_text(row, columns[1]).unwrap_or_default();
            raw.insert(key.to_string(), value.to_string());
        }
    }
    let settings = Settings::from_map(&raw)?;

    let by_manufacturer = by_manufacturer.ok_or_else(|| ConfigError::MissingMarginTable {
        sheet: MANUFACTURER_MARGIN_SHEET.to_string(),
    })?;
    let by_article = by_article.ok_or_else(|| ConfigError::MissingMarginTable {
        sheet: ARTICLE_MARGIN_SHEET.to_string(),
    })?;

    let mut margins = MarginRules::new(settings.global_margin);
    margins.load_manufacturer_rows(key_value_rows(by_manufacturer, "manufacturer", "margin")?)?;
    margins.load_article_rows(key_value_rows(by_article, "article", "margin")?)?;

    let sheet_layouts = match layouts {
        Some(sheet) => parse_sheet_layouts(sheet)?,
        None => Vec::new(),
    };

    Ok(SettingsBundle {
        settings,
        margins,
        sheet_layouts,
    })
}

/// Column index of each named header, in the order asked for
fn header_columns(sheet: &RawSheet, names: &[&str]) -> ConfigResult<Vec<usize>> {
    let header: Vec<String> = sheet
        .rows
        .first()
        .map(|r| r.iter().map(|c| c.trim().to_lowercase()).collect())
        .unwrap_or_default();

    names
        .iter()
        .map(|name| {
            header.iter().position(|h| h == name).ok_or_else(|| {
                ConfigError::InvalidLayout(format!(
                    "sheet '{}' has no '{}' column",
                    sheet.name, name
                ))
            })
        })
        .collect()
}

fn key_value_rows<'a>(
    sheet: &'a RawSheet,
    key: &str,
    value: &str,
) -> ConfigResult<Vec<(&'a str, &'a str)>> {
    let columns = header_columns(sheet, &[key, value])?;
    Ok(sheet
        .data_rows(1)
        .map(|(_, row)| {
            (
                cell_text(row, columns[0]).unwrap_or_default(),
                cell_text(row, columns[1]).unwrap_or_default(),
            )
        })
        .collect())
}

fn parse_sheet_layouts(sheet: &RawSheet) -> ConfigResult<Vec<SheetLayout>> {
    let columns = header_columns(
        sheet,
        &["sheet_name", "manufacturer", "start_row", "col_article", "col_name", "col_price"],
    )?;

    let mut layouts = Vec::new();
    for (row_number, row) in sheet.data_rows(1) {
        let Some(sheet_name) = cell_text(row, columns[0]) else {
            continue;
        };
        let index = |slot: usize| -> ConfigResult<usize> {
            let raw = cell_text(row, columns[slot]).unwrap_or_default();
            parse_number(raw)
                .filter(|v| *v >= 0.0 && v.fract() == 0.0)
                .map(|v| v as usize)
                .ok_or_else(|| {
                    ConfigError::InvalidLayout(format!(
                        "sheet '{}' row {}: '{}' is not a row/column number",
                        sheet.name, row_number, raw
                    ))
                })
        };

        layouts.push(SheetLayout {
            sheet_name: sheet_name.to_string(),
            manufacturer: cell_text(row, columns[1])
                .unwrap_or(sheet_name)
                .to_string(),
            start_row: index(2)?,
            col_article: index(3)?,
            col_name: index(4)?,
            col_price: index(5)?,
        });
    }
    Ok(layouts)
}

// ==========================================
// Price Catalog - Cell cleaning
// ==========================================
// TRIM / NULL normalization / tolerant number parsing.
// None of these fail: a bad cell is simply absent.
// ==========================================

/// Cell text by index; missing cells and whitespace-only cells are None
pub fn cell_text(row: &[String], column: usize) -> Option<&str> {
    row.get(column).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Parses a numeric cell written by a human.
///
/// Accepts thousands separators (space, NBSP, narrow NBSP, apostrophe)
/// and a decimal comma. Anything else, NaN and infinities are None.
pub fn parse_number(raw: &str) -> Option<f64> {
    let compact: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}' | '\u{202f}' | '\''))
        .collect();
    if compact.is_empty() {
        return None;
    }

    let normalized = if compact.contains(',') && !compact.contains('.') {
        compact.replacen(',', ".", 1)
    } else {
        compact.replace(',', "")
    };

    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

pub fn cell_number(row: &[String], column: usize) -> Option<f64> {
    cell_text(row, column).and_then(parse_number)
}

pub fn normalize_null(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

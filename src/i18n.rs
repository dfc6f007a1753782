// ==========================================
// Price Catalog - Localized labels
// ==========================================
// rust-i18n; catalogs live in locales/*.yml.
// The rust_i18n::i18n! macro is initialized in lib.rs.
// ==========================================

use crate::domain::types::LeadTimeCategory;

pub const SUPPORTED_LOCALES: &[&str] = &["ru", "en"];

/// Translates `key` for an explicit locale, without touching global state
pub fn t_for(key: &str, locale: &str) -> String {
    rust_i18n::t!(key, locale = locale).to_string()
}

/// Customer-facing lead-time text ("6-10 дней", "on request", ...).
///
/// Unknown locales fall back to the default catalog.
pub fn lead_time_label(category: LeadTimeCategory, locale: &str) -> String {
    let locale = if SUPPORTED_LOCALES.contains(&locale) {
        locale
    } else {
        SUPPORTED_LOCALES[0]
    };
    t_for(category.label_key(), locale)
}

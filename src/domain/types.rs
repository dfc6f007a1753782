// ==========================================
// Price Catalog - Domain types
// ==========================================
// Lead-time categories and the canonical article key
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Lead-time category
// ==========================================
// Derived from stock presence, never from stock depth.
// Serialized as SCREAMING_SNAKE_CASE (same as the sink column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadTimeCategory {
    Fast,      // fast warehouse has stock: 6-10 days
    Medium,    // standard warehouse has stock: 10-14 days
    OnRequest, // nowhere in stock
}

impl LeadTimeCategory {
    /// i18n key of the customer-facing label
    pub fn label_key(&self) -> &'static str {
        match self {
            LeadTimeCategory::Fast => "lead_time.fast",
            LeadTimeCategory::Medium => "lead_time.medium",
            LeadTimeCategory::OnRequest => "lead_time.on_request",
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            LeadTimeCategory::Fast => "FAST",
            LeadTimeCategory::Medium => "MEDIUM",
            LeadTimeCategory::OnRequest => "ON_REQUEST",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "FAST" => Some(LeadTimeCategory::Fast),
            "MEDIUM" => Some(LeadTimeCategory::Medium),
            "ON_REQUEST" => Some(LeadTimeCategory::OnRequest),
            _ => None,
        }
    }
}

impl fmt::Display for LeadTimeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

// ==========================================
// Article key
// ==========================================

/// Canonical matching key: trimmed + lowercased.
///
/// Stock, margin and name-cache lookups all go through this so that a
/// single spelling is shared across feeds.
pub fn normalize_article(raw: &str) -> String {
    raw.trim().to_lowercase()
}

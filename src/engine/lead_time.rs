// ==========================================
// Price Catalog - Lead-time classifier
// ==========================================
// Pure and total over (article, stock index):
//   1. fast warehouse qty > 0     -> FAST
//   2. standard warehouse qty > 0 -> MEDIUM
//   3. otherwise                  -> ON_REQUEST
// A missing article has quantity 0 in both warehouses.
// ==========================================

use crate::domain::types::LeadTimeCategory;
use crate::engine::stock_index::StockIndex;

pub fn classify(article: &str, stock: &StockIndex) -> LeadTimeCategory {
    classify_quantities(stock.fast_qty(article), stock.standard_qty(article))
}

pub fn classify_quantities(fast_qty: f64, standard_qty: f64) -> LeadTimeCategory {
    if fast_qty > 0.0 {
        return LeadTimeCategory::Fast;
    }
    if standard_qty > 0.0 {
        return LeadTimeCategory::Medium;
    }
    LeadTimeCategory::OnRequest
}

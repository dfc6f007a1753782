// ==========================================
// Price Catalog - Margin resolver
// ==========================================
// Fixed lookup order, first match wins:
//   article -> manufacturer -> global
// ==========================================

use crate::config::margin_rules::MarginRules;

/// Margin fraction for a canonical article of a manufacturer.
pub fn resolve_margin(article: &str, manufacturer: &str, rules: &MarginRules) -> f64 {
    if let Some(margin) = rules.by_article.get(article) {
        return *margin;
    }
    if let Some(margin) = rules.by_manufacturer.get(manufacturer) {
        return *margin;
    }
    rules.global_margin
}

pub struct MarginResolver<'a> {
    rules: &'a MarginRules,
}

impl<'a> MarginResolver<'a> {
    pub fn new(rules: &'a MarginRules) -> Self {
        Self { rules }
    }

    pub fn resolve(&self, article: &str, manufacturer: &str) -> f64 {
        resolve_margin(article, manufacturer, self.rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> MarginRules {
        MarginRules::new(0.6)
            .with_manufacturer("Jung", 0.5)
            .with_article("art1", 0.4)
    }

    #[test]
    fn test_article_override_wins() {
        assert_eq!(resolve_margin("art1", "Jung", &rules()), 0.4);
    }

    #[test]
    fn test_manufacturer_override() {
        assert_eq!(resolve_margin("art2", "Jung", &rules()), 0.5);
    }

    #[test]
    fn test_global_fallback() {
        assert_eq!(resolve_margin("art2", "Other", &rules()), 0.6);
    }

    #[test]
    fn test_article_override_applies_to_any_manufacturer() {
        let r = rules();
        let resolver = MarginResolver::new(&r);
        assert_eq!(resolver.resolve("art1", "Other"), 0.4);
    }

    #[test]
    fn test_zero_override_is_still_a_match() {
        let r = MarginRules::new(0.6).with_manufacturer("Promo", 0.0);
        assert_eq!(resolve_margin("a", "Promo", &r), 0.0);
    }
}

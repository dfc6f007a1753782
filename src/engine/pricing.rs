// ==========================================
// Price Catalog - Price engine
// ==========================================
// customer_price = round(cost_basis * (1 + margin) / exchange_rate)
// Rounding: nearest integer, exact halves to the even neighbour
// (15 * 1.5 / 5 = 4.5 -> 4, 25 * 1.5 / 5 = 7.5 -> 8).
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::settings::setting_keys;

pub fn compute_price(cost_basis: f64, margin_fraction: f64, exchange_rate: f64) -> i64 {
    (cost_basis * (1.0 + margin_fraction) / exchange_rate).round_ties_even() as i64
}

/// Pricing with a validated exchange rate.
///
/// A zero, negative or non-finite rate is a configuration error raised
/// at construction, never per row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceEngine {
    exchange_rate: f64,
}

impl PriceEngine {
    pub fn new(exchange_rate: f64) -> ConfigResult<Self> {
        if !exchange_rate.is_finite() || exchange_rate <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: setting_keys::EXCHANGE_RATE.to_string(),
                value: exchange_rate.to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(Self { exchange_rate })
    }

    pub fn exchange_rate(&self) -> f64 {
        self.exchange_rate
    }

    pub fn price(&self, cost_basis: f64, margin_fraction: f64) -> i64 {
        compute_price(cost_basis, margin_fraction, self.exchange_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_vectors() {
        assert_eq!(compute_price(6000.0, 0.6, 5.0), 1920);
        assert_eq!(compute_price(6000.0, 0.5, 5.0), 1800);
        assert_eq!(compute_price(6000.0, 0.4, 5.0), 1680);
    }

    #[test]
    fn test_non_exact_division_rounds_down_below_half() {
        // 1000 * 1.6 / 3 = 533.333...
        assert_eq!(compute_price(1000.0, 0.6, 3.0), 533);
    }

    #[test]
    fn test_rounds_up_above_half() {
        // 1000 * 2 / 3 = 666.666...
        assert_eq!(compute_price(1000.0, 1.0, 3.0), 667);
    }

    #[test]
    fn test_exact_halves_round_to_even() {
        assert_eq!(compute_price(15.0, 0.5, 5.0), 4);
        assert_eq!(compute_price(25.0, 0.5, 5.0), 8);
        assert_eq!(compute_price(5.0, 0.0, 2.0), 2);
        assert_eq!(compute_price(7.0, 0.0, 2.0), 4);
    }

    #[test]
    fn test_engine_rejects_zero_rate() {
        let err = PriceEngine::new(0.0).unwrap_err();
        assert!(err.to_string().contains("exchange_rate"));
        assert!(PriceEngine::new(f64::NAN).is_err());
    }

    #[test]
    fn test_engine_prices() {
        let engine = PriceEngine::new(5.0).unwrap();
        assert_eq!(engine.price(6000.0, 0.6), 1920);
        assert_eq!(engine.exchange_rate(), 5.0);
    }
}

use riskmetric_core::{stats, PriceRange};
use serde::{Deserialize, Serialize};

use crate::risk::risk_from_price;

const FULL_HISTORY: f64 = 1000.0;
const STABILITY_WINDOW: usize = 30;
const STABILITY_PENALTY: f64 = 10.0;

/// The four factors behind a confidence score, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceFactors {
    pub data_sufficiency: f64,
    pub position: f64,
    pub historical_coverage: f64,
    pub stability: f64,
}

impl ConfidenceFactors {
    pub fn evaluate(prices: &[f64], current_price: f64, bounds: PriceRange) -> Self {
        let data_sufficiency = (prices.len() as f64 / FULL_HISTORY).min(1.0);

        let risk = risk_from_price(current_price, bounds.min, bounds.max);
        let position = (1.0 - (risk - 0.5).abs() * 2.0).clamp(0.0, 1.0);

        let historical_coverage = if prices.is_empty() {
            0.0
        } else {
            prices.iter().filter(|p| bounds.contains(**p)).count() as f64 / prices.len() as f64
        };

        let recent = &prices[prices.len().saturating_sub(STABILITY_WINDOW)..];
        let recent_mean = stats::mean(recent);
        let stability = if recent_mean > 0.0 {
            let relative_vol = stats::std_dev(recent) / recent_mean;
            (1.0 - STABILITY_PENALTY * relative_vol).max(0.0)
        } else {
            0.0
        };

        Self {
            data_sufficiency,
            position,
            historical_coverage,
            stability,
        }
    }

    /// Geometric mean of the four factors.
    pub fn combined(&self) -> f64 {
        let product =
            self.data_sufficiency * self.position * self.historical_coverage * self.stability;
        if !product.is_finite() || product <= 0.0 {
            return 0.0;
        }
        product.powf(0.25).clamp(0.0, 1.0)
    }
}

/// Reliability of `bounds` for the given history and current price, in [0, 1].
pub fn confidence_score(prices: &[f64], current_price: f64, bounds: PriceRange) -> f64 {
    ConfidenceFactors::evaluate(prices, current_price, bounds).combined()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_ideal_inputs_score_one() {
        let prices = vec![100.0; 1000];
        let bounds = PriceRange::new(50.0, 200.0);
        // 100 is the geometric mean of 50 and 200
        let factors = ConfidenceFactors::evaluate(&prices, 100.0, bounds);
        assert_abs_diff_eq!(factors.data_sufficiency, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(factors.position, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(factors.historical_coverage, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(factors.stability, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(factors.combined(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_geometric_mean() {
        let factors = ConfidenceFactors {
            data_sufficiency: 0.5,
            position: 1.0,
            historical_coverage: 0.5,
            stability: 1.0,
        };
        assert_abs_diff_eq!(factors.combined(), 0.5_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_price_at_edge_zeroes_confidence() {
        let prices = vec![100.0; 500];
        assert_eq!(confidence_score(&prices, 200.0, PriceRange::new(50.0, 200.0)), 0.0);
    }

    #[test]
    fn test_volatile_tail_penalised() {
        let mut prices = vec![100.0; 200];
        for (i, p) in prices.iter_mut().rev().take(30).enumerate() {
            *p = if i % 2 == 0 { 80.0 } else { 120.0 };
        }
        let factors = ConfidenceFactors::evaluate(&prices, 100.0, PriceRange::new(50.0, 200.0));
        // relative vol 0.2 -> 1 - 10 * 0.2 < 0
        assert_eq!(factors.stability, 0.0);
        assert_eq!(factors.combined(), 0.0);
    }

    #[test]
    fn test_always_in_unit_interval() {
        let prices: Vec<f64> = (1..=300).map(|v| v as f64).collect();
        for current in [0.5, 10.0, 150.0, 299.0, 5000.0] {
            let c = confidence_score(&prices, current, PriceRange::new(20.0, 280.0));
            assert!((0.0..=1.0).contains(&c), "current {} -> {}", current, c);
        }
    }
}

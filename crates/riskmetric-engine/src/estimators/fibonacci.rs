use riskmetric_core::{stats, BoundsEstimator, BoundsMethod, PriceRange};
use serde::{Deserialize, Serialize};

use super::historical_range;

const LOW_DISCOUNT: f64 = 0.9;
const EXTENSION_RATIO: f64 = 0.272;

/// Retracement ratios followed by the 127.2% and 161.8% extensions.
const LEVEL_RATIOS: [f64; 9] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0, 1.272, 1.618];

/// A Fibonacci ratio and the price it lands on, measured up from the historical low.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FibonacciLevel {
    pub ratio: f64,
    pub price: f64,
}

/// Full Fibonacci ladder over the historical range, ascending by ratio.
pub fn fibonacci_levels(prices: &[f64]) -> Vec<FibonacciLevel> {
    if prices.is_empty() {
        return Vec::new();
    }
    let low = stats::min_value(prices);
    let range = stats::max_value(prices) - low;
    LEVEL_RATIOS
        .iter()
        .map(|&ratio| FibonacciLevel {
            ratio,
            price: low + ratio * range,
        })
        .collect()
}

/// 90% of the historical low up to the 127.2% extension of the range.
pub struct FibonacciEstimator;

impl BoundsEstimator for FibonacciEstimator {
    fn method(&self) -> BoundsMethod {
        BoundsMethod::FibonacciLevels
    }

    fn estimate(&self, prices: &[f64], _days: &[f64]) -> PriceRange {
        let historical = historical_range(prices);
        PriceRange::new(
            historical.min * LOW_DISCOUNT,
            historical.max + EXTENSION_RATIO * historical.width(),
        )
    }
}

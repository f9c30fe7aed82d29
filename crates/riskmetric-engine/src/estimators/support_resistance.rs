use riskmetric_core::{stats, BoundsEstimator, BoundsMethod, PriceRange};
use tracing::debug;

use super::{find_peaks, historical_range};

const PEAK_DISTANCE: usize = 20;
const PROMINENCE_FACTOR: f64 = 0.5;
const RESISTANCE_PERCENTILE: f64 = 90.0;
const SUPPORT_PERCENTILE: f64 = 10.0;
const RESISTANCE_BUFFER: f64 = 1.05;
const SUPPORT_BUFFER: f64 = 0.95;

/// Bounds from swing highs (resistance) and swing lows (support).
pub struct SupportResistanceEstimator;

impl BoundsEstimator for SupportResistanceEstimator {
    fn method(&self) -> BoundsMethod {
        BoundsMethod::SupportResistance
    }

    fn estimate(&self, prices: &[f64], _days: &[f64]) -> PriceRange {
        if prices.is_empty() {
            return historical_range(prices);
        }
        let min_prominence = PROMINENCE_FACTOR * stats::std_dev(prices);

        let resistance: Vec<f64> = find_peaks(prices, PEAK_DISTANCE, min_prominence)
            .into_iter()
            .map(|i| prices[i])
            .collect();

        let negated: Vec<f64> = prices.iter().map(|p| -p).collect();
        let support: Vec<f64> = find_peaks(&negated, PEAK_DISTANCE, min_prominence)
            .into_iter()
            .map(|i| prices[i])
            .collect();

        debug!(
            resistance_levels = resistance.len(),
            support_levels = support.len(),
            "support/resistance: swing points found"
        );

        let max = if resistance.is_empty() {
            stats::percentile(prices, 95.0)
        } else {
            stats::percentile(&resistance, RESISTANCE_PERCENTILE) * RESISTANCE_BUFFER
        };
        let min = if support.is_empty() {
            stats::percentile(prices, 5.0)
        } else {
            stats::percentile(&support, SUPPORT_PERCENTILE) * SUPPORT_BUFFER
        };

        PriceRange::new(min, max)
    }
}

use riskmetric_core::{stats, BoundsEstimator, BoundsMethod, PriceRange};
use tracing::debug;

use super::historical_range;

const SIGMA_MULTIPLIER: f64 = 2.5;
const RECENT_WINDOW: usize = 20;
const MAX_VOLATILITY_EXPANSION: f64 = 0.10;
const MIN_LOG_SPREAD: f64 = 1e-12;

/// Log-normal bounds: `exp(mean_log ± 2.5 σ_log)`, widened by up to 10%
/// when recent volatility runs hot relative to the whole history.
pub struct DistributionEstimator;

impl BoundsEstimator for DistributionEstimator {
    fn method(&self) -> BoundsMethod {
        BoundsMethod::StatisticalDistribution
    }

    fn estimate(&self, prices: &[f64], _days: &[f64]) -> PriceRange {
        let log_prices: Vec<f64> = prices
            .iter()
            .filter(|p| p.is_finite() && **p > 0.0)
            .map(|p| p.ln())
            .collect();

        let std_log = stats::std_dev(&log_prices);
        if std_log < MIN_LOG_SPREAD {
            debug!(points = log_prices.len(), "distribution: zero variance");
            return historical_range(prices);
        }
        let mean_log = stats::mean(&log_prices);

        let lower = (mean_log - SIGMA_MULTIPLIER * std_log).exp();
        let upper = (mean_log + SIGMA_MULTIPLIER * std_log).exp();

        let recent = &log_prices[log_prices.len().saturating_sub(RECENT_WINDOW)..];
        let expansion = volatility_expansion(stats::std_dev(recent), std_log);

        PriceRange::new(lower * (1.0 - expansion), upper * (1.0 + expansion))
    }
}

fn volatility_expansion(recent_std: f64, full_std: f64) -> f64 {
    if full_std <= 0.0 {
        return 0.0;
    }
    (MAX_VOLATILITY_EXPANSION * recent_std / full_std).clamp(0.0, MAX_VOLATILITY_EXPANSION)
}

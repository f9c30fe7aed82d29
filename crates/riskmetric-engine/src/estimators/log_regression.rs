use riskmetric_core::{stats, BoundsEstimator, BoundsMethod, PriceRange};
use tracing::debug;

use super::historical_range;

const MIN_POINTS: usize = 10;
const SIGMA_MULTIPLIER: f64 = 2.0;
const LOWER_PERCENTILE: f64 = 5.0;
const UPPER_PERCENTILE: f64 = 95.0;

/// Power-law fit of `ln(price)` against `ln(day_index)`.
///
/// Two bands are built around the fitted value at the latest day: one at
/// ±2σ of the residuals, one from the 5th/95th residual percentiles. The
/// tighter of the two (their intersection) is returned.
pub struct LogRegressionEstimator;

impl BoundsEstimator for LogRegressionEstimator {
    fn method(&self) -> BoundsMethod {
        BoundsMethod::LogarithmicRegression
    }

    fn estimate(&self, prices: &[f64], days: &[f64]) -> PriceRange {
        // day_index = elapsed days + 1 so the first observation maps to ln(1) = 0
        let (log_days, log_prices): (Vec<f64>, Vec<f64>) = days
            .iter()
            .zip(prices)
            .map(|(d, p)| (d + 1.0, *p))
            .filter(|(d, p)| *d > 0.0 && *p > 0.0 && d.is_finite() && p.is_finite())
            .map(|(d, p)| (d.ln(), p.ln()))
            .unzip();

        if log_days.len() < MIN_POINTS {
            debug!(points = log_days.len(), "log regression: too few valid points");
            return historical_range(prices);
        }

        let Some(fit) = stats::linear_fit(&log_days, &log_prices) else {
            debug!("log regression: degenerate day axis");
            return historical_range(prices);
        };

        let residuals: Vec<f64> = log_days
            .iter()
            .zip(&log_prices)
            .map(|(x, y)| y - fit.predict(*x))
            .collect();

        let latest_day = log_days.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let center = fit.predict(latest_day);

        let sigma = stats::std_dev(&residuals);
        let sigma_lower = center - SIGMA_MULTIPLIER * sigma;
        let sigma_upper = center + SIGMA_MULTIPLIER * sigma;

        let pct_lower = center + stats::percentile(&residuals, LOWER_PERCENTILE);
        let pct_upper = center + stats::percentile(&residuals, UPPER_PERCENTILE);

        PriceRange::new(
            sigma_lower.max(pct_lower).exp(),
            sigma_upper.min(pct_upper).exp(),
        )
    }
}

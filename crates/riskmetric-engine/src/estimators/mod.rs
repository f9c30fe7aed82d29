//! The five independent bound estimators.
//!
//! Each one turns a price series into a candidate (min, max). They never
//! fail; a method whose preconditions are not met answers with the plain
//! historical range, and [`run_estimator`] replaces any non-finite or
//! non-positive answer the same way before it reaches the aggregator.

mod cycle;
mod distribution;
mod fibonacci;
mod log_regression;
mod peaks;
mod support_resistance;

pub use cycle::CycleEstimator;
pub use distribution::DistributionEstimator;
pub use fibonacci::{fibonacci_levels, FibonacciEstimator, FibonacciLevel};
pub use log_regression::LogRegressionEstimator;
pub use peaks::find_peaks;
pub use support_resistance::SupportResistanceEstimator;

use riskmetric_core::{stats, BoundsEstimator, PriceRange};
use tracing::warn;

/// Plain historical (min, max) of the series.
pub fn historical_range(prices: &[f64]) -> PriceRange {
    if prices.is_empty() {
        return PriceRange::new(0.0, 0.0);
    }
    PriceRange::new(stats::min_value(prices), stats::max_value(prices))
}

/// All five estimators in their canonical order.
pub fn default_estimators() -> Vec<Box<dyn BoundsEstimator>> {
    vec![
        Box::new(LogRegressionEstimator),
        Box::new(DistributionEstimator),
        Box::new(SupportResistanceEstimator),
        Box::new(FibonacciEstimator),
        Box::new(CycleEstimator),
    ]
}

/// Run one estimator, substituting the historical range for unusable output.
pub fn run_estimator(estimator: &dyn BoundsEstimator, prices: &[f64], days: &[f64]) -> PriceRange {
    let candidate = estimator.estimate(prices, days);
    if candidate.is_finite_positive() {
        return candidate;
    }
    warn!(
        method = %estimator.method(),
        min = candidate.min,
        max = candidate.max,
        "estimator produced unusable bounds, using historical range"
    );
    historical_range(prices)
}

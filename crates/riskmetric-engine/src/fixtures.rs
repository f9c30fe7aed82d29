//! Deterministic price histories for tests.

use chrono::{Duration, TimeZone, Utc};
use riskmetric_core::PricePoint;

/// Exponential uptrend with a 90-day cycle and a faster ripple on top.
pub fn cyclical_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|t| {
            let t = t as f64;
            let trend = 100.0 * (0.002 * t).exp();
            let cycle = 1.0 + 0.25 * (2.0 * std::f64::consts::PI * t / 90.0).sin();
            let ripple = 1.0 + 0.03 * (1.7 * t).sin();
            trend * cycle * ripple
        })
        .collect()
}

/// Wrap closes into daily price points starting 2020-01-01.
pub fn daily_history(closes: &[f64]) -> Vec<PricePoint> {
    let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| PricePoint::new(start + Duration::days(i as i64), *close))
        .collect()
}

/// Elapsed days aligned with `n` daily observations.
pub fn daily_offsets(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}

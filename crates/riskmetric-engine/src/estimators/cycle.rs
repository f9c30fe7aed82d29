use std::f64::consts::PI;

use nalgebra::Complex;
use riskmetric_core::{stats, BoundsEstimator, BoundsMethod, PriceRange};
use tracing::debug;

use super::historical_range;

const MIN_POINTS: usize = 4;
const TREND_SCALE: f64 = 0.5;
const MIN_MAGNITUDE: f64 = 1e-9;

/// Cycle-averaged bounds.
///
/// The dominant period of the detrended series is read off its spectrum;
/// a window of that length slides across the history and the per-window
/// extremes are averaged, then shifted by half of the last full cycle's move.
pub struct CycleEstimator;

impl BoundsEstimator for CycleEstimator {
    fn method(&self) -> BoundsMethod {
        BoundsMethod::CycleAnalysis
    }

    fn estimate(&self, prices: &[f64], _days: &[f64]) -> PriceRange {
        let n = prices.len();
        if n < MIN_POINTS {
            return historical_range(prices);
        }

        let period = dominant_period(&detrend(prices)).unwrap_or(n).clamp(2, n);

        let (min_sum, max_sum, windows) =
            prices
                .windows(period)
                .fold((0.0, 0.0, 0usize), |(lo, hi, count), w| {
                    (lo + stats::min_value(w), hi + stats::max_value(w), count + 1)
                });
        if windows == 0 {
            return historical_range(prices);
        }
        let avg_min = min_sum / windows as f64;
        let avg_max = max_sum / windows as f64;

        let change = last_cycle_change(prices, period);
        let factor = 1.0 + TREND_SCALE * change;
        debug!(period, windows, change, "cycle analysis");

        PriceRange::new(avg_min * factor, avg_max * factor)
    }
}

/// Residual of the series around its least-squares line over sample index.
fn detrend(prices: &[f64]) -> Vec<f64> {
    let x: Vec<f64> = (0..prices.len()).map(|i| i as f64).collect();
    match stats::linear_fit(&x, prices) {
        Some(fit) => x.iter().zip(prices).map(|(xi, p)| p - fit.predict(*xi)).collect(),
        None => {
            let m = stats::mean(prices);
            prices.iter().map(|p| p - m).collect()
        }
    }
}

/// Period (in samples) of the strongest non-DC frequency, `None` when the
/// spectrum carries no energy.
fn dominant_period(residual: &[f64]) -> Option<usize> {
    let n = residual.len();
    if n < MIN_POINTS {
        return None;
    }

    let mut best: Option<(usize, f64)> = None;
    for k in 1..=n / 2 {
        let coefficient: Complex<f64> = residual
            .iter()
            .enumerate()
            .map(|(t, v)| {
                let angle = -2.0 * PI * ((k * t) % n) as f64 / n as f64;
                Complex::from_polar(*v, angle)
            })
            .sum();
        let magnitude = coefficient.norm();
        if best.map_or(true, |(_, m)| magnitude > m) {
            best = Some((k, magnitude));
        }
    }

    match best {
        Some((k, magnitude)) if magnitude.is_finite() && magnitude > MIN_MAGNITUDE => {
            Some(((n as f64 / k as f64).round() as usize).max(1))
        }
        _ => None,
    }
}

/// Fractional change across the most recent `period` samples, measured from
/// the first sample of that cycle to the last. 0 when fewer than `period`
/// samples exist.
fn last_cycle_change(prices: &[f64], period: usize) -> f64 {
    let n = prices.len();
    if period == 0 || n < period {
        return 0.0;
    }
    let base = prices[n - period];
    if base <= 0.0 || !base.is_finite() {
        return 0.0;
    }
    (prices[n - 1] - base) / base
}

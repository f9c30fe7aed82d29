//! Numeric helpers shared by the bounds estimators.
//!
//! Every helper is total: empty or degenerate input yields a neutral value
//! (or `None`) instead of NaN, so callers can branch on the result rather
//! than inspect floating-point state after the fact.

use nalgebra::{DMatrix, DVector};
use statrs::statistics::Statistics;

/// Mean of a slice, 0.0 when empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.mean()
}

/// Population standard deviation, 0.0 for fewer than two samples.
pub fn std_dev(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let sd = data.population_std_dev();
    if sd.is_finite() {
        sd
    } else {
        0.0
    }
}

pub fn min_value(data: &[f64]) -> f64 {
    data.iter().copied().fold(f64::INFINITY, f64::min)
}

pub fn max_value(data: &[f64]) -> f64 {
    data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Percentile (0-100 scale) with linear interpolation between the closest ranks.
pub fn percentile(data: &[f64], pct: f64) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut sorted: Vec<f64> = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    percentile_sorted(&sorted, pct)
}

/// Same as [`percentile`] for data that is already sorted ascending.
pub fn percentile_sorted(sorted: &[f64], pct: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (pct.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Ordinary least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Least-squares fit solved through the normal equations.
///
/// Returns `None` when the inputs differ in length, hold fewer than two
/// points, or `x` has no spread (the system is singular).
pub fn linear_fit(x: &[f64], y: &[f64]) -> Option<LinearFit> {
    let n = x.len();
    if n < 2 || n != y.len() {
        return None;
    }
    if max_value(x) - min_value(x) < f64::EPSILON {
        return None;
    }

    let design = DMatrix::from_fn(n, 2, |r, c| if c == 0 { x[r] } else { 1.0 });
    let target = DVector::from_column_slice(y);
    let xt = design.transpose();
    let normal = &xt * &design;
    let rhs = &xt * &target;
    let coeffs = normal.cholesky()?.solve(&rhs);

    let slope = coeffs[0];
    let intercept = coeffs[1];
    if !slope.is_finite() || !intercept.is_finite() {
        return None;
    }

    let y_mean = mean(y);
    let ss_tot: f64 = y.iter().map(|v| (v - y_mean).powi(2)).sum();
    let ss_res: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (yi - (slope * xi + intercept)).powi(2))
        .sum();
    let r_squared = if ss_tot > f64::EPSILON {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    } else {
        1.0
    };

    Some(LinearFit {
        slope,
        intercept,
        r_squared,
    })
}

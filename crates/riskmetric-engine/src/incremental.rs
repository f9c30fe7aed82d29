use chrono::Utc;
use riskmetric_core::stats;
use tracing::{debug, warn};

use crate::aggregator::BoundsEstimate;

const BREAKOUT_BUFFER: f64 = 0.05;

impl BoundsEstimate {
    /// Fold a batch of new prices into the bounds without recomputing them.
    ///
    /// A new extreme beyond a bound moves that bound straight past it with a
    /// 5% buffer. Otherwise the bound drifts toward the batch extreme by
    /// `alpha`. Non-positive and non-finite prices are ignored.
    ///
    /// The new prices carry no timestamps, so an applied update stamps
    /// `last_updated` with the wall clock. Skipped updates leave it alone.
    pub fn apply_incremental(&mut self, new_prices: &[f64], alpha: f64) {
        let valid: Vec<f64> = new_prices
            .iter()
            .copied()
            .filter(|p| p.is_finite() && *p > 0.0)
            .collect();
        if valid.is_empty() {
            return;
        }
        let alpha = alpha.clamp(0.0, 1.0);
        let new_min = stats::min_value(&valid);
        let new_max = stats::max_value(&valid);

        let min = if new_min < self.min_price {
            debug!(symbol = %self.symbol, new_min, "incremental: new low");
            new_min * (1.0 - BREAKOUT_BUFFER)
        } else {
            self.min_price * (1.0 - alpha) + new_min * alpha
        };

        let max = if new_max > self.max_price {
            debug!(symbol = %self.symbol, new_max, "incremental: new high");
            new_max * (1.0 + BREAKOUT_BUFFER)
        } else {
            self.max_price * (1.0 - alpha) + new_max * alpha
        };

        if !(min < max) {
            warn!(symbol = %self.symbol, min, max, "incremental: update would invert bounds, skipped");
            return;
        }

        self.min_price = min;
        self.max_price = max;
        self.last_updated = Utc::now();
    }
}

/// Copy of `current` (renamed to `symbol`) with `new_prices` folded in.
pub fn update_bounds_incremental(
    symbol: &str,
    current: &BoundsEstimate,
    new_prices: &[f64],
    alpha: f64,
) -> BoundsEstimate {
    let mut updated = current.clone();
    updated.symbol = symbol.to_string();
    updated.apply_incremental(new_prices, alpha);
    updated
}

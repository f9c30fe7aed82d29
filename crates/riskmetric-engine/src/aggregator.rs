use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use riskmetric_core::{stats, BoundsMethod, PriceRange};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::MethodWeights;

/// Consensus min/max for one symbol together with the per-method candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundsEstimate {
    pub symbol: String,
    pub min_price: f64,
    pub max_price: f64,
    pub methods: BTreeMap<BoundsMethod, PriceRange>,
    pub confidence_score: f64, // 0.0 to 1.0
    pub last_updated: DateTime<Utc>,
}

impl BoundsEstimate {
    pub fn range(&self) -> PriceRange {
        PriceRange::new(self.min_price, self.max_price)
    }
}

/// Weighted sum of each method's min and max, taken independently.
pub fn weighted_consensus(
    methods: &BTreeMap<BoundsMethod, PriceRange>,
    weights: &MethodWeights,
) -> PriceRange {
    let (min, max) = methods
        .iter()
        .fold((0.0, 0.0), |(min, max), (method, range)| {
            let w = weights.weight_for(*method);
            (min + w * range.min, max + w * range.max)
        });
    PriceRange::new(min, max)
}

/// Bring raw consensus bounds into a usable shape around `current_price`.
///
/// Rules run in order, each on the previous one's output:
/// 1. inverted or empty range resets to 90%/110% of the historical extremes
/// 2. a current price under the floor pulls the floor to 95% of it
/// 3. a current price over the ceiling pushes the ceiling to 105% of it
/// 4. a spread under 20% of the current price is recentred to ±10% of its midpoint
/// 5. the floor is clamped to at least 0.2x and the ceiling to at most 5x the current price
pub fn validate_bounds(raw: PriceRange, current_price: f64, prices: &[f64]) -> PriceRange {
    let mut min = raw.min;
    let mut max = raw.max;

    if !(min < max) {
        let historical_min = stats::min_value(prices);
        let historical_max = stats::max_value(prices);
        debug!(min, max, "validation: inverted bounds, resetting to historical range");
        min = historical_min * 0.9;
        max = historical_max * 1.1;
    }

    if current_price < min {
        debug!(current_price, min, "validation: price below floor");
        min = current_price * 0.95;
    }

    if current_price > max {
        debug!(current_price, max, "validation: price above ceiling");
        max = current_price * 1.05;
    }

    if max - min < current_price * 0.2 {
        let center = (min + max) / 2.0;
        debug!(min, max, center, "validation: spread under 20%, recentring");
        min = center * 0.9;
        max = center * 1.1;
    }

    min = min.max(current_price * 0.2);
    max = max.min(current_price * 5.0);

    let validated = PriceRange::new(min, max);
    if validated.is_valid() {
        return validated;
    }
    warn!(min, max, current_price, "validation: bounds still unusable, centring on price");
    PriceRange::new(current_price * 0.8, current_price * 1.2)
}

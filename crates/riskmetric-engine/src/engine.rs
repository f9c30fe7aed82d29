use std::collections::BTreeMap;

use rayon::prelude::*;
use riskmetric_core::{BoundsEstimator, PricePoint, RiskMetricError};
use tracing::{info, warn};

use crate::aggregator::{validate_bounds, weighted_consensus, BoundsEstimate};
use crate::assessment::{assess, RiskAssessment};
use crate::confidence::confidence_score;
use crate::config::EngineConfig;
use crate::estimators::{default_estimators, run_estimator};
use crate::incremental::update_bounds_incremental;
use crate::scoring::TimeInBandTable;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

fn is_usable(point: &PricePoint) -> bool {
    point.close.is_finite() && point.close > 0.0
}

/// Stateless bounds engine. Holds only its configuration and estimator set,
/// so one instance can serve any number of symbols from any number of threads.
pub struct RiskMetricEngine {
    config: EngineConfig,
    estimators: Vec<Box<dyn BoundsEstimator>>,
}

impl RiskMetricEngine {
    pub fn new(config: EngineConfig) -> Result<Self, RiskMetricError> {
        config.validate()?;
        Ok(Self {
            config,
            estimators: default_estimators(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Consensus bounds for a full price history.
    ///
    /// Returns `None` when fewer than `min_history` usable points (finite,
    /// positive closes) are supplied. The last usable point supplies the
    /// current price for validation and confidence, and its timestamp becomes
    /// `last_updated`, so identical input always yields an identical estimate.
    pub fn compute_bounds(&self, symbol: &str, history: &[PricePoint]) -> Option<BoundsEstimate> {
        let Some(first) = history.first() else {
            warn!(symbol, "no price history supplied");
            return None;
        };
        let origin = first.timestamp;

        let (prices, days): (Vec<f64>, Vec<f64>) = history
            .iter()
            .filter(|p| is_usable(p))
            .map(|p| {
                let elapsed = (p.timestamp - origin).num_milliseconds() as f64 / MILLIS_PER_DAY;
                (p.close, elapsed)
            })
            .unzip();

        if prices.len() < self.config.min_history {
            warn!(
                symbol,
                supplied = history.len(),
                usable = prices.len(),
                required = self.config.min_history,
                "insufficient price history for bounds"
            );
            return None;
        }
        let current_price = *prices.last()?;
        let as_of = history.iter().rev().find(|p| is_usable(p))?.timestamp;

        let methods: BTreeMap<_, _> = self
            .estimators
            .iter()
            .map(|e| (e.method(), run_estimator(e.as_ref(), &prices, &days)))
            .collect();

        let consensus = weighted_consensus(&methods, &self.config.weights);
        let bounds = validate_bounds(consensus, current_price, &prices);
        let confidence = confidence_score(&prices, current_price, bounds);

        info!(
            symbol,
            points = prices.len(),
            min = bounds.min,
            max = bounds.max,
            confidence,
            "bounds computed"
        );

        Some(BoundsEstimate {
            symbol: symbol.to_string(),
            min_price: bounds.min,
            max_price: bounds.max,
            methods,
            confidence_score: confidence,
            last_updated: as_of,
        })
    }

    /// Same as [`compute_bounds`](Self::compute_bounds), with the
    /// insufficient-data sentinel surfaced as an error.
    pub fn try_compute_bounds(
        &self,
        symbol: &str,
        history: &[PricePoint],
    ) -> Result<BoundsEstimate, RiskMetricError> {
        self.compute_bounds(symbol, history).ok_or_else(|| {
            let usable = history.iter().filter(|p| is_usable(p)).count();
            RiskMetricError::InsufficientData {
                required: self.config.min_history,
                actual: usable,
            }
        })
    }

    /// [`compute_bounds`](Self::compute_bounds) for many symbols in parallel,
    /// results in input order.
    pub fn compute_bounds_batch(
        &self,
        histories: &[(String, Vec<PricePoint>)],
    ) -> Vec<(String, Option<BoundsEstimate>)> {
        histories
            .par_iter()
            .map(|(symbol, history)| (symbol.clone(), self.compute_bounds(symbol, history)))
            .collect()
    }

    pub fn update_bounds_incremental(
        &self,
        symbol: &str,
        current: &BoundsEstimate,
        new_prices: &[f64],
    ) -> BoundsEstimate {
        update_bounds_incremental(symbol, current, new_prices, self.config.smoothing_alpha)
    }

    pub fn assess(
        &self,
        symbol: &str,
        current_price: f64,
        bounds: &BoundsEstimate,
        table: &TimeInBandTable,
    ) -> RiskAssessment {
        assess(symbol, current_price, bounds, table)
    }
}

impl Default for RiskMetricEngine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            estimators: default_estimators(),
        }
    }
}

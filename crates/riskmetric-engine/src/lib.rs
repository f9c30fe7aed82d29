//! RiskMetric bounds engine
//!
//! Estimates a (min, max) price band for a symbol from five independent
//! methods, then scores where the current price sits inside it: log-scale
//! risk in [0, 1], decile band, rarity coefficient, signed score and signal.

pub mod aggregator;
pub mod assessment;
pub mod confidence;
pub mod config;
pub mod engine;
pub mod estimators;
pub mod incremental;
pub mod risk;
pub mod scoring;

#[cfg(test)]
mod fixtures;

pub use aggregator::{validate_bounds, weighted_consensus, BoundsEstimate};
pub use assessment::{assess, RiskAssessment};
pub use confidence::{confidence_score, ConfidenceFactors};
pub use config::{EngineConfig, MethodWeights};
pub use engine::RiskMetricEngine;
pub use estimators::{fibonacci_levels, FibonacciLevel};
pub use incremental::update_bounds_incremental;
pub use risk::{price_from_risk, risk_from_price};
pub use scoring::{
    band_of, band_price_range, base_score, coefficient_for, signed_score, BandHistory,
    TimeInBandTable,
};

pub use riskmetric_core::{
    BoundsMethod, PricePoint, PriceRange, RiskBand, RiskMetricError, RiskSignal,
};

use std::env;
use std::str::FromStr;

use riskmetric_core::{BoundsMethod, RiskMetricError};
use serde::{Deserialize, Serialize};

/// Consensus weights of the five estimators (must sum to 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MethodWeights {
    pub logarithmic_regression: f64,   // 0.30
    pub statistical_distribution: f64, // 0.20
    pub support_resistance: f64,       // 0.20
    pub fibonacci_levels: f64,         // 0.15
    pub cycle_analysis: f64,           // 0.15
}

impl Default for MethodWeights {
    fn default() -> Self {
        Self {
            logarithmic_regression: 0.30,
            statistical_distribution: 0.20,
            support_resistance: 0.20,
            fibonacci_levels: 0.15,
            cycle_analysis: 0.15,
        }
    }
}

impl MethodWeights {
    pub fn weight_for(&self, method: BoundsMethod) -> f64 {
        match method {
            BoundsMethod::LogarithmicRegression => self.logarithmic_regression,
            BoundsMethod::StatisticalDistribution => self.statistical_distribution,
            BoundsMethod::SupportResistance => self.support_resistance,
            BoundsMethod::FibonacciLevels => self.fibonacci_levels,
            BoundsMethod::CycleAnalysis => self.cycle_analysis,
        }
    }

    pub fn total(&self) -> f64 {
        BoundsMethod::ALL.iter().map(|m| self.weight_for(*m)).sum()
    }

    pub fn validate(&self) -> Result<(), RiskMetricError> {
        for method in BoundsMethod::ALL {
            let w = self.weight_for(method);
            if !w.is_finite() || w < 0.0 {
                return Err(RiskMetricError::InvalidConfig(format!(
                    "weight for {} must be a non-negative number, got {}",
                    method, w
                )));
            }
        }
        let total = self.total();
        if (total - 1.0).abs() > 1e-6 {
            return Err(RiskMetricError::InvalidConfig(format!(
                "method weights must sum to 1.0, got {:.6}",
                total
            )));
        }
        Ok(())
    }
}

/// Tunables of the bounds engine. Defaults are the production constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub weights: MethodWeights,
    /// Minimum number of valid price points before bounds are computed
    pub min_history: usize,
    /// Smoothing factor used when new prices stay inside the current bounds
    pub smoothing_alpha: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: MethodWeights::default(),
            min_history: 100,
            smoothing_alpha: 0.05,
        }
    }
}

impl EngineConfig {
    pub fn new(
        weights: MethodWeights,
        min_history: usize,
        smoothing_alpha: f64,
    ) -> Result<Self, RiskMetricError> {
        let config = Self {
            weights,
            min_history,
            smoothing_alpha,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RiskMetricError> {
        self.weights.validate()?;
        if self.min_history < 10 {
            return Err(RiskMetricError::InvalidConfig(format!(
                "min_history must be at least 10, got {}",
                self.min_history
            )));
        }
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return Err(RiskMetricError::InvalidConfig(format!(
                "smoothing_alpha must be in (0, 1], got {}",
                self.smoothing_alpha
            )));
        }
        Ok(())
    }

    /// Build from `RISKMETRIC_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, RiskMetricError> {
        let defaults = Self::default();
        let config = Self {
            weights: MethodWeights {
                logarithmic_regression: env_or(
                    "RISKMETRIC_WEIGHT_LOG_REGRESSION",
                    defaults.weights.logarithmic_regression,
                )?,
                statistical_distribution: env_or(
                    "RISKMETRIC_WEIGHT_DISTRIBUTION",
                    defaults.weights.statistical_distribution,
                )?,
                support_resistance: env_or(
                    "RISKMETRIC_WEIGHT_SUPPORT_RESISTANCE",
                    defaults.weights.support_resistance,
                )?,
                fibonacci_levels: env_or(
                    "RISKMETRIC_WEIGHT_FIBONACCI",
                    defaults.weights.fibonacci_levels,
                )?,
                cycle_analysis: env_or("RISKMETRIC_WEIGHT_CYCLE", defaults.weights.cycle_analysis)?,
            },
            min_history: env_or("RISKMETRIC_MIN_HISTORY", defaults.min_history)?,
            smoothing_alpha: env_or("RISKMETRIC_SMOOTHING_ALPHA", defaults.smoothing_alpha)?,
        };
        config.validate()?;
        Ok(config)
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T, RiskMetricError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().map_err(|e: T::Err| {
            RiskMetricError::InvalidConfig(format!("{}='{}': {}", key, raw, e))
        }),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_weights_sum_to_one() {
        let weights = MethodWeights::default();
        assert_abs_diff_eq!(weights.total(), 1.0, epsilon = 1e-12);
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_unbalanced_weights() {
        let weights = MethodWeights {
            logarithmic_regression: 0.5,
            ..MethodWeights::default()
        };
        let err = EngineConfig::new(weights, 100, 0.05).unwrap_err();
        assert!(matches!(err, RiskMetricError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_negative_weight() {
        let weights = MethodWeights {
            logarithmic_regression: 0.60,
            cycle_analysis: -0.15,
            ..MethodWeights::default()
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_alpha_and_history() {
        assert!(EngineConfig::new(MethodWeights::default(), 100, 0.0).is_err());
        assert!(EngineConfig::new(MethodWeights::default(), 100, 1.5).is_err());
        assert!(EngineConfig::new(MethodWeights::default(), 5, 0.05).is_err());
        assert!(EngineConfig::new(MethodWeights::default(), 250, 0.1).is_ok());
    }

    #[test]
    fn test_env_or_parses_and_defaults() {
        assert_eq!(env_or("RISKMETRIC_TEST_UNSET_KEY", 42usize).unwrap(), 42);

        env::set_var("RISKMETRIC_TEST_ALPHA_KEY", "0.25");
        assert_abs_diff_eq!(env_or("RISKMETRIC_TEST_ALPHA_KEY", 0.05).unwrap(), 0.25);

        env::set_var("RISKMETRIC_TEST_BAD_KEY", "abc");
        assert!(env_or("RISKMETRIC_TEST_BAD_KEY", 1.0f64).is_err());
    }
}

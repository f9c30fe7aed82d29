use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::RiskMetricError;

/// A single observation of a symbol's price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, close: f64) -> Self {
        Self {
            timestamp,
            close,
            high: None,
            low: None,
        }
    }
}

/// A (min, max) price pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Both ends finite and strictly positive, with `min < max`.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.min < self.max
    }

    /// Both ends finite and strictly positive; `min == max` is allowed.
    pub fn is_finite_positive(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.max >= self.min
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

/// The five independent bound estimation methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsMethod {
    LogarithmicRegression,
    StatisticalDistribution,
    SupportResistance,
    FibonacciLevels,
    CycleAnalysis,
}

impl BoundsMethod {
    pub const ALL: [BoundsMethod; 5] = [
        BoundsMethod::LogarithmicRegression,
        BoundsMethod::StatisticalDistribution,
        BoundsMethod::SupportResistance,
        BoundsMethod::FibonacciLevels,
        BoundsMethod::CycleAnalysis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BoundsMethod::LogarithmicRegression => "logarithmic_regression",
            BoundsMethod::StatisticalDistribution => "statistical_distribution",
            BoundsMethod::SupportResistance => "support_resistance",
            BoundsMethod::FibonacciLevels => "fibonacci_levels",
            BoundsMethod::CycleAnalysis => "cycle_analysis",
        }
    }
}

impl fmt::Display for BoundsMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of ten decile buckets of risk, `0` = "0.0-0.1" through `9` = "0.9-1.0".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RiskBand(u8);

impl RiskBand {
    pub const COUNT: usize = 10;

    const LABELS: [&'static str; 10] = [
        "0.0-0.1", "0.1-0.2", "0.2-0.3", "0.3-0.4", "0.4-0.5", "0.5-0.6", "0.6-0.7", "0.7-0.8",
        "0.8-0.9", "0.9-1.0",
    ];

    /// Band holding `risk`; non-finite risk is read as the 0.5 midpoint.
    pub fn from_risk(risk: f64) -> Self {
        if !risk.is_finite() {
            return RiskBand(5);
        }
        let idx = (risk * 10.0).floor().clamp(0.0, 9.0);
        RiskBand(idx as u8)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        (index < Self::COUNT).then(|| RiskBand(index as u8))
    }

    pub fn all() -> impl Iterator<Item = RiskBand> {
        (0..Self::COUNT as u8).map(RiskBand)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn label(&self) -> &'static str {
        Self::LABELS[self.index()]
    }

    /// Inclusive lower and exclusive upper risk edge of the band.
    pub fn risk_edges(&self) -> (f64, f64) {
        let lo = self.0 as f64 / 10.0;
        (lo, lo + 0.1)
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<&str> for RiskBand {
    type Error = RiskMetricError;

    fn try_from(label: &str) -> Result<Self, Self::Error> {
        Self::LABELS
            .iter()
            .position(|l| *l == label)
            .map(|i| RiskBand(i as u8))
            .ok_or_else(|| RiskMetricError::Parse(format!("unknown risk band '{}'", label)))
    }
}

impl TryFrom<String> for RiskBand {
    type Error = RiskMetricError;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        RiskBand::try_from(label.as_str())
    }
}

impl From<RiskBand> for String {
    fn from(band: RiskBand) -> Self {
        band.label().to_string()
    }
}

/// Trading signal derived from a risk value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskSignal {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

impl RiskSignal {
    /// Non-finite risk is `Neutral`, matching its 0.5 band.
    pub fn from_risk(risk: f64) -> Self {
        match risk {
            r if !r.is_finite() => RiskSignal::Neutral,
            r if r < 0.2 => RiskSignal::StrongBuy,
            r if r < 0.4 => RiskSignal::Buy,
            r if r < 0.6 => RiskSignal::Neutral,
            r if r < 0.8 => RiskSignal::Sell,
            _ => RiskSignal::StrongSell,
        }
    }

    /// Human-readable label for the signal
    pub fn to_label(&self) -> &'static str {
        match self {
            RiskSignal::StrongBuy => "Strong Buy",
            RiskSignal::Buy => "Buy",
            RiskSignal::Neutral => "Neutral",
            RiskSignal::Sell => "Sell",
            RiskSignal::StrongSell => "Strong Sell",
        }
    }
}

impl fmt::Display for RiskSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_from_risk_covers_all_deciles() {
        assert_eq!(RiskBand::from_risk(0.0).label(), "0.0-0.1");
        assert_eq!(RiskBand::from_risk(0.0999).label(), "0.0-0.1");
        assert_eq!(RiskBand::from_risk(0.1).label(), "0.1-0.2");
        assert_eq!(RiskBand::from_risk(0.95).label(), "0.9-1.0");
        assert_eq!(RiskBand::from_risk(1.0).label(), "0.9-1.0");
        assert_eq!(RiskBand::from_risk(-0.3).index(), 0);
        assert_eq!(RiskBand::from_risk(f64::NAN).label(), "0.5-0.6");
        assert_eq!(RiskBand::from_risk(f64::INFINITY), RiskBand::from_risk(0.5));
        assert_eq!(RiskBand::all().count(), 10);
    }

    #[test]
    fn test_band_label_round_trip() {
        for band in RiskBand::all() {
            assert_eq!(RiskBand::try_from(band.label()).unwrap(), band);
        }
        assert!(RiskBand::try_from("1.0-1.1").is_err());

        let json = serde_json::to_string(&RiskBand::from_risk(0.35)).unwrap();
        assert_eq!(json, "\"0.3-0.4\"");
    }

    #[test]
    fn test_signal_thresholds() {
        assert_eq!(RiskSignal::from_risk(0.0), RiskSignal::StrongBuy);
        assert_eq!(RiskSignal::from_risk(0.2), RiskSignal::Buy);
        assert_eq!(RiskSignal::from_risk(0.5), RiskSignal::Neutral);
        assert_eq!(RiskSignal::from_risk(0.6), RiskSignal::Sell);
        assert_eq!(RiskSignal::from_risk(0.8), RiskSignal::StrongSell);
        assert_eq!(RiskSignal::StrongSell.to_label(), "Strong Sell");
    }

    #[test]
    fn test_non_finite_risk_is_neutral_midpoint() {
        for risk in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(RiskSignal::from_risk(risk), RiskSignal::Neutral);
            assert_eq!(RiskBand::from_risk(risk), RiskBand::from_risk(0.5));
        }
    }

    #[test]
    fn test_price_range_validity() {
        assert!(PriceRange::new(1.0, 2.0).is_valid());
        assert!(!PriceRange::new(2.0, 2.0).is_valid());
        assert!(PriceRange::new(2.0, 2.0).is_finite_positive());
        assert!(!PriceRange::new(0.0, 2.0).is_valid());
        assert!(!PriceRange::new(1.0, f64::NAN).is_finite_positive());
    }
}

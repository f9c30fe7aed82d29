//! Risk bands, rarity coefficients and the signed trading score.
//!
//! A band is the risk decile the price currently sits in. The coefficient
//! rewards bands the symbol has rarely visited: `1 + 0.6 * (1 - days / max_days)`,
//! so it always lands in [1.0, 1.6]. The score is a symmetric ±100/±80/±60/0
//! base (positive when oversold, negative when overbought) times the coefficient.

use std::collections::BTreeMap;

use riskmetric_core::{PriceRange, RiskBand, RiskMetricError, RiskSignal};
use serde::{Deserialize, Serialize};

use crate::risk::price_from_risk;

pub const MIN_COEFFICIENT: f64 = 1.0;
pub const MAX_COEFFICIENT: f64 = 1.6;

/// Days a symbol has historically spent in each risk band.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BandHistory {
    pub bands: BTreeMap<RiskBand, u64>,
    pub total_days: u64,
}

impl BandHistory {
    pub fn days_in(&self, band: RiskBand) -> Option<u64> {
        self.bands.get(&band).copied()
    }

    pub fn max_days(&self) -> u64 {
        self.bands.values().copied().max().unwrap_or(0)
    }
}

/// Per-symbol time-in-band reference data, keyed by symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeInBandTable {
    symbols: BTreeMap<String, BandHistory>,
}

impl TimeInBandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `{ "BTC": { "bands": { "0.0-0.1": 120, ... }, "total_days": 5000 }, ... }`.
    pub fn from_json(json: &str) -> Result<Self, RiskMetricError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, RiskMetricError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn get(&self, symbol: &str) -> Option<&BandHistory> {
        self.symbols.get(symbol)
    }

    pub fn insert(&mut self, symbol: impl Into<String>, history: BandHistory) {
        self.symbols.insert(symbol.into(), history);
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(String::as_str)
    }

    /// Count one day per risk observation into the symbol's band totals.
    pub fn record(&mut self, symbol: &str, daily_risks: &[f64]) {
        let history = self.symbols.entry(symbol.to_string()).or_default();
        for risk in daily_risks.iter().filter(|r| r.is_finite()) {
            *history.bands.entry(band_of(*risk)).or_insert(0) += 1;
            history.total_days += 1;
        }
    }
}

/// Decile band of a risk value.
pub fn band_of(risk: f64) -> RiskBand {
    RiskBand::from_risk(risk)
}

/// Rarity multiplier in [1.0, 1.6]; unknown symbols or bands count as rarest.
pub fn coefficient_for(symbol: &str, band: RiskBand, table: &TimeInBandTable) -> f64 {
    let Some(history) = table.get(symbol) else {
        return MAX_COEFFICIENT;
    };
    let Some(days) = history.days_in(band) else {
        return MAX_COEFFICIENT;
    };
    let max_days = history.max_days();
    if max_days == 0 {
        return MAX_COEFFICIENT;
    }
    let rarity = 1.0 - days as f64 / max_days as f64;
    (MIN_COEFFICIENT + rarity * (MAX_COEFFICIENT - MIN_COEFFICIENT))
        .clamp(MIN_COEFFICIENT, MAX_COEFFICIENT)
}

/// Unsigned score magnitude: 100 at the extremes, 50 in the neutral middle.
pub fn base_score(risk: f64) -> f64 {
    match risk {
        r if r <= 0.15 || r >= 0.85 => 100.0,
        r if r <= 0.25 || r >= 0.75 => 80.0,
        r if r <= 0.35 || r >= 0.65 => 60.0,
        _ => 50.0,
    }
}

/// +1 oversold (risk ≤ 0.35), -1 overbought (risk ≥ 0.65), 0 in between.
pub fn score_direction(risk: f64) -> f64 {
    if risk <= 0.35 {
        1.0
    } else if risk >= 0.65 {
        -1.0
    } else {
        0.0
    }
}

/// Signed score: `direction * base_score * coefficient`.
pub fn signed_score(risk: f64, coefficient: f64) -> f64 {
    score_direction(risk) * base_score(risk) * coefficient
}

pub fn signal_for(risk: f64) -> RiskSignal {
    RiskSignal::from_risk(risk)
}

/// Price interval that maps into `band` under the given bounds.
pub fn band_price_range(band: RiskBand, bounds: PriceRange) -> PriceRange {
    let (lo, hi) = band.risk_edges();
    PriceRange::new(
        price_from_risk(lo, bounds.min, bounds.max),
        price_from_risk(hi, bounds.min, bounds.max),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::risk_from_price;
    use approx::assert_abs_diff_eq;

    fn sample_table() -> TimeInBandTable {
        TimeInBandTable::from_json(
            r#"{
                "BTC": {
                    "bands": {
                        "0.0-0.1": 30, "0.1-0.2": 120, "0.2-0.3": 400, "0.3-0.4": 600,
                        "0.4-0.5": 800, "0.5-0.6": 700, "0.6-0.7": 500, "0.7-0.8": 300,
                        "0.8-0.9": 90, "0.9-1.0": 0
                    },
                    "total_days": 3540
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_coefficient_range() {
        let table = sample_table();
        let busiest = RiskBand::try_from("0.4-0.5").unwrap();
        let never = RiskBand::try_from("0.9-1.0").unwrap();
        let rare = RiskBand::try_from("0.0-0.1").unwrap();

        assert_abs_diff_eq!(coefficient_for("BTC", busiest, &table), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(coefficient_for("BTC", never, &table), 1.6, epsilon = 1e-12);
        assert_abs_diff_eq!(
            coefficient_for("BTC", rare, &table),
            1.0 + (1.0 - 30.0 / 800.0) * 0.6,
            epsilon = 1e-12
        );
        for band in RiskBand::all() {
            let c = coefficient_for("BTC", band, &table);
            assert!((MIN_COEFFICIENT..=MAX_COEFFICIENT).contains(&c));
        }
    }

    #[test]
    fn test_unknown_symbol_or_band_is_rarest() {
        let mut table = sample_table();
        assert_eq!(coefficient_for("DOGE", band_of(0.5), &table), MAX_COEFFICIENT);

        let mut partial = BandHistory::default();
        partial.bands.insert(band_of(0.45), 10);
        table.insert("ETH", partial);
        assert_eq!(coefficient_for("ETH", band_of(0.95), &table), MAX_COEFFICIENT);
        assert_abs_diff_eq!(coefficient_for("ETH", band_of(0.45), &table), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_history_is_rarest() {
        let mut table = TimeInBandTable::new();
        let mut history = BandHistory::default();
        history.bands.insert(band_of(0.1), 0);
        table.insert("SOL", history);
        assert_eq!(coefficient_for("SOL", band_of(0.1), &table), MAX_COEFFICIENT);
    }

    #[test]
    fn test_base_score_table() {
        assert_eq!(base_score(0.0), 100.0);
        assert_eq!(base_score(0.15), 100.0);
        assert_eq!(base_score(0.2), 80.0);
        assert_eq!(base_score(0.25), 80.0);
        assert_eq!(base_score(0.3), 60.0);
        assert_eq!(base_score(0.5), 50.0);
        assert_eq!(base_score(0.7), 60.0);
        assert_eq!(base_score(0.8), 80.0);
        assert_eq!(base_score(0.85), 100.0);
        assert_eq!(base_score(1.0), 100.0);
    }

    #[test]
    fn test_signed_score_is_symmetric() {
        assert_abs_diff_eq!(signed_score(0.1, 1.2), 120.0, epsilon = 1e-12);
        assert_abs_diff_eq!(signed_score(0.9, 1.2), -120.0, epsilon = 1e-12);
        assert_abs_diff_eq!(signed_score(0.2, 1.0), 80.0, epsilon = 1e-12);
        assert_abs_diff_eq!(signed_score(0.8, 1.0), -80.0, epsilon = 1e-12);
        assert_abs_diff_eq!(signed_score(0.3, 1.5), 90.0, epsilon = 1e-12);
        assert_abs_diff_eq!(signed_score(0.7, 1.5), -90.0, epsilon = 1e-12);
        assert_eq!(signed_score(0.5, 1.6), 0.0);
    }

    #[test]
    fn test_record_builds_counts() {
        let mut table = TimeInBandTable::new();
        table.record("BTC", &[0.05, 0.07, 0.55, f64::NAN, 1.0]);
        let history = table.get("BTC").unwrap();
        assert_eq!(history.total_days, 4);
        assert_eq!(history.days_in(band_of(0.0)), Some(2));
        assert_eq!(history.days_in(band_of(0.5)), Some(1));
        assert_eq!(history.days_in(band_of(0.95)), Some(1));
        assert_eq!(table.symbols().collect::<Vec<_>>(), vec!["BTC"]);
    }

    #[test]
    fn test_json_round_trip() {
        let table = sample_table();
        let again = TimeInBandTable::from_json(&table.to_json().unwrap()).unwrap();
        assert_eq!(table, again);
        assert!(TimeInBandTable::from_json(r#"{"BTC": {"bands": {"bad": 1}, "total_days": 1}}"#).is_err());
    }

    #[test]
    fn test_band_price_range_maps_back_into_band() {
        let bounds = PriceRange::new(20_000.0, 120_000.0);
        for band in RiskBand::all() {
            let zone = band_price_range(band, bounds);
            let mid = (zone.min * zone.max).sqrt();
            assert_eq!(band_of(risk_from_price(mid, bounds.min, bounds.max)), band);
        }
    }
}

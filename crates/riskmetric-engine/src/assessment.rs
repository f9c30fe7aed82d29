use chrono::{DateTime, Utc};
use riskmetric_core::{RiskBand, RiskSignal};
use serde::{Deserialize, Serialize};

use crate::aggregator::BoundsEstimate;
use crate::risk::risk_from_price;
use crate::scoring::{base_score, coefficient_for, signal_for, signed_score, TimeInBandTable};

/// Risk reading for one symbol at one price. Derived on demand, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub symbol: String,
    pub current_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub risk_value: f64, // 0.0 to 1.0
    pub risk_band: RiskBand,
    pub coefficient: f64, // 1.0 to 1.6
    pub base_score: f64,
    pub score: f64,
    pub signal: RiskSignal,
    pub confidence_score: f64,
    pub assessed_at: DateTime<Utc>,
}

pub fn assess(
    symbol: &str,
    current_price: f64,
    bounds: &BoundsEstimate,
    table: &TimeInBandTable,
) -> RiskAssessment {
    let risk_value = risk_from_price(current_price, bounds.min_price, bounds.max_price);
    let risk_band = RiskBand::from_risk(risk_value);
    let coefficient = coefficient_for(symbol, risk_band, table);

    RiskAssessment {
        symbol: symbol.to_string(),
        current_price,
        min_price: bounds.min_price,
        max_price: bounds.max_price,
        risk_value,
        risk_band,
        coefficient,
        base_score: base_score(risk_value),
        score: signed_score(risk_value, coefficient),
        signal: signal_for(risk_value),
        confidence_score: bounds.confidence_score,
        assessed_at: Utc::now(),
    }
}

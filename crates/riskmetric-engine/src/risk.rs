/// Position of `price` between `min_price` and `max_price` on a log scale, in [0, 1].
///
/// Prices at or under the floor score 0.0 and at or over the ceiling 1.0.
/// The geometric mean of the bounds scores 0.5. A non-positive floor has
/// no logarithm, so that case interpolates linearly instead.
pub fn risk_from_price(price: f64, min_price: f64, max_price: f64) -> f64 {
    if price <= min_price {
        return 0.0;
    }
    if price >= max_price {
        return 1.0;
    }
    let risk = if min_price > 0.0 {
        (price.ln() - min_price.ln()) / (max_price.ln() - min_price.ln())
    } else {
        (price - min_price) / (max_price - min_price)
    };
    if risk.is_finite() {
        risk.clamp(0.0, 1.0)
    } else {
        0.5
    }
}

/// Inverse of [`risk_from_price`]: `exp(ln(min) + risk * (ln(max) - ln(min)))`.
pub fn price_from_risk(risk: f64, min_price: f64, max_price: f64) -> f64 {
    let risk = if risk.is_finite() { risk.clamp(0.0, 1.0) } else { 0.5 };
    if min_price > 0.0 && max_price > 0.0 {
        (min_price.ln() + risk * (max_price.ln() - min_price.ln())).exp()
    } else {
        min_price + risk * (max_price - min_price)
    }
}

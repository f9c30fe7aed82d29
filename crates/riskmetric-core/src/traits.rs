use crate::{BoundsMethod, PriceRange};

/// A single bound estimation method.
///
/// `prices` is the chronological close series and `days` the elapsed days
/// since the first observation, index-aligned with `prices`. Implementations
/// never fail: when their own preconditions are not met they return the plain
/// historical (min, max) of `prices`.
pub trait BoundsEstimator: Send + Sync {
    fn method(&self) -> BoundsMethod;

    fn estimate(&self, prices: &[f64], days: &[f64]) -> PriceRange;
}

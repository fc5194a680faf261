//! Integer suppliers.

use crate::error::{validate_bounds, GeneratorError};
use crate::supplier::ValueSupplier;
use fixture_core::FixtureValue;
use rand::Rng;

/// Uniform random integer in `[lower, upper]`.
pub fn random(lower: i32, upper: i32) -> Result<ValueSupplier, GeneratorError> {
    validate_bounds(lower, upper)?;
    Ok(ValueSupplier::from_fn(move || {
        FixtureValue::Int32(rand::rng().random_range(lower..=upper))
    }))
}

/// Uniform random multiple of `step` in `[lower, upper]`.
///
/// Fails when `step` is not positive or when no multiple of `step` lies
/// within the bounds.
pub fn multiple_of(step: i32, lower: i32, upper: i32) -> Result<ValueSupplier, GeneratorError> {
    validate_bounds(lower, upper)?;
    let (first, last) = multiple_range(step, lower, upper)?;
    Ok(ValueSupplier::from_fn(move || {
        let k = rand::rng().random_range(first..=last);
        // k * step lies within [lower, upper], so it fits an i32.
        FixtureValue::Int32((k * step as i64) as i32)
    }))
}

/// Range of multipliers `k` such that `k * step` lies in `[lower, upper]`.
fn multiple_range(step: i32, lower: i32, upper: i32) -> Result<(i64, i64), GeneratorError> {
    if step <= 0 {
        return Err(GeneratorError::InvalidPlan(format!(
            "step must be positive, got {step}"
        )));
    }
    let (step, lower, upper) = (step as i64, lower as i64, upper as i64);

    // Ceiling for the lower bound, floor for the upper; correct for negatives too.
    let first = -((-lower).div_euclid(step));
    let last = upper.div_euclid(step);
    if first > last {
        return Err(GeneratorError::InvalidPlan(format!(
            "no multiple of {step} fits between {lower} and {upper}"
        )));
    }
    Ok((first, last))
}

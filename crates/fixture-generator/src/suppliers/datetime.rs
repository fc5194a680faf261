//! Date-time suppliers.

use crate::error::{validate_bounds, GeneratorError};
use crate::supplier::ValueSupplier;
use chrono::{DateTime, NaiveDateTime};
use fixture_core::FixtureValue;
use rand::Rng;

/// Uniform random date-time in `[lower, upper]`, with whole-second resolution.
pub fn random(
    lower: NaiveDateTime,
    upper: NaiveDateTime,
) -> Result<ValueSupplier, GeneratorError> {
    validate_bounds(lower, upper)?;
    let lower_utc = lower.and_utc();
    // Round the lower bound up so no whole second falls below it.
    let low = lower_utc.timestamp() + i64::from(lower_utc.timestamp_subsec_nanos() > 0);
    let high = upper.and_utc().timestamp();
    if low > high {
        return Err(GeneratorError::invalid_plan(format!(
            "no whole second between {lower} and {upper}"
        )));
    }
    Ok(ValueSupplier::from_fn(move || {
        let secs = rand::rng().random_range(low..=high);
        let value = DateTime::from_timestamp(secs, 0)
            .map(|dt| dt.naive_utc())
            .unwrap_or(lower);
        FixtureValue::DateTime(value)
    }))
}

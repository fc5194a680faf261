//! Date suppliers.

use crate::error::{validate_bounds, GeneratorError};
use crate::supplier::ValueSupplier;
use chrono::{Days, NaiveDate};
use fixture_core::FixtureValue;
use rand::Rng;

/// Uniform random date in `[lower, upper]`.
pub fn random(lower: NaiveDate, upper: NaiveDate) -> Result<ValueSupplier, GeneratorError> {
    validate_bounds(lower, upper)?;
    let span = (upper - lower).num_days() as u64;
    Ok(ValueSupplier::from_fn(move || {
        let offset = rand::rng().random_range(0..=span);
        // The offset never exceeds the span, so the result stays within bounds.
        FixtureValue::Date(lower.checked_add_days(Days::new(offset)).unwrap_or(upper))
    }))
}

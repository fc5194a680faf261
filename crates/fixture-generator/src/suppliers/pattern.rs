//! Index-based suppliers.
//!
//! `pattern` supports placeholders:
//! - `{index}` - row index
//! - `{uuid}` - random UUID

use crate::supplier::ValueSupplier;
use fixture_core::FixtureValue;
use uuid::Uuid;

/// `start + index * step`, or `Null` once the value no longer fits an `i64`.
pub fn sequential(start: i64, step: i64) -> ValueSupplier {
    ValueSupplier::from_index(move |index| {
        sequential_value(start, step, index).map_or(FixtureValue::Null, FixtureValue::Int64)
    })
}

/// The `index`-th value of a sequence, if it does not overflow.
pub(crate) fn sequential_value(start: i64, step: i64, index: usize) -> Option<i64> {
    i64::try_from(index)
        .ok()
        .and_then(|index| index.checked_mul(step))
        .and_then(|offset| start.checked_add(offset))
}

/// Text built from a pattern with placeholders.
pub fn pattern(pattern: impl Into<String>) -> ValueSupplier {
    let pattern = pattern.into();
    ValueSupplier::from_index(move |index| FixtureValue::Text(render_pattern(&pattern, index)))
}

fn render_pattern(pattern: &str, index: usize) -> String {
    let mut result = pattern.replace("{index}", &index.to_string());
    while result.contains("{uuid}") {
        result = result.replacen("{uuid}", &Uuid::new_v4().to_string(), 1);
    }
    result
}

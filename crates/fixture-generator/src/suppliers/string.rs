//! String suppliers.

use crate::error::{validate_bounds, GeneratorError};
use crate::supplier::ValueSupplier;
use fixture_core::FixtureValue;
use rand::Rng;
use uuid::Uuid;

/// Random text with a length in `[min_len, max_len]`, built from UUID v4 tokens.
pub fn random(min_len: usize, max_len: usize) -> Result<ValueSupplier, GeneratorError> {
    validate_bounds(min_len, max_len)?;
    Ok(ValueSupplier::from_fn(move || {
        FixtureValue::Text(random_text(min_len, max_len))
    }))
}

/// Random text with a length in `[1, max_len]`.
pub fn random_up_to(max_len: usize) -> Result<ValueSupplier, GeneratorError> {
    random(1, max_len)
}

fn random_text(min_len: usize, max_len: usize) -> String {
    let len = rand::rng().random_range(min_len..=max_len);
    let mut s = String::with_capacity(len + 36);
    while s.len() < len {
        s.push_str(&Uuid::new_v4().to_string());
    }
    s.truncate(len);
    s
}

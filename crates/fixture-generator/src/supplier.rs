//! The per-column value generation contract.
//!
//! Every column rule, whether it is a constant, a cycle of constants, an
//! index function or a previous-value-aware function, is a [`ValueSupplier`]:
//! a function of the zero-based row index and the value resolved for the same
//! column on the previous row (`None` on the first row).

use fixture_core::FixtureValue;
use std::fmt;
use std::sync::Arc;

type SupplierFn = dyn Fn(usize, Option<&FixtureValue>) -> FixtureValue + Send + Sync;

/// A shareable column value function.
#[derive(Clone)]
pub struct ValueSupplier {
    f: Arc<SupplierFn>,
}

impl ValueSupplier {
    /// Wrap a function of (row index, previous value).
    pub fn new<F, V>(f: F) -> Self
    where
        F: Fn(usize, Option<&FixtureValue>) -> V + Send + Sync + 'static,
        V: Into<FixtureValue>,
    {
        Self {
            f: Arc::new(move |index, previous| f(index, previous).into()),
        }
    }

    /// Always supply the same value.
    pub fn constant(value: impl Into<FixtureValue>) -> Self {
        let value = value.into();
        Self::new(move |_, _| value.clone())
    }

    /// Supply `values[index % len]`. An empty list supplies null.
    pub fn cycle<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FixtureValue>,
    {
        let values: Vec<FixtureValue> = values.into_iter().map(Into::into).collect();
        Self::new(move |index, _| {
            if values.is_empty() {
                FixtureValue::Null
            } else {
                values[index % values.len()].clone()
            }
        })
    }

    /// Supply a value computed from the row index only.
    pub fn from_index<F, V>(f: F) -> Self
    where
        F: Fn(usize) -> V + Send + Sync + 'static,
        V: Into<FixtureValue>,
    {
        Self::new(move |index, _| f(index))
    }

    /// Supply a value from a function that takes no arguments.
    pub fn from_fn<F, V>(f: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
        V: Into<FixtureValue>,
    {
        Self::new(move |_, _| f())
    }

    /// Produce the value for `index`.
    pub fn supply(&self, index: usize, previous: Option<&FixtureValue>) -> FixtureValue {
        (self.f)(index, previous)
    }
}

impl fmt::Debug for ValueSupplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueSupplier").finish_non_exhaustive()
    }
}

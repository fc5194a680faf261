//! Insertion plans.
//!
//! An [`InsertionPlan`] says how many rows to insert and how to derive the
//! value of each column. Columns without an explicit supplier receive a
//! default appropriate to their type (see [`crate::defaults`]).
//!
//! Plans are mutable: insert some rows with a plan, change a rule or the
//! row count, and insert more rows with the same plan.

use crate::error::GeneratorError;
use crate::supplier::ValueSupplier;
use fixture_core::FixtureValue;
use std::collections::HashMap;

/// How many rows to insert and how to fill each column.
#[derive(Debug, Clone)]
pub struct InsertionPlan {
    row_count: usize,
    suppliers: HashMap<String, ValueSupplier>,
    generate_nullable_defaults: bool,
}

impl InsertionPlan {
    /// Create a plan for `row_count` rows. Zero rows is rejected.
    pub fn new(row_count: usize) -> Result<Self, GeneratorError> {
        check_row_count(row_count)?;
        Ok(Self {
            row_count,
            suppliers: HashMap::new(),
            generate_nullable_defaults: false,
        })
    }

    /// Number of rows this plan inserts.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Change the number of rows. Zero rows is rejected and leaves the plan unchanged.
    pub fn set_row_count(&mut self, row_count: usize) -> Result<(), GeneratorError> {
        check_row_count(row_count)?;
        self.row_count = row_count;
        Ok(())
    }

    /// Whether nullable columns without a supplier get a generated default
    /// instead of null.
    pub fn generates_nullable_defaults(&self) -> bool {
        self.generate_nullable_defaults
    }

    /// The supplier registered for a column, if any.
    pub fn supplier_for(&self, column: &str) -> Option<&ValueSupplier> {
        self.suppliers.get(column)
    }

    /// Names of every column with an explicit supplier.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.suppliers.keys().map(String::as_str)
    }

    /// Set or replace the supplier for a column.
    pub fn set_supplier(&mut self, column: impl Into<String>, supplier: ValueSupplier) {
        self.suppliers.insert(column.into(), supplier);
    }

    /// Remove a column's supplier so it falls back to its default.
    pub fn remove_supplier(&mut self, column: &str) -> Option<ValueSupplier> {
        self.suppliers.remove(column)
    }

    /// Toggle generated defaults for nullable columns.
    pub fn set_generate_nullable_defaults(&mut self, enabled: bool) {
        self.generate_nullable_defaults = enabled;
    }

    /// Use `supplier` for `column`.
    pub fn with_supplier(mut self, column: impl Into<String>, supplier: ValueSupplier) -> Self {
        self.set_supplier(column, supplier);
        self
    }

    /// Write the same value to every row.
    pub fn with_value(self, column: impl Into<String>, value: impl Into<FixtureValue>) -> Self {
        self.with_supplier(column, ValueSupplier::constant(value))
    }

    /// Write `values[row % values.len()]` to each row.
    pub fn with_cycle<I, V>(self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FixtureValue>,
    {
        self.with_supplier(column, ValueSupplier::cycle(values))
    }

    /// Call `f` once per row, ignoring the row index.
    pub fn with_generator<F, V>(self, column: impl Into<String>, f: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
        V: Into<FixtureValue>,
    {
        self.with_supplier(column, ValueSupplier::from_fn(f))
    }

    /// Compute each row's value from its zero-based index.
    pub fn with_index_fn<F, V>(self, column: impl Into<String>, f: F) -> Self
    where
        F: Fn(usize) -> V + Send + Sync + 'static,
        V: Into<FixtureValue>,
    {
        self.with_supplier(column, ValueSupplier::from_index(f))
    }

    /// Compute each row's value from its index and the value written to the
    /// same column on the previous row (`None` on the first row).
    pub fn with_fn<F, V>(self, column: impl Into<String>, f: F) -> Self
    where
        F: Fn(usize, Option<&FixtureValue>) -> V + Send + Sync + 'static,
        V: Into<FixtureValue>,
    {
        self.with_supplier(column, ValueSupplier::new(f))
    }

    /// Generate defaults for nullable columns that have no supplier.
    pub fn generate_nullable_defaults(mut self, enabled: bool) -> Self {
        self.set_generate_nullable_defaults(enabled);
        self
    }
}

impl Default for InsertionPlan {
    /// A single-row plan with no explicit suppliers.
    fn default() -> Self {
        Self {
            row_count: 1,
            suppliers: HashMap::new(),
            generate_nullable_defaults: false,
        }
    }
}

fn check_row_count(row_count: usize) -> Result<(), GeneratorError> {
    if row_count == 0 {
        return Err(GeneratorError::invalid_plan(
            "number of rows must be more than 0",
        ));
    }
    Ok(())
}

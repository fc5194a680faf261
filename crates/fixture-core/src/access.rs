//! The execution capability a table fixture runs against.
//!
//! A `DataAccess` implementation owns the connection layer: it introspects
//! columns, runs plain and batched parameterized updates, and streams query
//! results row by row. Statements use `?` positional placeholders.

use crate::column::ColumnMetadata;
use crate::value::FixtureValue;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// One decoded result row, keyed by column name.
pub type FixtureRow = HashMap<String, FixtureValue>;

/// Errors reported by a [`DataAccess`] implementation.
#[derive(Error, Debug)]
pub enum DataAccessError {
    /// Connection could not be established or was lost.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The database rejected or failed a statement.
    #[error("Statement failed: {message} (sql: {sql})")]
    Statement { sql: String, message: String },

    /// Column introspection failed.
    #[error("Failed to introspect table '{table}': {message}")]
    Introspection { table: String, message: String },

    /// A result row has no column with the requested name.
    #[error("Column not found in result row: {0}")]
    ColumnNotFound(String),

    /// A value could not be converted to or from the driver's representation.
    #[error("Conversion error: {0}")]
    Conversion(String),
}

/// Name-addressed access to one row of a query result.
pub trait ResultRow {
    /// Get the value of the named column.
    fn get(&self, column: &str) -> Result<FixtureValue, DataAccessError>;

    /// Whether the row carries the named column.
    fn has_column(&self, column: &str) -> bool;

    /// Names of every column in the row, in result order.
    fn column_names(&self) -> Vec<String>;
}

/// Statement execution and schema introspection.
pub trait DataAccess: Send + Sync {
    /// Describe every column of `table`. Order is not significant.
    fn fetch_columns(&self, table: &str) -> Result<Vec<ColumnMetadata>, DataAccessError>;

    /// Run a statement without parameters and return the affected row count.
    fn update(&self, sql: &str) -> Result<u64, DataAccessError>;

    /// Run one parameterized statement once per argument tuple.
    ///
    /// Returns one affected-row count per tuple. Whether the batch is atomic
    /// is up to the implementation.
    fn batch_update(
        &self,
        sql: &str,
        batch: &[Vec<FixtureValue>],
    ) -> Result<Vec<u64>, DataAccessError>;

    /// Run a query, handing each result row to `on_row` in order.
    fn query(
        &self,
        sql: &str,
        on_row: &mut dyn FnMut(&dyn ResultRow) -> Result<(), DataAccessError>,
    ) -> Result<(), DataAccessError>;
}

impl<T: DataAccess + ?Sized> DataAccess for Arc<T> {
    fn fetch_columns(&self, table: &str) -> Result<Vec<ColumnMetadata>, DataAccessError> {
        (**self).fetch_columns(table)
    }

    fn update(&self, sql: &str) -> Result<u64, DataAccessError> {
        (**self).update(sql)
    }

    fn batch_update(
        &self,
        sql: &str,
        batch: &[Vec<FixtureValue>],
    ) -> Result<Vec<u64>, DataAccessError> {
        (**self).batch_update(sql, batch)
    }

    fn query(
        &self,
        sql: &str,
        on_row: &mut dyn FnMut(&dyn ResultRow) -> Result<(), DataAccessError>,
    ) -> Result<(), DataAccessError> {
        (**self).query(sql, on_row)
    }
}

impl<T: DataAccess + ?Sized> DataAccess for &T {
    fn fetch_columns(&self, table: &str) -> Result<Vec<ColumnMetadata>, DataAccessError> {
        (**self).fetch_columns(table)
    }

    fn update(&self, sql: &str) -> Result<u64, DataAccessError> {
        (**self).update(sql)
    }

    fn batch_update(
        &self,
        sql: &str,
        batch: &[Vec<FixtureValue>],
    ) -> Result<Vec<u64>, DataAccessError> {
        (**self).batch_update(sql, batch)
    }

    fn query(
        &self,
        sql: &str,
        on_row: &mut dyn FnMut(&dyn ResultRow) -> Result<(), DataAccessError>,
    ) -> Result<(), DataAccessError> {
        (**self).query(sql, on_row)
    }
}

impl ResultRow for FixtureRow {
    fn get(&self, column: &str) -> Result<FixtureValue, DataAccessError> {
        HashMap::get(self, column)
            .cloned()
            .ok_or_else(|| DataAccessError::ColumnNotFound(column.to_string()))
    }

    fn has_column(&self, column: &str) -> bool {
        self.contains_key(column)
    }

    fn column_names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }
}

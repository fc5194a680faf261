//! Table fixture orchestration.

use crate::error::FixtureError;
use crate::metadata::MetadataCache;
use crate::sql::{insert_sql, select_sql, truncate_sql};
use fixture_core::{ColumnMetadata, DataAccess, DataAccessError, FixtureRow, ResultRow};
use fixture_generator::{editable_columns, resolve_arguments, DefaultValueRegistry, InsertionPlan};
use tracing::{debug, info};

/// Test data fixture bound to a single table.
///
/// Column metadata is fetched on first use and cached for the lifetime of
/// the fixture. A fixture can be shared between threads; only the first
/// metadata load is synchronized.
pub struct TableFixture<A> {
    table: String,
    access: A,
    registry: DefaultValueRegistry,
    metadata: MetadataCache,
}

impl<A: DataAccess> TableFixture<A> {
    /// Create a fixture for `table` using the standard default value rules.
    pub fn new(table: impl Into<String>, access: A) -> Self {
        Self::with_registry(table, access, DefaultValueRegistry::standard())
    }

    /// Create a fixture with a custom default value registry.
    pub fn with_registry(
        table: impl Into<String>,
        access: A,
        registry: DefaultValueRegistry,
    ) -> Self {
        Self {
            table: table.into(),
            access,
            registry,
            metadata: MetadataCache::new(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn access(&self) -> &A {
        &self.access
    }

    /// All columns of the table in ordinal order, loading them on first use.
    pub fn columns(&self) -> Result<&[ColumnMetadata], FixtureError> {
        self.metadata
            .get_or_load(&self.access, &self.table)
            .map_err(|source| FixtureError::MetadataFetch {
                table: self.table.clone(),
                source,
            })
    }

    /// Columns an insert writes to, in ordinal order.
    pub fn editable_columns(&self) -> Result<Vec<&ColumnMetadata>, FixtureError> {
        Ok(editable_columns(self.columns()?))
    }

    /// Delete every row. Returns the number of rows deleted.
    pub fn truncate(&self) -> Result<u64, FixtureError> {
        let sql = truncate_sql(&self.table);
        debug!("Executing: {}", sql);
        let deleted = self.access.update(&sql)?;
        info!("Truncated table '{}' ({} rows deleted)", self.table, deleted);
        Ok(deleted)
    }

    /// Select every row, keyed by the cached column names.
    ///
    /// `order_by` entries are SQL sort expressions such as `"id"` or
    /// `"created_at DESC"`; an empty slice leaves the order unspecified.
    /// Result columns that are not in the cached metadata are dropped.
    pub fn select_all(&self, order_by: &[&str]) -> Result<Vec<FixtureRow>, FixtureError> {
        let columns = self.columns()?;
        let sql = select_sql(&self.table, order_by);
        debug!("Executing: {}", sql);

        let mut rows = Vec::new();
        self.access.query(&sql, &mut |row| {
            let mut decoded = FixtureRow::with_capacity(columns.len());
            for column in columns {
                decoded.insert(column.name().to_string(), row.get(column.name())?);
            }
            rows.push(decoded);
            Ok(())
        })?;
        Ok(rows)
    }

    /// Select every row, decoding each with `decoder(row, row_index)`.
    pub fn select_all_as<T, F>(
        &self,
        mut decoder: F,
        order_by: &[&str],
    ) -> Result<Vec<T>, FixtureError>
    where
        F: FnMut(&dyn ResultRow, usize) -> Result<T, DataAccessError>,
    {
        let sql = select_sql(&self.table, order_by);
        debug!("Executing: {}", sql);

        let mut rows = Vec::new();
        self.access.query(&sql, &mut |row| {
            rows.push(decoder(row, rows.len())?);
            Ok(())
        })?;
        Ok(rows)
    }

    /// Insert the rows described by `plan` as one batch.
    ///
    /// Returns the total number of rows the execution layer reports as
    /// written.
    pub fn insert(&self, plan: &InsertionPlan) -> Result<u64, FixtureError> {
        let columns = self.columns()?;
        let editable = editable_columns(columns);
        if editable.is_empty() {
            return Err(FixtureError::NoEditableColumns {
                table: self.table.clone(),
            });
        }

        let sql = insert_sql(&self.table, &editable);
        let arguments = resolve_arguments(plan, columns, &self.registry)?;

        info!(
            "Inserting {} rows into table '{}'",
            arguments.len(),
            self.table
        );
        debug!("Executing: {}", sql);

        let counts = self.access.batch_update(&sql, &arguments)?;
        let inserted: u64 = counts.iter().sum();
        info!("Inserted {} rows into table '{}'", inserted, self.table);
        Ok(inserted)
    }
}

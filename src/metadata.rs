//! Lazily loaded, load-once column metadata.

use fixture_core::{ColumnMetadata, DataAccess, DataAccessError};
use std::sync::{Mutex, OnceLock};
use tracing::debug;

/// Column metadata for one table, fetched at most once.
///
/// Readers take the fast path through [`OnceLock::get`]. The first caller to
/// find it empty takes the load lock, checks again and only then introspects,
/// so concurrent callers never fetch twice and never see a partial list.
/// A failed fetch publishes nothing, so the next call tries again.
#[derive(Debug, Default)]
pub struct MetadataCache {
    columns: OnceLock<Vec<ColumnMetadata>>,
    load_lock: Mutex<()>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached columns, if they have been loaded.
    pub fn get(&self) -> Option<&[ColumnMetadata]> {
        self.columns.get().map(Vec::as_slice)
    }

    /// Return the columns of `table`, fetching them through `access` on first use.
    ///
    /// Columns are sorted by ordinal position.
    pub fn get_or_load<A: DataAccess + ?Sized>(
        &self,
        access: &A,
        table: &str,
    ) -> Result<&[ColumnMetadata], DataAccessError> {
        if let Some(columns) = self.columns.get() {
            return Ok(columns);
        }

        // A panic in another loader leaves nothing published, so the guard is still usable.
        let _guard = self
            .load_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(columns) = self.columns.get() {
            return Ok(columns);
        }

        let mut columns = access.fetch_columns(table)?;
        columns.sort_by_key(|c| c.ordinal_position());
        debug!("Loaded {} columns for table '{}'", columns.len(), table);

        Ok(self.columns.get_or_init(|| columns))
    }
}

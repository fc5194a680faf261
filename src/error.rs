//! Error types for table fixture operations.

use fixture_core::DataAccessError;
use fixture_generator::GeneratorError;
use thiserror::Error;

/// Errors raised by [`crate::TableFixture`] operations.
#[derive(Error, Debug)]
pub enum FixtureError {
    /// Column introspection failed. The cache stays empty and a later call retries.
    #[error("Failed to load column metadata for table '{table}': {source}")]
    MetadataFetch {
        table: String,
        #[source]
        source: DataAccessError,
    },

    /// The table has no column the fixture may write.
    #[error("Table '{table}' has no editable columns (all columns are auto-increment or generated)")]
    NoEditableColumns { table: String },

    /// The plan could not be resolved into rows.
    #[error(transparent)]
    Generation(#[from] GeneratorError),

    /// A statement failed in the execution layer.
    #[error("Execution error: {0}")]
    Execution(#[from] DataAccessError),
}

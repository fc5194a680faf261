//! Error types for plan construction and row resolution.

use thiserror::Error;

/// Errors raised while building an insertion plan or resolving its rows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// The plan or one of its bounded suppliers is invalid.
    #[error("Invalid insertion plan: {0}")]
    InvalidPlan(String),

    /// A column needs a default value but its type has no default rule.
    #[error("No default value rule for column '{column}' of type {type_name}")]
    UnsupportedColumnType { column: String, type_name: String },

    /// The table has no column the fixture is allowed to write.
    #[error("Table has no editable columns (all columns are auto-increment or generated)")]
    NoEditableColumns,
}

impl GeneratorError {
    pub(crate) fn invalid_plan(reason: impl Into<String>) -> Self {
        Self::InvalidPlan(reason.into())
    }
}

/// Reject bounds where the lower bound exceeds the upper bound.
pub(crate) fn validate_bounds<T: PartialOrd + std::fmt::Display>(
    lower: T,
    upper: T,
) -> Result<(), GeneratorError> {
    if lower > upper {
        return Err(GeneratorError::invalid_plan(format!(
            "lower bound {lower} must not be greater than upper bound {upper}"
        )));
    }
    Ok(())
}

//! Core types for the table-fixture framework.
//!
//! This crate provides the foundational types shared by every other crate
//! in the workspace:
//!
//! - [`SqlType`] - Logical column type, identified by its SQL/CLI type code
//! - [`ColumnMetadata`] - Immutable description of one table column
//! - [`FixtureValue`] - Dynamically typed cell value written to or read from a table
//! - [`DataAccess`] - The execution capability a fixture runs its statements through
//!
//! # Architecture
//!
//! ```text
//! fixture-core (this crate)
//!    │
//!    ├─── fixture-generator  (default values, suppliers, insertion plans)
//!    ├─── fixture-mysql      (DataAccess over mysql_async)
//!    └─── table-fixture      (TableFixture orchestration + CLI)
//! ```
//!
//! # Example
//!
//! ```rust
//! use fixture_core::{ColumnMetadata, FixtureValue, SqlType};
//!
//! let column = ColumnMetadata::builder("price", SqlType::Decimal)
//!     .with_precision(5)
//!     .with_scale(2)
//!     .with_ordinal_position(3)
//!     .build();
//!
//! assert!(column.is_value_editable());
//! assert_eq!(FixtureValue::from(42), FixtureValue::Int32(42));
//! ```

pub mod access;
pub mod column;
pub mod value;

pub use access::{DataAccess, DataAccessError, FixtureRow, ResultRow};
pub use column::{ColumnMetadata, ColumnMetadataBuilder, SqlType};
pub use value::FixtureValue;

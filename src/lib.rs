//! Table fixtures for database tests.
//!
//! A [`TableFixture`] is bound to one table. It discovers the table's column
//! metadata once, synthesizes rows from an [`InsertionPlan`] and runs
//! truncate, select and batched insert statements through a [`DataAccess`]
//! implementation.
//!
//! # Crates
//!
//! - `fixture-core` - column metadata, values and the `DataAccess` trait
//! - `fixture-generator` - default values, suppliers, plans and row resolution
//! - `fixture-mysql` - `DataAccess` over `mysql_async`
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use table_fixture::testing::MemoryDatabase;
//! use table_fixture::{ColumnMetadata, InsertionPlan, SqlType, TableFixture};
//!
//! let db = Arc::new(MemoryDatabase::new());
//! db.create_table(
//!     "orders",
//!     vec![
//!         ColumnMetadata::builder("id", SqlType::BigInt)
//!             .with_auto_increment(true)
//!             .with_ordinal_position(1)
//!             .build(),
//!         ColumnMetadata::builder("status", SqlType::VarChar)
//!             .with_max_size(16)
//!             .with_ordinal_position(2)
//!             .build(),
//!     ],
//! );
//!
//! let fixture = TableFixture::new("orders", Arc::clone(&db));
//! let plan = InsertionPlan::new(4)
//!     .unwrap()
//!     .with_cycle("status", ["new", "shipped"]);
//!
//! assert_eq!(fixture.insert(&plan).unwrap(), 4);
//! assert_eq!(fixture.select_all(&["id"]).unwrap().len(), 4);
//! assert_eq!(fixture.truncate().unwrap(), 4);
//! ```

pub mod error;
pub mod fixture;
pub mod logging;
pub mod metadata;
pub mod sql;
pub mod testing;

pub use error::FixtureError;
pub use fixture::TableFixture;
pub use metadata::MetadataCache;

pub use fixture_core::{
    ColumnMetadata, DataAccess, DataAccessError, FixtureRow, FixtureValue, ResultRow, SqlType,
};
pub use fixture_generator::{
    suppliers, DefaultValueRegistry, GeneratorError, InsertionPlan, PlanConfig, TypeFamily,
    ValueSupplier,
};

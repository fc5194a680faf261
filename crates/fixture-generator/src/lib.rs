//! Value generation for table fixtures.
//!
//! This crate turns an [`InsertionPlan`] and a table's column metadata into
//! the argument matrix of a batched `INSERT`:
//!
//! ```text
//! InsertionPlan (row count + column -> ValueSupplier)
//!        │
//!        ▼
//! ┌───────────────────────┐      ┌───────────────────────┐
//! │  resolve_arguments    │◄─────│ DefaultValueRegistry  │
//! │                       │      │ (TypeFamily -> rule)  │
//! └──────────┬────────────┘      └───────────────────────┘
//!            │
//!            ▼
//!   Vec<Vec<FixtureValue>>  (one tuple per row, editable columns in ordinal order)
//! ```
//!
//! # Example
//!
//! ```rust
//! use fixture_core::{ColumnMetadata, FixtureValue, SqlType};
//! use fixture_generator::{resolve_arguments, DefaultValueRegistry, InsertionPlan};
//!
//! let columns = vec![
//!     ColumnMetadata::builder("id", SqlType::BigInt)
//!         .with_auto_increment(true)
//!         .with_ordinal_position(1)
//!         .build(),
//!     ColumnMetadata::builder("status", SqlType::VarChar)
//!         .with_max_size(16)
//!         .with_ordinal_position(2)
//!         .build(),
//! ];
//!
//! let plan = InsertionPlan::new(3)
//!     .unwrap()
//!     .with_cycle("status", ["active", "inactive"]);
//!
//! let rows = resolve_arguments(&plan, &columns, &DefaultValueRegistry::standard()).unwrap();
//! assert_eq!(rows[2], vec![FixtureValue::from("active")]);
//! ```
//!
//! # Column rules
//!
//! - constant value, cycle of values, index function, zero-argument function
//! - previous-value-aware function `(index, previous) -> value`
//! - bounded random suppliers in [`suppliers`]
//! - YAML plan documents via [`config::PlanConfig`]

pub mod config;
pub mod defaults;
pub mod error;
pub mod plan;
pub mod resolve;
pub mod supplier;
pub mod suppliers;

pub use config::{ColumnRule, ConfigError, PlanConfig};
pub use defaults::{DefaultGenerator, DefaultRule, DefaultValueRegistry, TypeFamily};
pub use error::GeneratorError;
pub use plan::InsertionPlan;
pub use resolve::{editable_columns, resolve_arguments};
pub use supplier::ValueSupplier;

//! Built-in bounded value suppliers.
//!
//! Every constructor validates its bounds up front and returns
//! [`GeneratorError::InvalidPlan`](crate::GeneratorError::InvalidPlan) instead
//! of a supplier that could later produce an out-of-range value.

pub mod date;
pub mod datetime;
pub mod int;
pub mod pattern;
pub mod string;

pub use pattern::{pattern, sequential};

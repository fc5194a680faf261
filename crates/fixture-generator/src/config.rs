//! Declarative insertion plans loaded from YAML.
//!
//! ```yaml
//! rows: 100
//! generate_nullable_defaults: false
//! columns:
//!   status:
//!     type: cycle
//!     values: [active, inactive]
//!   age:
//!     type: int_range
//!     min: 18
//!     max: 80
//!   email:
//!     type: pattern
//!     pattern: "user_{index}@example.com"
//! ```

use crate::error::GeneratorError;
use crate::plan::InsertionPlan;
use crate::supplier::ValueSupplier;
use crate::suppliers;
use chrono::{NaiveDate, NaiveDateTime};
use fixture_core::FixtureValue;
use serde::{Deserialize, Serialize};
use serde_yaml::Value as YamlValue;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors from loading a plan file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading the plan file
    #[error("Failed to read plan file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document parsed but describes an invalid plan
    #[error(transparent)]
    Plan(#[from] GeneratorError),
}

/// A plan as written in a YAML document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Number of rows to insert
    #[serde(default = "default_rows")]
    pub rows: usize,

    /// Generate values for nullable columns that have no rule
    #[serde(default)]
    pub generate_nullable_defaults: bool,

    /// Column name to rule
    #[serde(default)]
    pub columns: BTreeMap<String, ColumnRule>,
}

fn default_rows() -> usize {
    1
}

/// How one column's values are produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnRule {
    /// The same value on every row
    Constant { value: YamlValue },

    /// `values[row % len]`
    Cycle { values: Vec<YamlValue> },

    /// Random integer in `[min, max]`
    IntRange { min: i32, max: i32 },

    /// Random multiple of `step` in `[min, max]`
    MultipleOf { step: i32, min: i32, max: i32 },

    /// Random text with a length in `[min_length, max_length]`
    String {
        #[serde(default = "default_min_length")]
        min_length: usize,
        max_length: usize,
    },

    /// Random day in `[start, end]`
    DateRange { start: NaiveDate, end: NaiveDate },

    /// Random second in `[start, end]`
    DatetimeRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// `start + row * step`
    Sequential {
        #[serde(default)]
        start: i64,
        #[serde(default = "default_step")]
        step: i64,
    },

    /// Text with `{index}` and `{uuid}` placeholders
    Pattern { pattern: String },

    /// Always null
    Null,
}

fn default_min_length() -> usize {
    1
}

fn default_step() -> i64 {
    1
}

impl ColumnRule {
    /// Build the supplier this rule describes.
    pub fn to_supplier(&self) -> Result<ValueSupplier, GeneratorError> {
        match self {
            ColumnRule::Constant { value } => Ok(ValueSupplier::constant(yaml_to_fixture_value(
                value,
            )?)),
            ColumnRule::Cycle { values } => {
                let values = values
                    .iter()
                    .map(yaml_to_fixture_value)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ValueSupplier::cycle(values))
            }
            ColumnRule::IntRange { min, max } => suppliers::int::random(*min, *max),
            ColumnRule::MultipleOf { step, min, max } => {
                suppliers::int::multiple_of(*step, *min, *max)
            }
            ColumnRule::String {
                min_length,
                max_length,
            } => suppliers::string::random(*min_length, *max_length),
            ColumnRule::DateRange { start, end } => suppliers::date::random(*start, *end),
            ColumnRule::DatetimeRange { start, end } => suppliers::datetime::random(*start, *end),
            ColumnRule::Sequential { start, step } => Ok(suppliers::sequential(*start, *step)),
            ColumnRule::Pattern { pattern } => Ok(suppliers::pattern(pattern.clone())),
            ColumnRule::Null => Ok(ValueSupplier::constant(FixtureValue::Null)),
        }
    }
}

impl PlanConfig {
    /// Load a plan document from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a plan document from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Build the insertion plan. Every rule is validated here.
    pub fn into_plan(self) -> Result<InsertionPlan, GeneratorError> {
        let mut plan = InsertionPlan::new(self.rows)?
            .generate_nullable_defaults(self.generate_nullable_defaults);
        for (column, rule) in &self.columns {
            let supplier = self.check_rule(rule).and_then(|()| rule.to_supplier());
            let supplier = supplier.map_err(|e| match e {
                GeneratorError::InvalidPlan(reason) => {
                    GeneratorError::InvalidPlan(format!("column '{column}': {reason}"))
                }
                other => other,
            })?;
            plan.set_supplier(column.clone(), supplier);
        }
        Ok(plan)
    }

    /// Checks that depend on the row count rather than on the rule alone.
    fn check_rule(&self, rule: &ColumnRule) -> Result<(), GeneratorError> {
        if let ColumnRule::Sequential { start, step } = rule {
            let last_row = self.rows.saturating_sub(1);
            if suppliers::pattern::sequential_value(*start, *step, last_row).is_none() {
                return Err(GeneratorError::invalid_plan(format!(
                    "sequence from {start} by {step} overflows within {} rows",
                    self.rows
                )));
            }
        }
        Ok(())
    }
}

/// Convert a scalar YAML value to a FixtureValue.
///
/// Sequences and mappings have no column representation and are rejected.
pub fn yaml_to_fixture_value(yaml: &YamlValue) -> Result<FixtureValue, GeneratorError> {
    match yaml {
        YamlValue::Null => Ok(FixtureValue::Null),
        YamlValue::Bool(b) => Ok(FixtureValue::Bool(*b)),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i32::try_from(i).map_or(FixtureValue::Int64(i), FixtureValue::Int32))
            } else if let Some(f) = n.as_f64() {
                Ok(FixtureValue::Float64(f))
            } else {
                Ok(FixtureValue::Text(n.to_string()))
            }
        }
        YamlValue::String(s) => Ok(FixtureValue::Text(s.clone())),
        YamlValue::Sequence(_) | YamlValue::Mapping(_) => Err(GeneratorError::invalid_plan(
            "column values must be scalars, not sequences or mappings",
        )),
        YamlValue::Tagged(tagged) => yaml_to_fixture_value(&tagged.value),
    }
}

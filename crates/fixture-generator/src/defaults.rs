//! Default value generation for columns without an explicit supplier.
//!
//! The [`DefaultValueRegistry`] maps a column's [`TypeFamily`] to a rule
//! that, given the column's size/precision/scale, builds a parameterless
//! [`DefaultGenerator`]. A registry is built once (usually with
//! [`DefaultValueRegistry::standard`]) and shared read-only afterwards.

use crate::error::GeneratorError;
use chrono::{Local, Utc};
use fixture_core::{ColumnMetadata, FixtureValue, SqlType};
use rand::Rng;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Largest scale a `rust_decimal::Decimal` can carry.
const MAX_DECIMAL_SCALE: u32 = 28;

/// Largest number of significant digits generated for a decimal default.
const MAX_DECIMAL_DIGITS: u32 = 28;

/// Largest value of a MySQL `MEDIUMINT`, which reports as [`SqlType::Integer`].
const MEDIUMINT_MAX: i64 = 8_388_607;

/// Families of column types that share a default value rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFamily {
    Int8,
    Int16,
    Int32,
    Int64,
    Bit,
    Boolean,
    Float32,
    Float64,
    Decimal,
    Character,
    Date,
    Time,
    Timestamp,
    TimestampTz,
}

impl TypeFamily {
    /// The family a SQL type belongs to, if it has one.
    pub fn of(sql_type: SqlType) -> Option<Self> {
        match sql_type {
            SqlType::TinyInt => Some(Self::Int8),
            SqlType::SmallInt => Some(Self::Int16),
            SqlType::Integer => Some(Self::Int32),
            SqlType::BigInt => Some(Self::Int64),
            SqlType::Bit => Some(Self::Bit),
            SqlType::Boolean => Some(Self::Boolean),
            SqlType::Real => Some(Self::Float32),
            SqlType::Float | SqlType::Double => Some(Self::Float64),
            SqlType::Numeric | SqlType::Decimal => Some(Self::Decimal),
            SqlType::Char
            | SqlType::VarChar
            | SqlType::LongVarChar
            | SqlType::NChar
            | SqlType::NVarChar
            | SqlType::LongNVarChar => Some(Self::Character),
            SqlType::Date => Some(Self::Date),
            SqlType::Time | SqlType::TimeWithTimezone => Some(Self::Time),
            SqlType::Timestamp => Some(Self::Timestamp),
            SqlType::TimestampWithTimezone => Some(Self::TimestampTz),
            SqlType::Clob
            | SqlType::Binary
            | SqlType::VarBinary
            | SqlType::LongVarBinary
            | SqlType::Blob
            | SqlType::Other(_) => None,
        }
    }
}

/// A parameterless producer of default values for one column.
#[derive(Clone)]
pub struct DefaultGenerator {
    f: Arc<dyn Fn() -> FixtureValue + Send + Sync>,
}

impl DefaultGenerator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> FixtureValue + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    /// Produce one value.
    pub fn generate(&self) -> FixtureValue {
        (self.f)()
    }
}

impl fmt::Debug for DefaultGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultGenerator").finish_non_exhaustive()
    }
}

/// Builds a default generator sized for a specific column.
pub type DefaultRule = fn(&ColumnMetadata) -> DefaultGenerator;

/// Lookup table from type family to default value rule.
#[derive(Clone)]
pub struct DefaultValueRegistry {
    rules: HashMap<TypeFamily, DefaultRule>,
}

impl DefaultValueRegistry {
    /// A registry with no rules at all.
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// A registry with a rule for every [`TypeFamily`].
    pub fn standard() -> Self {
        Self::empty()
            .register(TypeFamily::Int8, |_| {
                DefaultGenerator::new(|| FixtureValue::Int32(random_int(i8::MAX as i64) as i32))
            })
            .register(TypeFamily::Int16, |_| {
                DefaultGenerator::new(|| FixtureValue::Int32(random_int(i16::MAX as i64) as i32))
            })
            .register(TypeFamily::Int32, |column| {
                let upper = if column.type_name().eq_ignore_ascii_case("MEDIUMINT") {
                    MEDIUMINT_MAX
                } else {
                    i32::MAX as i64
                };
                DefaultGenerator::new(move || FixtureValue::Int32(random_int(upper) as i32))
            })
            .register(TypeFamily::Int64, |_| {
                DefaultGenerator::new(|| FixtureValue::Int64(random_int(i64::MAX)))
            })
            .register(TypeFamily::Bit, |_| {
                DefaultGenerator::new(|| FixtureValue::Bool(rand::rng().random_bool(0.5)))
            })
            .register(TypeFamily::Boolean, |_| {
                DefaultGenerator::new(|| FixtureValue::Bool(rand::rng().random_bool(0.5)))
            })
            .register(TypeFamily::Float32, |_| {
                DefaultGenerator::new(|| FixtureValue::Float32(rand::rng().random::<f32>()))
            })
            .register(TypeFamily::Float64, |_| {
                DefaultGenerator::new(|| FixtureValue::Float64(rand::rng().random::<f64>()))
            })
            .register(TypeFamily::Decimal, |column| {
                let precision = column.precision();
                let scale = column.scale();
                DefaultGenerator::new(move || FixtureValue::Decimal(random_decimal(precision, scale)))
            })
            .register(TypeFamily::Character, |column| {
                let max_size = column.max_size() as usize;
                DefaultGenerator::new(move || {
                    let mut s = Uuid::new_v4().to_string();
                    s.truncate(max_size);
                    FixtureValue::Text(s)
                })
            })
            .register(TypeFamily::Date, |_| {
                DefaultGenerator::new(|| FixtureValue::Date(Local::now().date_naive()))
            })
            .register(TypeFamily::Time, |_| {
                DefaultGenerator::new(|| FixtureValue::Time(Local::now().time()))
            })
            .register(TypeFamily::Timestamp, |_| {
                DefaultGenerator::new(|| FixtureValue::DateTime(Local::now().naive_local()))
            })
            .register(TypeFamily::TimestampTz, |_| {
                DefaultGenerator::new(|| FixtureValue::DateTimeUtc(Utc::now()))
            })
    }

    /// Add or replace the rule for a family.
    pub fn register(mut self, family: TypeFamily, rule: DefaultRule) -> Self {
        self.rules.insert(family, rule);
        self
    }

    /// Build the default generator for a column.
    pub fn generator_for(&self, column: &ColumnMetadata) -> Result<DefaultGenerator, GeneratorError> {
        TypeFamily::of(column.data_type())
            .and_then(|family| self.rules.get(&family))
            .map(|rule| rule(column))
            .ok_or_else(|| GeneratorError::UnsupportedColumnType {
                column: column.name().to_string(),
                type_name: column.type_name().to_string(),
            })
    }
}

impl Default for DefaultValueRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for DefaultValueRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultValueRegistry")
            .field("families", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Uniform integer in `[0, upper)`.
fn random_int(upper: i64) -> i64 {
    rand::rng().random_range(0..upper)
}

/// Random decimal with at most `precision - scale` integer digits and exactly
/// `scale` fractional digits.
fn random_decimal(precision: u32, scale: u32) -> Decimal {
    let scale = scale.min(MAX_DECIMAL_SCALE);
    let integer_digits = precision
        .saturating_sub(scale)
        .min(MAX_DECIMAL_DIGITS - scale);

    let mut rng = rand::rng();
    let integer_part = rng.random_range(0..10u128.pow(integer_digits));
    let fraction_part = rng.random_range(0..10u128.pow(scale));
    let mantissa = integer_part * 10u128.pow(scale) + fraction_part;

    // At most 28 significant digits, which always fits the 96-bit mantissa.
    Decimal::from_i128_with_scale(mantissa as i128, scale)
}

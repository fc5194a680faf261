//! Column metadata for the table-fixture framework.
//!
//! This module defines `SqlType`, the closed set of logical column types a
//! database can report during introspection, and `ColumnMetadata`, the
//! immutable per-column description the fixture caches.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical SQL data type of a column.
///
/// Each variant corresponds to one standard SQL/CLI type code (the numbering
/// shared by ODBC and most database drivers). Codes with no dedicated variant
/// are preserved in [`SqlType::Other`] so they can still be reported by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlType {
    // Boolean
    /// Single bit
    Bit,
    /// Boolean
    Boolean,

    // Integer types
    /// 8-bit integer
    TinyInt,
    /// 16-bit integer
    SmallInt,
    /// 32-bit integer
    Integer,
    /// 64-bit integer
    BigInt,

    // Floating point
    /// 32-bit floating point
    Real,
    /// Driver-sized floating point (usually 64-bit)
    Float,
    /// 64-bit floating point
    Double,

    // Exact numeric
    /// Exact numeric with precision and scale
    Numeric,
    /// Exact decimal with precision and scale
    Decimal,

    // Character types
    /// Fixed-length character string
    Char,
    /// Variable-length character string
    VarChar,
    /// Long variable-length character string
    LongVarChar,
    /// Fixed-length national character string
    NChar,
    /// Variable-length national character string
    NVarChar,
    /// Long variable-length national character string
    LongNVarChar,
    /// Character large object
    Clob,

    // Binary types
    /// Fixed-length binary
    Binary,
    /// Variable-length binary
    VarBinary,
    /// Long variable-length binary
    LongVarBinary,
    /// Binary large object
    Blob,

    // Temporal types
    /// Date only
    Date,
    /// Time only
    Time,
    /// Time with time zone
    TimeWithTimezone,
    /// Timestamp without time zone
    Timestamp,
    /// Timestamp with time zone
    TimestampWithTimezone,

    /// Any other type code
    Other(i32),
}

impl SqlType {
    /// Resolve a SQL/CLI type code.
    pub fn from_code(code: i32) -> Self {
        match code {
            -7 => Self::Bit,
            16 => Self::Boolean,
            -6 => Self::TinyInt,
            5 => Self::SmallInt,
            4 => Self::Integer,
            -5 => Self::BigInt,
            7 => Self::Real,
            6 => Self::Float,
            8 => Self::Double,
            2 => Self::Numeric,
            3 => Self::Decimal,
            1 => Self::Char,
            12 => Self::VarChar,
            -1 => Self::LongVarChar,
            -15 => Self::NChar,
            -9 => Self::NVarChar,
            -16 => Self::LongNVarChar,
            2005 => Self::Clob,
            -2 => Self::Binary,
            -3 => Self::VarBinary,
            -4 => Self::LongVarBinary,
            2004 => Self::Blob,
            91 => Self::Date,
            92 => Self::Time,
            2013 => Self::TimeWithTimezone,
            93 => Self::Timestamp,
            2014 => Self::TimestampWithTimezone,
            other => Self::Other(other),
        }
    }

    /// The SQL/CLI type code of this type.
    pub fn code(&self) -> i32 {
        match self {
            Self::Bit => -7,
            Self::Boolean => 16,
            Self::TinyInt => -6,
            Self::SmallInt => 5,
            Self::Integer => 4,
            Self::BigInt => -5,
            Self::Real => 7,
            Self::Float => 6,
            Self::Double => 8,
            Self::Numeric => 2,
            Self::Decimal => 3,
            Self::Char => 1,
            Self::VarChar => 12,
            Self::LongVarChar => -1,
            Self::NChar => -15,
            Self::NVarChar => -9,
            Self::LongNVarChar => -16,
            Self::Clob => 2005,
            Self::Binary => -2,
            Self::VarBinary => -3,
            Self::LongVarBinary => -4,
            Self::Blob => 2004,
            Self::Date => 91,
            Self::Time => 92,
            Self::TimeWithTimezone => 2013,
            Self::Timestamp => 93,
            Self::TimestampWithTimezone => 2014,
            Self::Other(code) => *code,
        }
    }

    /// Canonical upper-case name of this type.
    pub fn name(&self) -> String {
        let name = match self {
            Self::Bit => "BIT",
            Self::Boolean => "BOOLEAN",
            Self::TinyInt => "TINYINT",
            Self::SmallInt => "SMALLINT",
            Self::Integer => "INTEGER",
            Self::BigInt => "BIGINT",
            Self::Real => "REAL",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Numeric => "NUMERIC",
            Self::Decimal => "DECIMAL",
            Self::Char => "CHAR",
            Self::VarChar => "VARCHAR",
            Self::LongVarChar => "LONGVARCHAR",
            Self::NChar => "NCHAR",
            Self::NVarChar => "NVARCHAR",
            Self::LongNVarChar => "LONGNVARCHAR",
            Self::Clob => "CLOB",
            Self::Binary => "BINARY",
            Self::VarBinary => "VARBINARY",
            Self::LongVarBinary => "LONGVARBINARY",
            Self::Blob => "BLOB",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::TimeWithTimezone => "TIME_WITH_TIMEZONE",
            Self::Timestamp => "TIMESTAMP",
            Self::TimestampWithTimezone => "TIMESTAMP_WITH_TIMEZONE",
            Self::Other(code) => return format!("OTHER({code})"),
        };
        name.to_string()
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Immutable description of one physical table column.
///
/// Instances are produced by schema introspection and cached by the fixture
/// for its whole lifetime. Use [`ColumnMetadata::builder`] to construct one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMetadata {
    name: String,
    data_type: SqlType,
    type_name: String,
    precision: u32,
    scale: u32,
    max_size: u32,
    ordinal_position: u32,
    nullable: bool,
    has_default_value: bool,
    auto_increment: bool,
    generated: bool,
}

impl ColumnMetadata {
    /// Start building metadata for a column.
    pub fn builder(name: impl Into<String>, data_type: SqlType) -> ColumnMetadataBuilder {
        ColumnMetadataBuilder::new(name, data_type)
    }

    /// Column name, unique within its table.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Logical data type.
    pub fn data_type(&self) -> SqlType {
        self.data_type
    }

    /// Type name as reported by the database (e.g. `varchar`).
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Total number of digits, meaningful for exact numeric types.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Digits after the decimal point, meaningful for exact numeric types.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Maximum character length, meaningful for character types.
    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    /// 1-based position in the table's declared column order.
    pub fn ordinal_position(&self) -> u32 {
        self.ordinal_position
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Whether the database supplies its own default for this column.
    pub fn has_default_value(&self) -> bool {
        self.has_default_value
    }

    pub fn is_auto_increment(&self) -> bool {
        self.auto_increment
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// Whether the fixture may ever write this column.
    pub fn is_value_editable(&self) -> bool {
        !(self.auto_increment || self.generated)
    }
}

/// Builder for [`ColumnMetadata`].
#[derive(Debug, Clone)]
pub struct ColumnMetadataBuilder {
    name: String,
    data_type: SqlType,
    type_name: Option<String>,
    precision: u32,
    scale: u32,
    max_size: u32,
    ordinal_position: u32,
    nullable: bool,
    has_default_value: bool,
    auto_increment: bool,
    generated: bool,
}

impl ColumnMetadataBuilder {
    /// Create a builder for a non-nullable, editable column.
    pub fn new(name: impl Into<String>, data_type: SqlType) -> Self {
        Self {
            name: name.into(),
            data_type,
            type_name: None,
            precision: 0,
            scale: 0,
            max_size: 0,
            ordinal_position: 0,
            nullable: false,
            has_default_value: false,
            auto_increment: false,
            generated: false,
        }
    }

    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_ordinal_position(mut self, ordinal_position: u32) -> Self {
        self.ordinal_position = ordinal_position;
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_default_value(mut self, has_default_value: bool) -> Self {
        self.has_default_value = has_default_value;
        self
    }

    pub fn with_auto_increment(mut self, auto_increment: bool) -> Self {
        self.auto_increment = auto_increment;
        self
    }

    pub fn with_generated(mut self, generated: bool) -> Self {
        self.generated = generated;
        self
    }

    /// Finish building. The type name defaults to the canonical name of the type.
    pub fn build(self) -> ColumnMetadata {
        let type_name = self.type_name.unwrap_or_else(|| self.data_type.name());
        ColumnMetadata {
            name: self.name,
            data_type: self.data_type,
            type_name,
            precision: self.precision,
            scale: self.scale,
            max_size: self.max_size,
            ordinal_position: self.ordinal_position,
            nullable: self.nullable,
            has_default_value: self.has_default_value,
            auto_increment: self.auto_increment,
            generated: self.generated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_code_roundtrip_for_known_types() {
        let types = [
            SqlType::Bit,
            SqlType::Integer,
            SqlType::Decimal,
            SqlType::NVarChar,
            SqlType::TimestampWithTimezone,
            SqlType::Blob,
        ];
        for sql_type in types {
            assert_eq!(SqlType::from_code(sql_type.code()), sql_type);
        }
    }

    #[test]
    fn test_unknown_code_is_preserved() {
        let sql_type = SqlType::from_code(1111);
        assert_eq!(sql_type, SqlType::Other(1111));
        assert_eq!(sql_type.code(), 1111);
        assert_eq!(sql_type.to_string(), "OTHER(1111)");
    }

    #[test]
    fn test_builder_defaults() {
        let column = ColumnMetadata::builder("name", SqlType::VarChar)
            .with_max_size(64)
            .with_ordinal_position(2)
            .build();

        assert_eq!(column.name(), "name");
        assert_eq!(column.type_name(), "VARCHAR");
        assert_eq!(column.max_size(), 64);
        assert_eq!(column.ordinal_position(), 2);
        assert!(!column.is_nullable());
        assert!(!column.has_default_value());
        assert!(column.is_value_editable());
    }

    #[test]
    fn test_auto_increment_and_generated_are_not_editable() {
        let id = ColumnMetadata::builder("id", SqlType::Integer)
            .with_auto_increment(true)
            .build();
        let total = ColumnMetadata::builder("total", SqlType::Decimal)
            .with_generated(true)
            .build();

        assert!(!id.is_value_editable());
        assert!(!total.is_value_editable());
    }

    #[test]
    fn test_explicit_type_name_wins() {
        let column = ColumnMetadata::builder("flag", SqlType::Boolean)
            .with_type_name("tinyint(1)")
            .build();
        assert_eq!(column.type_name(), "tinyint(1)");
        assert_eq!(column.data_type(), SqlType::Boolean);
    }
}

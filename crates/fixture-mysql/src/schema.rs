//! Column introspection and MySQL type mapping.
//!
//! Columns are read from `INFORMATION_SCHEMA.COLUMNS` for the connection's
//! current database and mapped onto the portable [`SqlType`] set.

use crate::error::statement_error;
use fixture_core::{ColumnMetadata, DataAccessError, SqlType};
use mysql_async::prelude::*;
use mysql_async::Row;

/// Code reported for types with no portable equivalent.
const OTHER_TYPE_CODE: i32 = 1111;

pub(crate) const COLUMNS_QUERY: &str = "
    SELECT COLUMN_NAME, DATA_TYPE, COLUMN_TYPE, NUMERIC_PRECISION, NUMERIC_SCALE,
           DATETIME_PRECISION, CHARACTER_MAXIMUM_LENGTH, IS_NULLABLE, COLUMN_DEFAULT,
           ORDINAL_POSITION, EXTRA
    FROM INFORMATION_SCHEMA.COLUMNS
    WHERE TABLE_SCHEMA = DATABASE()
    AND TABLE_NAME = ?
    ORDER BY ORDINAL_POSITION";

/// Map a MySQL `DATA_TYPE` (plus the full `COLUMN_TYPE`) to a [`SqlType`].
pub fn mysql_type_to_sql_type(data_type: &str, column_type: &str) -> SqlType {
    match data_type.to_lowercase().as_str() {
        "bit" => SqlType::Bit,
        "bool" | "boolean" => SqlType::Boolean,
        "tinyint" => {
            // TINYINT(1) is commonly used for boolean in MySQL
            if column_type.to_lowercase().starts_with("tinyint(1)") {
                SqlType::Boolean
            } else {
                SqlType::TinyInt
            }
        }
        "smallint" => SqlType::SmallInt,
        "mediumint" | "int" | "integer" => SqlType::Integer,
        "bigint" => SqlType::BigInt,
        "float" => SqlType::Real,
        "double" | "real" => SqlType::Double,
        "decimal" => SqlType::Decimal,
        "numeric" => SqlType::Numeric,
        "char" => SqlType::Char,
        "varchar" => SqlType::VarChar,
        "tinytext" | "text" | "mediumtext" | "longtext" => SqlType::LongVarChar,
        "binary" => SqlType::Binary,
        "varbinary" => SqlType::VarBinary,
        "tinyblob" | "blob" | "mediumblob" | "longblob" => SqlType::LongVarBinary,
        "date" => SqlType::Date,
        "time" => SqlType::Time,
        "datetime" | "timestamp" => SqlType::Timestamp,
        _ => SqlType::Other(OTHER_TYPE_CODE),
    }
}

/// Whether the `EXTRA` column marks a generated (virtual or stored) column.
fn is_generated(extra: &str) -> bool {
    let extra = extra.to_uppercase();
    extra.contains("VIRTUAL GENERATED") || extra.contains("STORED GENERATED")
}

/// Build column metadata from one `INFORMATION_SCHEMA.COLUMNS` row.
pub(crate) fn column_from_row(row: &Row) -> Result<ColumnMetadata, DataAccessError> {
    let name: String = required(row, 0, "COLUMN_NAME")?;
    let data_type: String = required(row, 1, "DATA_TYPE")?;
    let column_type: String = required(row, 2, "COLUMN_TYPE")?;
    let numeric_precision: Option<u64> = optional(row, 3, "NUMERIC_PRECISION")?;
    let numeric_scale: Option<u64> = optional(row, 4, "NUMERIC_SCALE")?;
    let datetime_precision: Option<u64> = optional(row, 5, "DATETIME_PRECISION")?;
    let char_length: Option<u64> = optional(row, 6, "CHARACTER_MAXIMUM_LENGTH")?;
    let is_nullable: String = required(row, 7, "IS_NULLABLE")?;
    let column_default: Option<String> = optional(row, 8, "COLUMN_DEFAULT")?;
    let ordinal_position: u64 = required(row, 9, "ORDINAL_POSITION")?;
    let extra: String = optional(row, 10, "EXTRA")?.unwrap_or_default();

    let sql_type = mysql_type_to_sql_type(&data_type, &column_type);
    let max_size = clamp_u32(char_length.unwrap_or(0));
    let precision = numeric_precision.map(clamp_u32).unwrap_or(max_size);
    let scale = numeric_scale.or(datetime_precision).map(clamp_u32).unwrap_or(0);

    Ok(ColumnMetadata::builder(name, sql_type)
        .with_type_name(data_type.to_uppercase())
        .with_precision(precision)
        .with_scale(scale)
        .with_max_size(max_size)
        .with_ordinal_position(clamp_u32(ordinal_position))
        .with_nullable(is_nullable.eq_ignore_ascii_case("YES"))
        .with_default_value(column_default.is_some())
        .with_auto_increment(extra.to_lowercase().contains("auto_increment"))
        .with_generated(is_generated(&extra))
        .build())
}

/// Read all columns of `table` over `conn`.
pub(crate) async fn fetch_columns(
    conn: &mut mysql_async::Conn,
    table: &str,
) -> Result<Vec<ColumnMetadata>, DataAccessError> {
    let rows: Vec<Row> = conn
        .exec(COLUMNS_QUERY, (table,))
        .await
        .map_err(|e| statement_error(COLUMNS_QUERY, e))?;

    rows.iter().map(column_from_row).collect()
}

fn clamp_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn optional<T: FromValue>(
    row: &Row,
    index: usize,
    name: &str,
) -> Result<Option<T>, DataAccessError> {
    match row.get_opt::<Option<T>, _>(index) {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => Err(DataAccessError::Conversion(format!(
            "Invalid {name} value: {e:?}"
        ))),
        None => Err(DataAccessError::Conversion(format!("Missing {name}"))),
    }
}

fn required<T: FromValue>(row: &Row, index: usize, name: &str) -> Result<T, DataAccessError> {
    optional(row, index, name)?
        .ok_or_else(|| DataAccessError::Conversion(format!("Missing {name}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_types() {
        assert_eq!(mysql_type_to_sql_type("tinyint", "tinyint(4)"), SqlType::TinyInt);
        assert_eq!(mysql_type_to_sql_type("tinyint", "tinyint(1)"), SqlType::Boolean);
        assert_eq!(mysql_type_to_sql_type("SMALLINT", "smallint"), SqlType::SmallInt);
        assert_eq!(mysql_type_to_sql_type("mediumint", "mediumint"), SqlType::Integer);
        assert_eq!(mysql_type_to_sql_type("int", "int unsigned"), SqlType::Integer);
        assert_eq!(mysql_type_to_sql_type("bigint", "bigint"), SqlType::BigInt);
    }

    #[test]
    fn test_numeric_types() {
        assert_eq!(mysql_type_to_sql_type("float", "float"), SqlType::Real);
        assert_eq!(mysql_type_to_sql_type("double", "double"), SqlType::Double);
        assert_eq!(mysql_type_to_sql_type("decimal", "decimal(5,2)"), SqlType::Decimal);
        assert_eq!(mysql_type_to_sql_type("bit", "bit(1)"), SqlType::Bit);
    }

    #[test]
    fn test_character_and_binary_types() {
        assert_eq!(mysql_type_to_sql_type("varchar", "varchar(20)"), SqlType::VarChar);
        assert_eq!(mysql_type_to_sql_type("char", "char(4)"), SqlType::Char);
        assert_eq!(mysql_type_to_sql_type("longtext", "longtext"), SqlType::LongVarChar);
        assert_eq!(mysql_type_to_sql_type("blob", "blob"), SqlType::LongVarBinary);
        assert_eq!(mysql_type_to_sql_type("varbinary", "varbinary(8)"), SqlType::VarBinary);
    }

    #[test]
    fn test_temporal_and_other_types() {
        assert_eq!(mysql_type_to_sql_type("date", "date"), SqlType::Date);
        assert_eq!(mysql_type_to_sql_type("time", "time"), SqlType::Time);
        assert_eq!(mysql_type_to_sql_type("datetime", "datetime(6)"), SqlType::Timestamp);
        assert_eq!(mysql_type_to_sql_type("timestamp", "timestamp"), SqlType::Timestamp);
        assert_eq!(mysql_type_to_sql_type("json", "json"), SqlType::Other(1111));
        assert_eq!(mysql_type_to_sql_type("geometry", "geometry"), SqlType::Other(1111));
        // ENUM and SET only accept their declared members.
        assert_eq!(mysql_type_to_sql_type("enum", "enum('a','b')"), SqlType::Other(1111));
        assert_eq!(mysql_type_to_sql_type("set", "set('x','y')"), SqlType::Other(1111));
    }

    #[test]
    fn test_generated_extra() {
        assert!(is_generated("VIRTUAL GENERATED"));
        assert!(is_generated("STORED GENERATED"));
        assert!(!is_generated("DEFAULT_GENERATED on update CURRENT_TIMESTAMP"));
        assert!(!is_generated("auto_increment"));
        assert!(!is_generated(""));
    }
}

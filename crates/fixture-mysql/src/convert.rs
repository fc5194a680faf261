//! Conversion between [`FixtureValue`] and `mysql_async::Value`.
//!
//! Forward conversion binds fixture values as statement parameters. Reverse
//! conversion reads binary-protocol result values, using the result column's
//! type to pick the fixture representation.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use fixture_core::{DataAccessError, FixtureValue};
use mysql_async::consts::{ColumnFlags, ColumnType};
use mysql_async::{Column, Value};
use rust_decimal::Decimal;

/// Character set number MySQL reports for binary strings.
const BINARY_CHARSET: u16 = 63;

/// Convert a fixture value into a statement parameter.
pub fn to_mysql_value(value: &FixtureValue) -> Value {
    match value {
        FixtureValue::Null => Value::NULL,
        // MySQL uses TINYINT(1)
        FixtureValue::Bool(b) => Value::Int(i64::from(*b)),
        FixtureValue::Int32(i) => Value::Int(i64::from(*i)),
        FixtureValue::Int64(i) => Value::Int(*i),
        FixtureValue::Float32(f) => Value::Float(*f),
        FixtureValue::Float64(f) => Value::Double(*f),
        // Decimal - sent as text to keep precision
        FixtureValue::Decimal(d) => Value::Bytes(d.to_string().into_bytes()),
        FixtureValue::Text(s) => Value::Bytes(s.clone().into_bytes()),
        FixtureValue::Bytes(b) => Value::Bytes(b.clone()),
        FixtureValue::Date(d) => date_value(*d, NaiveTime::MIN),
        FixtureValue::Time(t) => Value::Time(
            false,
            0,
            t.hour() as u8,
            t.minute() as u8,
            t.second() as u8,
            t.nanosecond() / 1000,
        ),
        FixtureValue::DateTime(dt) => date_value(dt.date(), dt.time()),
        FixtureValue::DateTimeUtc(dt) => {
            let naive = dt.naive_utc();
            date_value(naive.date(), naive.time())
        }
    }
}

fn date_value(date: NaiveDate, time: NaiveTime) -> Value {
    Value::Date(
        date.year() as u16,
        date.month() as u8,
        date.day() as u8,
        time.hour() as u8,
        time.minute() as u8,
        time.second() as u8,
        // MySQL uses microseconds
        time.nanosecond() / 1000,
    )
}

/// Convert a result value into a fixture value, guided by its column.
pub fn from_mysql_value(value: &Value, column: &Column) -> Result<FixtureValue, DataAccessError> {
    use ColumnType::*;

    if matches!(value, Value::NULL) {
        return Ok(FixtureValue::Null);
    }

    let unsigned = column.flags().contains(ColumnFlags::UNSIGNED_FLAG);

    match column.column_type() {
        // TINYINT(1) reads back as boolean
        MYSQL_TYPE_TINY if column.column_length() == 1 => {
            Ok(FixtureValue::Bool(extract_int(value)? != 0))
        }
        MYSQL_TYPE_TINY | MYSQL_TYPE_SHORT | MYSQL_TYPE_INT24 | MYSQL_TYPE_YEAR => {
            Ok(FixtureValue::Int32(narrow_int(extract_int(value)?)?))
        }
        MYSQL_TYPE_LONG if unsigned => Ok(FixtureValue::Int64(extract_int(value)?)),
        MYSQL_TYPE_LONG => Ok(FixtureValue::Int32(narrow_int(extract_int(value)?)?)),
        MYSQL_TYPE_LONGLONG => Ok(FixtureValue::Int64(extract_int(value)?)),

        MYSQL_TYPE_FLOAT => Ok(FixtureValue::Float32(extract_float(value)? as f32)),
        MYSQL_TYPE_DOUBLE => Ok(FixtureValue::Float64(extract_float(value)?)),

        MYSQL_TYPE_DECIMAL | MYSQL_TYPE_NEWDECIMAL => {
            let s = extract_string(value)?;
            s.parse::<Decimal>()
                .map(FixtureValue::Decimal)
                .map_err(|e| DataAccessError::Conversion(format!("Invalid decimal '{s}': {e}")))
        }

        MYSQL_TYPE_BIT => {
            let bytes = extract_bytes(value)?;
            if column.column_length() == 1 {
                Ok(FixtureValue::Bool(bytes.iter().any(|b| *b != 0)))
            } else {
                Ok(FixtureValue::Bytes(bytes))
            }
        }

        MYSQL_TYPE_DATE | MYSQL_TYPE_NEWDATE => Ok(FixtureValue::Date(extract_date(value)?)),
        MYSQL_TYPE_TIME | MYSQL_TYPE_TIME2 => Ok(FixtureValue::Time(extract_time(value)?)),
        MYSQL_TYPE_DATETIME | MYSQL_TYPE_DATETIME2 | MYSQL_TYPE_TIMESTAMP
        | MYSQL_TYPE_TIMESTAMP2 => Ok(FixtureValue::DateTime(extract_datetime(value)?)),

        MYSQL_TYPE_STRING | MYSQL_TYPE_VAR_STRING | MYSQL_TYPE_VARCHAR | MYSQL_TYPE_TINY_BLOB
        | MYSQL_TYPE_MEDIUM_BLOB | MYSQL_TYPE_LONG_BLOB | MYSQL_TYPE_BLOB => {
            if column.character_set() == BINARY_CHARSET {
                Ok(FixtureValue::Bytes(extract_bytes(value)?))
            } else {
                Ok(FixtureValue::Text(extract_string(value)?))
            }
        }

        _ => untyped(value),
    }
}

/// Best-effort conversion for column types without a dedicated mapping.
fn untyped(value: &Value) -> Result<FixtureValue, DataAccessError> {
    Ok(match value {
        Value::NULL => FixtureValue::Null,
        Value::Int(i) => FixtureValue::Int64(*i),
        Value::UInt(_) => FixtureValue::Int64(extract_int(value)?),
        Value::Float(f) => FixtureValue::Float32(*f),
        Value::Double(d) => FixtureValue::Float64(*d),
        Value::Bytes(b) => match String::from_utf8(b.clone()) {
            Ok(s) => FixtureValue::Text(s),
            Err(_) => FixtureValue::Bytes(b.clone()),
        },
        Value::Date(..) => FixtureValue::DateTime(extract_datetime(value)?),
        Value::Time(..) => FixtureValue::Time(extract_time(value)?),
    })
}

fn mismatch(expected: &str, actual: &Value) -> DataAccessError {
    DataAccessError::Conversion(format!("Type mismatch: expected {expected}, got {actual:?}"))
}

fn utf8(bytes: &[u8]) -> Result<String, DataAccessError> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| DataAccessError::Conversion(format!("Invalid UTF-8 in string: {e}")))
}

fn narrow_int(i: i64) -> Result<i32, DataAccessError> {
    i32::try_from(i).map_err(|_| DataAccessError::Conversion(format!("{i} does not fit in i32")))
}

fn extract_int(value: &Value) -> Result<i64, DataAccessError> {
    match value {
        Value::Int(i) => Ok(*i),
        Value::UInt(u) => i64::try_from(*u)
            .map_err(|_| DataAccessError::Conversion(format!("{u} does not fit in i64"))),
        Value::Bytes(b) => utf8(b)?.parse().map_err(|_| mismatch("integer", value)),
        _ => Err(mismatch("integer", value)),
    }
}

fn extract_float(value: &Value) -> Result<f64, DataAccessError> {
    match value {
        Value::Float(f) => Ok(*f as f64),
        Value::Double(d) => Ok(*d),
        Value::Int(i) => Ok(*i as f64),
        Value::UInt(u) => Ok(*u as f64),
        Value::Bytes(b) => utf8(b)?.parse().map_err(|_| mismatch("float", value)),
        _ => Err(mismatch("float", value)),
    }
}

fn extract_string(value: &Value) -> Result<String, DataAccessError> {
    match value {
        Value::Bytes(b) => utf8(b),
        Value::Int(i) => Ok(i.to_string()),
        Value::UInt(u) => Ok(u.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Double(d) => Ok(d.to_string()),
        _ => Err(mismatch("string", value)),
    }
}

fn extract_bytes(value: &Value) -> Result<Vec<u8>, DataAccessError> {
    match value {
        Value::Bytes(b) => Ok(b.clone()),
        Value::Int(i) => Ok(i.to_be_bytes().to_vec()),
        Value::UInt(u) => Ok(u.to_be_bytes().to_vec()),
        _ => Err(mismatch("bytes", value)),
    }
}

fn extract_date(value: &Value) -> Result<NaiveDate, DataAccessError> {
    match value {
        Value::Date(year, month, day, _, _, _, _) => {
            NaiveDate::from_ymd_opt(*year as i32, *month as u32, *day as u32)
                .ok_or_else(|| mismatch("date", value))
        }
        Value::Bytes(b) => NaiveDate::parse_from_str(&utf8(b)?, "%Y-%m-%d")
            .map_err(|_| mismatch("date", value)),
        _ => Err(mismatch("date", value)),
    }
}

fn extract_time(value: &Value) -> Result<NaiveTime, DataAccessError> {
    match value {
        Value::Time(false, 0, hour, min, sec, micro) => {
            NaiveTime::from_hms_micro_opt(*hour as u32, *min as u32, *sec as u32, *micro)
                .ok_or_else(|| mismatch("time of day", value))
        }
        Value::Bytes(b) => {
            let s = utf8(b)?;
            NaiveTime::parse_from_str(&s, "%H:%M:%S%.f").map_err(|_| mismatch("time of day", value))
        }
        _ => Err(mismatch("time of day", value)),
    }
}

fn extract_datetime(value: &Value) -> Result<NaiveDateTime, DataAccessError> {
    match value {
        Value::Date(year, month, day, hour, min, sec, micro) => {
            let date = NaiveDate::from_ymd_opt(*year as i32, *month as u32, *day as u32)
                .ok_or_else(|| mismatch("datetime", value))?;
            let time =
                NaiveTime::from_hms_micro_opt(*hour as u32, *min as u32, *sec as u32, *micro)
                    .ok_or_else(|| mismatch("datetime", value))?;
            Ok(NaiveDateTime::new(date, time))
        }
        Value::Bytes(b) => {
            let s = utf8(b)?;
            NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S%.f")
                .map_err(|_| mismatch("datetime", value))
        }
        _ => Err(mismatch("datetime", value)),
    }
}

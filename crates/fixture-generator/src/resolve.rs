//! Row resolution: turning a plan plus column metadata into an argument matrix.

use crate::defaults::{DefaultGenerator, DefaultValueRegistry};
use crate::error::GeneratorError;
use crate::plan::InsertionPlan;
use crate::supplier::ValueSupplier;
use fixture_core::{ColumnMetadata, FixtureValue};
use tracing::debug;

/// Where the values of one editable column come from.
enum ColumnSource<'a> {
    Supplier(&'a ValueSupplier),
    Default(DefaultGenerator),
    Null,
}

/// Resolve `plan` against `columns` into one argument tuple per row.
///
/// Only editable columns take part, in ascending ordinal position, so tuple
/// positions line up with [`editable_columns`]. Each supplier is invoked
/// once per row in increasing row order and receives the value resolved for
/// its own column on the previous row. Plan entries naming unknown columns
/// are ignored.
pub fn resolve_arguments(
    plan: &InsertionPlan,
    columns: &[ColumnMetadata],
    registry: &DefaultValueRegistry,
) -> Result<Vec<Vec<FixtureValue>>, GeneratorError> {
    let editable = editable_columns(columns);
    if editable.is_empty() {
        return Err(GeneratorError::NoEditableColumns);
    }

    for name in plan.columns() {
        if !editable.iter().any(|c| c.name() == name) {
            debug!("Plan entry for column '{}' matches no editable column", name);
        }
    }

    // Resolve every source before running any supplier, so an unsupported
    // type fails the whole call up front.
    let sources = editable
        .iter()
        .map(|column| column_source(plan, column, registry))
        .collect::<Result<Vec<_>, _>>()?;

    let mut previous: Vec<Option<FixtureValue>> = vec![None; sources.len()];
    let mut rows = Vec::with_capacity(plan.row_count());

    for index in 0..plan.row_count() {
        let mut row = Vec::with_capacity(sources.len());
        for (source, previous) in sources.iter().zip(previous.iter_mut()) {
            let value = match source {
                ColumnSource::Supplier(supplier) => supplier.supply(index, previous.as_ref()),
                ColumnSource::Default(generator) => generator.generate(),
                ColumnSource::Null => FixtureValue::Null,
            };
            *previous = Some(value.clone());
            row.push(value);
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Editable columns sorted by ordinal position.
pub fn editable_columns(columns: &[ColumnMetadata]) -> Vec<&ColumnMetadata> {
    let mut editable: Vec<&ColumnMetadata> =
        columns.iter().filter(|c| c.is_value_editable()).collect();
    editable.sort_by_key(|c| c.ordinal_position());
    editable
}

fn column_source<'a>(
    plan: &'a InsertionPlan,
    column: &ColumnMetadata,
    registry: &DefaultValueRegistry,
) -> Result<ColumnSource<'a>, GeneratorError> {
    if let Some(supplier) = plan.supplier_for(column.name()) {
        return Ok(ColumnSource::Supplier(supplier));
    }
    if column.is_nullable() && !plan.generates_nullable_defaults() {
        return Ok(ColumnSource::Null);
    }
    registry.generator_for(column).map(ColumnSource::Default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixture_core::SqlType;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn test_columns() -> Vec<ColumnMetadata> {
        vec![
            ColumnMetadata::builder("name", SqlType::VarChar)
                .with_max_size(20)
                .with_ordinal_position(3)
                .build(),
            ColumnMetadata::builder("id", SqlType::Integer)
                .with_auto_increment(true)
                .with_ordinal_position(1)
                .build(),
            ColumnMetadata::builder("age", SqlType::Integer)
                .with_ordinal_position(2)
                .build(),
            ColumnMetadata::builder("nickname", SqlType::VarChar)
                .with_max_size(10)
                .with_nullable(true)
                .with_ordinal_position(4)
                .build(),
            ColumnMetadata::builder("total", SqlType::Decimal)
                .with_generated(true)
                .with_ordinal_position(5)
                .build(),
        ]
    }

    #[test]
    fn test_matrix_shape_and_order() {
        let plan = InsertionPlan::new(3)
            .unwrap()
            .with_index_fn("age", |i| i as i32 + 20)
            .with_value("name", "fixed");
        let rows =
            resolve_arguments(&plan, &test_columns(), &DefaultValueRegistry::standard()).unwrap();

        assert_eq!(rows.len(), 3);
        for (i, row) in rows.iter().enumerate() {
            // age, name, nickname
            assert_eq!(row.len(), 3);
            assert_eq!(row[0], FixtureValue::Int32(i as i32 + 20));
            assert_eq!(row[1], FixtureValue::from("fixed"));
            assert_eq!(row[2], FixtureValue::Null);
        }
    }

    #[test]
    fn test_editable_columns_sorted() {
        let columns = test_columns();
        let names: Vec<_> = editable_columns(&columns).iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["age", "name", "nickname"]);
    }

    #[test]
    fn test_defaults_for_non_nullable_columns() {
        let plan = InsertionPlan::new(2).unwrap();
        let rows =
            resolve_arguments(&plan, &test_columns(), &DefaultValueRegistry::standard()).unwrap();

        for row in rows {
            assert!(matches!(row[0], FixtureValue::Int32(v) if v >= 0));
            assert_eq!(row[1].as_str().map(str::len), Some(20));
            assert_eq!(row[2], FixtureValue::Null);
        }
    }

    #[test]
    fn test_nullable_defaults_when_enabled() {
        let plan = InsertionPlan::new(2)
            .unwrap()
            .generate_nullable_defaults(true);
        let rows =
            resolve_arguments(&plan, &test_columns(), &DefaultValueRegistry::standard()).unwrap();

        for row in rows {
            assert_eq!(row[2].as_str().map(str::len), Some(10));
        }
    }

    #[test]
    fn test_previous_value_is_per_column() {
        let plan = InsertionPlan::new(4)
            .unwrap()
            .with_fn("age", |_, prev: Option<&FixtureValue>| {
                prev.and_then(FixtureValue::as_i64).map_or(10, |p| p * 2)
            })
            .with_fn("name", |i, prev: Option<&FixtureValue>| {
                format!("{}{}", prev.and_then(FixtureValue::as_str).unwrap_or(""), i)
            });
        let rows =
            resolve_arguments(&plan, &test_columns(), &DefaultValueRegistry::standard()).unwrap();

        let ages: Vec<_> = rows.iter().map(|r| r[0].as_i64().unwrap()).collect();
        let names: Vec<_> = rows.iter().map(|r| r[1].as_str().unwrap().to_string()).collect();
        assert_eq!(ages, vec![10, 20, 40, 80]);
        assert_eq!(names, vec!["0", "01", "012", "0123"]);
    }

    #[test]
    fn test_supplier_called_once_per_row_in_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&calls);
        let plan = InsertionPlan::new(5).unwrap().with_index_fn("age", move |i| {
            recorded.lock().unwrap().push(i);
            i as i32
        });
        resolve_arguments(&plan, &test_columns(), &DefaultValueRegistry::standard()).unwrap();

        assert_eq!(*calls.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_unknown_plan_columns_are_ignored() {
        let plan = InsertionPlan::new(1)
            .unwrap()
            .with_value("no_such_column", 1)
            .with_value("id", 99);
        let rows =
            resolve_arguments(&plan, &test_columns(), &DefaultValueRegistry::standard()).unwrap();
        assert_eq!(rows[0].len(), 3);
        assert!(!rows[0].contains(&FixtureValue::Int32(99)));
    }

    #[test]
    fn test_no_editable_columns() {
        let columns = vec![
            ColumnMetadata::builder("id", SqlType::BigInt)
                .with_auto_increment(true)
                .build(),
            ColumnMetadata::builder("computed", SqlType::Integer)
                .with_generated(true)
                .build(),
        ];
        let result = resolve_arguments(
            &InsertionPlan::default(),
            &columns,
            &DefaultValueRegistry::standard(),
        );
        assert_eq!(result.unwrap_err(), GeneratorError::NoEditableColumns);
    }

    #[test]
    fn test_unsupported_type_fails_before_any_supplier_runs() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let columns = vec![
            ColumnMetadata::builder("age", SqlType::Integer)
                .with_ordinal_position(1)
                .build(),
            ColumnMetadata::builder("doc", SqlType::Other(1111))
                .with_type_name("json")
                .with_ordinal_position(2)
                .build(),
        ];
        let plan = InsertionPlan::new(3).unwrap().with_index_fn("age", move |i| {
            counter.fetch_add(1, Ordering::SeqCst);
            i as i32
        });

        let err = resolve_arguments(&plan, &columns, &DefaultValueRegistry::standard())
            .unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::UnsupportedColumnType { ref column, .. } if column == "doc"
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unsupported_nullable_column_left_null() {
        let columns = vec![ColumnMetadata::builder("doc", SqlType::Blob)
            .with_nullable(true)
            .build()];
        let rows = resolve_arguments(
            &InsertionPlan::default(),
            &columns,
            &DefaultValueRegistry::standard(),
        )
        .unwrap();
        assert_eq!(rows, vec![vec![FixtureValue::Null]]);
    }
}

//! TableFixture behaviour against the in-memory database.

use rust_decimal::Decimal;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use table_fixture::testing::MemoryDatabase;
use table_fixture::{
    suppliers, ColumnMetadata, FixtureError, FixtureValue, GeneratorError, InsertionPlan, SqlType,
    TableFixture,
};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("table_fixture=debug")
        .try_init()
        .ok();
}

fn accounts_db() -> Arc<MemoryDatabase> {
    let db = Arc::new(MemoryDatabase::new());
    db.create_table("accounts", accounts_columns());
    db
}

fn accounts_columns() -> Vec<ColumnMetadata> {
    vec![
        ColumnMetadata::builder("id", SqlType::BigInt)
            .with_auto_increment(true)
            .with_ordinal_position(1)
            .build(),
        ColumnMetadata::builder("owner", SqlType::VarChar)
            .with_max_size(24)
            .with_ordinal_position(2)
            .build(),
        ColumnMetadata::builder("balance", SqlType::Decimal)
            .with_precision(5)
            .with_scale(2)
            .with_ordinal_position(3)
            .build(),
        ColumnMetadata::builder("level", SqlType::Integer)
            .with_ordinal_position(4)
            .build(),
        ColumnMetadata::builder("nickname", SqlType::VarChar)
            .with_max_size(12)
            .with_nullable(true)
            .with_ordinal_position(5)
            .build(),
        ColumnMetadata::builder("balance_cents", SqlType::BigInt)
            .with_generated(true)
            .with_ordinal_position(6)
            .build(),
    ]
}

fn column_values(fixture: &TableFixture<Arc<MemoryDatabase>>, column: &str) -> Vec<FixtureValue> {
    fixture
        .select_all(&["id"])
        .unwrap()
        .into_iter()
        .map(|mut row| row.remove(column).unwrap())
        .collect()
}

#[test]
fn test_insert_then_select_returns_every_row() {
    init_tracing();
    let fixture = TableFixture::new("accounts", accounts_db());

    for rows in [1, 7, 50] {
        fixture.truncate().unwrap();
        let inserted = fixture.insert(&InsertionPlan::new(rows).unwrap()).unwrap();
        assert_eq!(inserted, rows as u64);
        assert_eq!(fixture.select_all(&["id"]).unwrap().len(), rows);
    }
}

#[test]
fn test_cycle_rule_repeats_values() {
    let fixture = TableFixture::new("accounts", accounts_db());
    let plan = InsertionPlan::new(7)
        .unwrap()
        .with_cycle("owner", ["ann", "bob", "cyd"]);
    fixture.insert(&plan).unwrap();

    let owners = column_values(&fixture, "owner");
    let expected: Vec<FixtureValue> = ["ann", "bob", "cyd", "ann", "bob", "cyd", "ann"]
        .into_iter()
        .map(FixtureValue::from)
        .collect();
    assert_eq!(owners, expected);
}

#[test]
fn test_previous_value_rule_doubles() {
    let fixture = TableFixture::new("accounts", accounts_db());
    let plan = InsertionPlan::new(4)
        .unwrap()
        .with_fn("level", |_, previous: Option<&FixtureValue>| {
            previous.and_then(FixtureValue::as_i32).map_or(10, |p| p * 2)
        });
    fixture.insert(&plan).unwrap();

    let levels: Vec<i32> = column_values(&fixture, "level")
        .iter()
        .map(|v| v.as_i32().unwrap())
        .collect();
    assert_eq!(levels, vec![10, 20, 40, 80]);
}

#[test]
fn test_index_rule_alternates_sign() {
    let fixture = TableFixture::new("accounts", accounts_db());
    let plan = InsertionPlan::new(4).unwrap().with_index_fn("level", |i| {
        let magnitude = i as i32 * 3;
        if i % 2 == 0 {
            magnitude
        } else {
            -magnitude
        }
    });
    fixture.insert(&plan).unwrap();

    let levels: Vec<i32> = column_values(&fixture, "level")
        .iter()
        .map(|v| v.as_i32().unwrap())
        .collect();
    assert!(levels[0] >= 0 && levels[2] >= 0);
    assert!(levels[1] <= 0 && levels[3] <= 0);
}

#[test]
fn test_truncate_reports_deleted_rows() {
    let fixture = TableFixture::new("accounts", accounts_db());
    fixture.insert(&InsertionPlan::new(5).unwrap()).unwrap();

    assert_eq!(fixture.truncate().unwrap(), 5);
    assert!(fixture.select_all(&[]).unwrap().is_empty());
    assert_eq!(fixture.truncate().unwrap(), 0);
}

#[test]
fn test_no_editable_columns_fails_before_any_statement() {
    let db = Arc::new(MemoryDatabase::new());
    db.create_table(
        "counters",
        vec![
            ColumnMetadata::builder("id", SqlType::BigInt)
                .with_auto_increment(true)
                .with_ordinal_position(1)
                .build(),
            ColumnMetadata::builder("doubled", SqlType::BigInt)
                .with_generated(true)
                .with_ordinal_position(2)
                .build(),
        ],
    );
    let fixture = TableFixture::new("counters", Arc::clone(&db));

    let result = fixture.insert(&InsertionPlan::default());
    assert!(matches!(
        result,
        Err(FixtureError::NoEditableColumns { ref table }) if table == "counters"
    ));
    assert!(db.statements().is_empty());
}

#[test]
fn test_decimal_default_respects_precision_and_scale() {
    let fixture = TableFixture::new("accounts", accounts_db());
    fixture.insert(&InsertionPlan::new(200).unwrap()).unwrap();

    let upper = Decimal::new(99999, 2);
    for value in column_values(&fixture, "balance") {
        let balance = value.as_decimal().unwrap();
        assert!(balance >= Decimal::ZERO && balance <= upper, "{balance}");
        assert_eq!(balance.scale(), 2);
    }
}

#[test]
fn test_nullable_columns_default_to_null() {
    let fixture = TableFixture::new("accounts", accounts_db());
    fixture.insert(&InsertionPlan::new(3).unwrap()).unwrap();
    assert!(column_values(&fixture, "nickname")
        .iter()
        .all(FixtureValue::is_null));

    fixture.truncate().unwrap();
    let plan = InsertionPlan::new(3)
        .unwrap()
        .generate_nullable_defaults(true);
    fixture.insert(&plan).unwrap();
    for nickname in column_values(&fixture, "nickname") {
        let text = nickname.as_str().unwrap();
        assert_eq!(text.len(), 12);
    }
}

#[test]
fn test_plan_can_be_changed_and_reused() {
    let fixture = TableFixture::new("accounts", accounts_db());
    let mut plan = InsertionPlan::new(2).unwrap().with_value("owner", "first");
    fixture.insert(&plan).unwrap();

    plan.set_row_count(3).unwrap();
    plan.set_supplier("owner", table_fixture::ValueSupplier::constant("second"));
    fixture.insert(&plan).unwrap();

    let owners = column_values(&fixture, "owner");
    assert_eq!(owners.len(), 5);
    assert_eq!(owners[1], FixtureValue::from("first"));
    assert_eq!(owners[4], FixtureValue::from("second"));
}

#[test]
fn test_unknown_plan_columns_are_ignored() {
    let fixture = TableFixture::new("accounts", accounts_db());
    let plan = InsertionPlan::new(2)
        .unwrap()
        .with_value("owner", "x")
        .with_value("not_a_column", 1)
        .with_value("balance_cents", 5);
    assert_eq!(fixture.insert(&plan).unwrap(), 2);
}

#[test]
fn test_unsupported_type_fails_before_insert() {
    let db = Arc::new(MemoryDatabase::new());
    db.create_table(
        "documents",
        vec![ColumnMetadata::builder("body", SqlType::Other(1111))
            .with_type_name("JSON")
            .with_ordinal_position(1)
            .build()],
    );
    let fixture = TableFixture::new("documents", Arc::clone(&db));

    let result = fixture.insert(&InsertionPlan::default());
    assert!(matches!(
        result,
        Err(FixtureError::Generation(GeneratorError::UnsupportedColumnType { .. }))
    ));
    assert!(db.statements().is_empty());
}

#[test]
fn test_metadata_loaded_once_under_concurrency() {
    let db = Arc::new(MemoryDatabase::new().with_introspection_delay(Duration::from_millis(20)));
    db.create_table("accounts", accounts_columns());
    let fixture = TableFixture::new("accounts", Arc::clone(&db));

    let plan = InsertionPlan::new(2).unwrap();

    thread::scope(|scope| {
        for i in 0..24 {
            let fixture = &fixture;
            let plan = &plan;
            scope.spawn(move || match i % 3 {
                0 => assert_eq!(fixture.insert(plan).unwrap(), 2),
                1 => {
                    fixture.select_all(&["id"]).unwrap();
                }
                _ => assert_eq!(fixture.columns().unwrap().len(), 6),
            });
        }
    });

    assert_eq!(db.introspection_count(), 1);
    assert_eq!(fixture.select_all(&[]).unwrap().len(), 16);
}

#[test]
fn test_metadata_failure_is_retried() {
    let db = accounts_db();
    db.fail_next_introspections(1);
    let fixture = TableFixture::new("accounts", Arc::clone(&db));

    assert!(matches!(
        fixture.columns(),
        Err(FixtureError::MetadataFetch { .. })
    ));
    assert_eq!(fixture.columns().unwrap().len(), 6);
    assert_eq!(fixture.columns().unwrap().len(), 6);
    assert_eq!(db.introspection_count(), 2);
}

#[test]
fn test_select_all_keeps_only_cached_columns() {
    let db = accounts_db();
    let fixture = TableFixture::new("accounts", Arc::clone(&db));
    fixture.insert(&InsertionPlan::new(1).unwrap()).unwrap();

    db.add_column(
        "accounts",
        ColumnMetadata::builder("added_later", SqlType::Integer)
            .with_nullable(true)
            .with_ordinal_position(7)
            .build(),
    )
    .unwrap();

    let rows = fixture.select_all(&[]).unwrap();
    assert_eq!(rows[0].len(), 6);
    assert!(!rows[0].contains_key("added_later"));
}

#[test]
fn test_select_all_order_by_descending() {
    let fixture = TableFixture::new("accounts", accounts_db());
    fixture
        .insert(&InsertionPlan::new(3).unwrap().with_index_fn("level", |i| i as i32))
        .unwrap();

    let levels: Vec<_> = fixture
        .select_all(&["level DESC"])
        .unwrap()
        .into_iter()
        .map(|row| row["level"].clone())
        .collect();
    assert_eq!(
        levels,
        vec![
            FixtureValue::Int32(2),
            FixtureValue::Int32(1),
            FixtureValue::Int32(0)
        ]
    );
}

#[test]
fn test_multiple_of_without_fitting_multiple_is_rejected() {
    assert!(matches!(
        suppliers::int::multiple_of(10, 2, 7),
        Err(GeneratorError::InvalidPlan(_))
    ));
}

#[test]
fn test_bounded_suppliers_in_a_plan() {
    let fixture = TableFixture::new("accounts", accounts_db());
    let plan = InsertionPlan::new(30)
        .unwrap()
        .with_supplier("level", suppliers::int::multiple_of(5, 0, 100).unwrap())
        .with_supplier("owner", suppliers::string::random(3, 8).unwrap());
    fixture.insert(&plan).unwrap();

    for row in fixture.select_all(&["id"]).unwrap() {
        let level = row["level"].as_i32().unwrap();
        assert!(level % 5 == 0 && (0..=100).contains(&level));
        let owner_len = row["owner"].as_str().unwrap().len();
        assert!((3..=8).contains(&owner_len));
    }
}

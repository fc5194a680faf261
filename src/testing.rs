//! In-memory [`DataAccess`] for tests.
//!
//! [`MemoryDatabase`] understands exactly the statements a
//! [`crate::TableFixture`] emits:
//!
//! - `DELETE FROM <table>`
//! - `SELECT * FROM <table> [ORDER BY <col> [ASC|DESC], ...]`
//! - `INSERT INTO <table> (<col>, ...) VALUES (?, ...)`
//!
//! Auto-increment columns are filled on insert, every executed statement is
//! recorded, and introspection calls are counted and can be made to fail.

use fixture_core::{
    ColumnMetadata, DataAccess, DataAccessError, FixtureRow, FixtureValue, ResultRow,
};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

#[derive(Debug, Default)]
struct MemoryTable {
    columns: Vec<ColumnMetadata>,
    rows: Vec<FixtureRow>,
    next_auto_increment: i64,
}

/// A thread-safe in-memory database.
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    tables: Mutex<HashMap<String, MemoryTable>>,
    statements: Mutex<Vec<String>>,
    introspections: AtomicUsize,
    failing_introspections: AtomicUsize,
    introspection_delay: Option<Duration>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every introspection call.
    pub fn with_introspection_delay(mut self, delay: Duration) -> Self {
        self.introspection_delay = Some(delay);
        self
    }

    /// Create (or replace) a table.
    pub fn create_table(&self, name: &str, columns: Vec<ColumnMetadata>) {
        let table = MemoryTable {
            columns,
            rows: Vec::new(),
            next_auto_increment: 1,
        };
        self.lock_tables().insert(name.to_string(), table);
    }

    /// Add a column to an existing table; existing rows get null.
    pub fn add_column(&self, table: &str, column: ColumnMetadata) -> Result<(), DataAccessError> {
        let mut tables = self.lock_tables();
        let table = tables
            .get_mut(table)
            .ok_or_else(|| DataAccessError::Introspection {
                table: table.to_string(),
                message: "no such table".to_string(),
            })?;
        for row in &mut table.rows {
            row.insert(column.name().to_string(), FixtureValue::Null);
        }
        table.columns.push(column);
        Ok(())
    }

    /// Make the next `count` introspection calls fail.
    pub fn fail_next_introspections(&self, count: usize) {
        self.failing_introspections
            .store(count, AtomicOrdering::SeqCst);
    }

    /// How many times [`DataAccess::fetch_columns`] has been called.
    pub fn introspection_count(&self) -> usize {
        self.introspections.load(AtomicOrdering::SeqCst)
    }

    /// Every statement passed to `update`, `batch_update` or `query`, in order.
    pub fn statements(&self) -> Vec<String> {
        self.statements
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of rows currently stored in `table`.
    pub fn row_count(&self, table: &str) -> usize {
        self.lock_tables()
            .get(table)
            .map_or(0, |t| t.rows.len())
    }

    fn lock_tables(&self) -> std::sync::MutexGuard<'_, HashMap<String, MemoryTable>> {
        self.tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, sql: &str) {
        self.statements
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(sql.to_string());
    }

    fn take_failure(&self) -> bool {
        self.failing_introspections
            .fetch_update(AtomicOrdering::SeqCst, AtomicOrdering::SeqCst, |n| {
                n.checked_sub(1)
            })
            .is_ok()
    }
}

impl DataAccess for MemoryDatabase {
    fn fetch_columns(&self, table: &str) -> Result<Vec<ColumnMetadata>, DataAccessError> {
        self.introspections.fetch_add(1, AtomicOrdering::SeqCst);
        if let Some(delay) = self.introspection_delay {
            thread::sleep(delay);
        }
        if self.take_failure() {
            return Err(DataAccessError::Connection(
                "simulated introspection failure".to_string(),
            ));
        }

        self.lock_tables()
            .get(table)
            .map(|t| t.columns.clone())
            .ok_or_else(|| DataAccessError::Introspection {
                table: table.to_string(),
                message: "no such table".to_string(),
            })
    }

    fn update(&self, sql: &str) -> Result<u64, DataAccessError> {
        self.record(sql);
        let name = sql
            .strip_prefix("DELETE FROM ")
            .map(str::trim)
            .ok_or_else(|| unsupported(sql))?;

        let mut tables = self.lock_tables();
        let table = tables.get_mut(name).ok_or_else(|| no_table(sql, name))?;
        let deleted = table.rows.len() as u64;
        table.rows.clear();
        Ok(deleted)
    }

    fn batch_update(
        &self,
        sql: &str,
        batch: &[Vec<FixtureValue>],
    ) -> Result<Vec<u64>, DataAccessError> {
        self.record(sql);
        let (name, columns) = parse_insert(sql)?;

        let mut tables = self.lock_tables();
        let table = tables.get_mut(name).ok_or_else(|| no_table(sql, name))?;

        for column in &columns {
            if !table.columns.iter().any(|c| c.name() == *column) {
                return Err(statement_error(sql, format!("unknown column '{column}'")));
            }
        }
        if let Some(args) = batch.iter().find(|args| args.len() != columns.len()) {
            return Err(statement_error(
                sql,
                format!(
                    "expected {} arguments, got {}",
                    columns.len(),
                    args.len()
                ),
            ));
        }

        for args in batch {
            let mut row = FixtureRow::new();
            for column in &table.columns {
                let value = match columns.iter().position(|c| *c == column.name()) {
                    Some(index) => args[index].clone(),
                    None if column.is_auto_increment() => {
                        let id = table.next_auto_increment;
                        table.next_auto_increment += 1;
                        FixtureValue::Int64(id)
                    }
                    None => FixtureValue::Null,
                };
                row.insert(column.name().to_string(), value);
            }
            table.rows.push(row);
        }

        Ok(vec![1; batch.len()])
    }

    fn query(
        &self,
        sql: &str,
        on_row: &mut dyn FnMut(&dyn ResultRow) -> Result<(), DataAccessError>,
    ) -> Result<(), DataAccessError> {
        self.record(sql);
        let (name, order_by) = parse_select(sql)?;

        let mut rows = {
            let tables = self.lock_tables();
            let table = tables.get(name).ok_or_else(|| no_table(sql, name))?;
            table.rows.clone()
        };

        rows.sort_by(|a, b| {
            order_by
                .iter()
                .map(|(column, descending)| {
                    let ordering = compare_values(
                        a.get(*column).unwrap_or(&FixtureValue::Null),
                        b.get(*column).unwrap_or(&FixtureValue::Null),
                    );
                    if *descending {
                        ordering.reverse()
                    } else {
                        ordering
                    }
                })
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        });

        for row in &rows {
            on_row(row)?;
        }
        Ok(())
    }
}

fn unsupported(sql: &str) -> DataAccessError {
    statement_error(sql, "unsupported statement".to_string())
}

fn no_table(sql: &str, table: &str) -> DataAccessError {
    statement_error(sql, format!("table '{table}' doesn't exist"))
}

fn statement_error(sql: &str, message: String) -> DataAccessError {
    DataAccessError::Statement {
        sql: sql.to_string(),
        message,
    }
}

/// Split `INSERT INTO t (a, b) VALUES (?, ?)` into the table and column list.
fn parse_insert(sql: &str) -> Result<(&str, Vec<&str>), DataAccessError> {
    let rest = sql.strip_prefix("INSERT INTO ").ok_or_else(|| unsupported(sql))?;
    let (name, rest) = rest.split_once(" (").ok_or_else(|| unsupported(sql))?;
    let (columns, values) = rest.split_once(") VALUES (").ok_or_else(|| unsupported(sql))?;
    let placeholders = values.strip_suffix(')').ok_or_else(|| unsupported(sql))?;

    let columns: Vec<&str> = columns.split(',').map(str::trim).collect();
    let placeholder_count = placeholders.split(',').filter(|p| p.trim() == "?").count();
    if placeholder_count != columns.len() {
        return Err(statement_error(
            sql,
            "column count doesn't match placeholder count".to_string(),
        ));
    }
    Ok((name.trim(), columns))
}

/// Split `SELECT * FROM t ORDER BY a, b DESC` into the table and sort keys.
fn parse_select(sql: &str) -> Result<(&str, Vec<(&str, bool)>), DataAccessError> {
    let rest = sql.strip_prefix("SELECT * FROM ").ok_or_else(|| unsupported(sql))?;
    let (name, order) = match rest.split_once(" ORDER BY ") {
        Some((name, order)) => (name, Some(order)),
        None => (rest, None),
    };

    let mut order_by = Vec::new();
    for expr in order.into_iter().flat_map(|o| o.split(',')) {
        let mut parts = expr.split_whitespace();
        let column = parts.next().ok_or_else(|| unsupported(sql))?;
        let descending = match parts.next() {
            None => false,
            Some(dir) if dir.eq_ignore_ascii_case("ASC") => false,
            Some(dir) if dir.eq_ignore_ascii_case("DESC") => true,
            Some(_) => return Err(unsupported(sql)),
        };
        order_by.push((column, descending));
    }
    Ok((name.trim(), order_by))
}

/// Total order used for `ORDER BY`: nulls first, then by natural value.
fn compare_values(a: &FixtureValue, b: &FixtureValue) -> Ordering {
    match (a, b) {
        (FixtureValue::Null, FixtureValue::Null) => Ordering::Equal,
        (FixtureValue::Null, _) => Ordering::Less,
        (_, FixtureValue::Null) => Ordering::Greater,
        _ => {
            if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
                x.cmp(&y)
            } else if let (Some(x), Some(y)) = (a.as_decimal(), b.as_decimal()) {
                x.cmp(&y)
            } else if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
                x.total_cmp(&y)
            } else if let (Some(x), Some(y)) = (a.as_str(), b.as_str()) {
                x.cmp(y)
            } else if let (Some(x), Some(y)) = (a.as_datetime(), b.as_datetime()) {
                x.cmp(&y)
            } else if let (Some(x), Some(y)) = (a.as_date(), b.as_date()) {
                x.cmp(&y)
            } else if let (Some(x), Some(y)) = (a.as_time(), b.as_time()) {
                x.cmp(&y)
            } else if let (Some(x), Some(y)) = (a.as_bool(), b.as_bool()) {
                x.cmp(&y)
            } else {
                a.kind().cmp(b.kind())
            }
        }
    }
}

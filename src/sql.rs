//! SQL text for the three statement shapes a fixture emits.
//!
//! Identifiers are written as given; the fixture never quotes them.

use fixture_core::ColumnMetadata;

/// `DELETE FROM <table>`
pub fn truncate_sql(table: &str) -> String {
    format!("DELETE FROM {table}")
}

/// `SELECT * FROM <table>` with an optional `ORDER BY` of the given expressions.
pub fn select_sql(table: &str, order_by: &[&str]) -> String {
    if order_by.is_empty() {
        format!("SELECT * FROM {table}")
    } else {
        format!("SELECT * FROM {table} ORDER BY {}", order_by.join(", "))
    }
}

/// `INSERT INTO <table> (c1, c2, ...) VALUES (?, ?, ...)`, one placeholder per column.
pub fn insert_sql(table: &str, columns: &[&ColumnMetadata]) -> String {
    let names: Vec<&str> = columns.iter().map(|c| c.name()).collect();
    let placeholders: Vec<&str> = columns.iter().map(|_| "?").collect();
    format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        names.join(", "),
        placeholders.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixture_core::SqlType;

    #[test]
    fn test_truncate_sql() {
        assert_eq!(truncate_sql("users"), "DELETE FROM users");
    }

    #[test]
    fn test_select_sql_without_order() {
        assert_eq!(select_sql("users", &[]), "SELECT * FROM users");
    }

    #[test]
    fn test_select_sql_with_order() {
        assert_eq!(
            select_sql("users", &["id"]),
            "SELECT * FROM users ORDER BY id"
        );
        assert_eq!(
            select_sql("users", &["last_name", "age DESC"]),
            "SELECT * FROM users ORDER BY last_name, age DESC"
        );
    }

    #[test]
    fn test_insert_sql() {
        let name = ColumnMetadata::builder("name", SqlType::VarChar).build();
        let age = ColumnMetadata::builder("age", SqlType::Integer).build();
        assert_eq!(
            insert_sql("users", &[&name, &age]),
            "INSERT INTO users (name, age) VALUES (?, ?)"
        );
    }
}

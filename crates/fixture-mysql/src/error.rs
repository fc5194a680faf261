//! Error types for the MySQL execution capability.

use fixture_core::DataAccessError;
use thiserror::Error;

/// Errors raised while setting up a MySQL connection pool.
#[derive(Error, Debug)]
pub enum MySqlAccessError {
    /// The connection string could not be parsed.
    #[error("Invalid MySQL connection string: {0}")]
    Url(#[from] mysql_async::UrlError),

    /// The blocking runtime could not be started.
    #[error("Failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),

    /// MySQL connection or query error.
    #[error("MySQL error: {0}")]
    MySql(#[from] mysql_async::Error),
}

pub(crate) fn statement_error(sql: &str, err: mysql_async::Error) -> DataAccessError {
    match err {
        mysql_async::Error::Io(e) => DataAccessError::Connection(e.to_string()),
        other => DataAccessError::Statement {
            sql: sql.to_string(),
            message: other.to_string(),
        },
    }
}

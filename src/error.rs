//! Error types for database access and instrumentation.

use thiserror::Error;

/// Main error type for database operations.
///
/// The instrumented decorator never originates these itself; they are
/// produced at the backend boundary and forwarded unmodified after logging.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DbError {
    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(String),

    /// Connection pool error
    #[error("Pool error: {0}")]
    Pool(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result alias used throughout the crate.
pub type DbResult<T> = Result<T, DbError>;

impl From<tokio_postgres::Error> for DbError {
    fn from(err: tokio_postgres::Error) -> Self {
        DbError::Query(err.to_string())
    }
}

impl From<deadpool_postgres::PoolError> for DbError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        DbError::Pool(err.to_string())
    }
}

impl From<deadpool_postgres::CreatePoolError> for DbError {
    fn from(err: deadpool_postgres::CreatePoolError) -> Self {
        DbError::Pool(err.to_string())
    }
}

impl From<url::ParseError> for DbError {
    fn from(err: url::ParseError) -> Self {
        DbError::Configuration(format!("Invalid database URL: {}", err))
    }
}

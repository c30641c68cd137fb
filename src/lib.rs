//! # sqltrace
//!
//! Instrumentation layer for database access and HTTP-framework diagnostics:
//! every database operation is transparently timed and logged through the
//! `tracing` ecosystem, and legacy framework log lines are redirected into
//! the same structured backend.
//!
//! ## Features
//!
//! - Behavior-preserving decorator over any database handle: same call
//!   contract, one structured log event per operation (statement, bound
//!   parameters, elapsed time, outcome)
//! - Level keyed on outcome: Debug on success, Error on failure, errors
//!   forwarded unmodified
//! - Capability trait (`DbHandle`) so real backends and mocks substitute
//!   freely
//! - Pooled Postgres backend over `deadpool-postgres`
//! - Framework log redirection: writer sinks that forward raw log lines into
//!   `tracing` at fixed levels
//! - Explicit call context (`RequestContext`) carrying span and request id
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sqltrace::{
//!     DatabaseConfig, DbHandle, InstrumentedDb, PostgresDb, RequestContext, SqlValue,
//! };
//! use sqltrace::observability::{LogLevel, LoggingConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     LoggingConfig::new().with_level(LogLevel::Debug).init()?;
//!
//!     let db = InstrumentedDb::new(PostgresDb::new(DatabaseConfig::from_env())?);
//!
//!     let ctx = RequestContext::new().with_request_id("req-1");
//!     let rows = db
//!         .query(&ctx, "SELECT id FROM users WHERE active = $1", &[SqlValue::from(true)])
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - `db` - The capability trait, the instrumented decorator, the Postgres
//!   backend
//! - `context` - Explicit call context and context-scoped logger access
//! - `redirect` - Framework log-sink redirection
//! - `observability` - Logging bootstrap
//! - `config` - Database configuration
//! - `error` - Error types
//! - `mocks` - Mock implementations for testing

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod observability;
pub mod redirect;

// Development/testing modules
#[cfg(test)]
pub mod mocks;

// Re-exports for convenience
pub use config::DatabaseConfig;
pub use context::{logger_for, RequestContext};
pub use db::{DbHandle, InstrumentedDb, PostgresDb, RowHandle, SqlValue};
pub use error::{DbError, DbResult};
pub use redirect::{redirect_framework_logs, FrameworkLogHooks, RedirectSink};

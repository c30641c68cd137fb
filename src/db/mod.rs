//! Database access: the capability trait, the instrumented decorator, and
//! the Postgres backend.
//!
//! The decorator is the heart of the crate:
//!
//! ```rust,no_run
//! use sqltrace::{DatabaseConfig, DbHandle, InstrumentedDb, PostgresDb, RequestContext};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let db = InstrumentedDb::new(PostgresDb::new(DatabaseConfig::from_env())?);
//! let rows = db.query(&RequestContext::new(), "SELECT * FROM users", &[]).await?;
//! # Ok(())
//! # }
//! ```

mod handle;
mod instrumented;
mod postgres;

pub use handle::{DbHandle, RowHandle, SqlValue};
pub use instrumented::InstrumentedDb;
pub use postgres::PostgresDb;

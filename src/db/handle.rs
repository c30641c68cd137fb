//! The database-access capability trait and its supporting types.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::context::RequestContext;
use crate::error::{DbError, DbResult};

/// A bound statement parameter in driver-agnostic form.
///
/// Parameters travel through the instrumentation layer in this representation
/// so they can be logged (`Debug`) without knowing anything about the backend;
/// each backend lowers them to its native bind types.
///
/// # Examples
///
/// ```
/// use sqltrace::SqlValue;
///
/// let params = vec![SqlValue::from("alice"), SqlValue::from(42i64)];
/// assert_eq!(params[0], SqlValue::Text("alice".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL NULL
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// Text value
    Text(String),
    /// Raw byte string
    Bytes(Vec<u8>),
    /// UTC timestamp
    Timestamp(DateTime<Utc>),
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v as i64)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        SqlValue::Bytes(v)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(v)
    }
}

impl<T> From<Option<T>> for SqlValue
where
    T: Into<SqlValue>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => SqlValue::Null,
        }
    }
}

/// Deferred-outcome handle returned by single-row queries.
///
/// Mirrors the contract of single-row query APIs that cannot fail at the call
/// site: the underlying error, if any, surfaces only when the row is
/// consumed via [`RowHandle::row`].
///
/// # Examples
///
/// ```
/// use sqltrace::{DbError, RowHandle};
///
/// let ok: RowHandle<u32> = RowHandle::ok(7);
/// assert_eq!(ok.row().unwrap(), 7);
///
/// let err: RowHandle<u32> = RowHandle::err(DbError::Query("no rows".into()));
/// assert!(err.row().is_err());
/// ```
#[derive(Debug)]
pub struct RowHandle<T> {
    outcome: DbResult<T>,
}

impl<T> RowHandle<T> {
    /// Wraps a successfully fetched row.
    pub fn ok(row: T) -> Self {
        Self { outcome: Ok(row) }
    }

    /// Wraps a deferred failure.
    pub fn err(error: DbError) -> Self {
        Self {
            outcome: Err(error),
        }
    }

    /// Consumes the handle, surfacing the row or the deferred error.
    pub fn row(self) -> DbResult<T> {
        self.outcome
    }

    /// Whether the deferred outcome is an error, without consuming the handle.
    pub fn is_err(&self) -> bool {
        self.outcome.is_err()
    }
}

/// The database-access capability.
///
/// Anything that can execute, prepare, and query SQL statements given a
/// statement string and ordered parameters. The instrumented decorator
/// implements this trait over any other implementation, so real backends and
/// mocks substitute freely.
///
/// Cancellation is the caller dropping the in-flight future; implementations
/// must not cache statements or otherwise share per-call state, so `&self`
/// methods are safe to call concurrently.
#[async_trait]
pub trait DbHandle: Send + Sync {
    /// Backend-specific prepared-statement handle.
    type Prepared: Send;
    /// Backend-specific row-set handle.
    type Rows: Send;
    /// Backend-specific single-row handle.
    type Row: Send;

    /// Executes a statement, returning the number of rows affected.
    async fn execute(
        &self,
        ctx: &RequestContext,
        statement: &str,
        params: &[SqlValue],
    ) -> DbResult<u64>;

    /// Prepares a statement, returning the backend's raw prepared handle.
    ///
    /// Executions through the returned handle are NOT instrumented; see the
    /// decorator documentation.
    async fn prepare(&self, ctx: &RequestContext, statement: &str) -> DbResult<Self::Prepared>;

    /// Runs a query, returning the backend's row set.
    async fn query(
        &self,
        ctx: &RequestContext,
        statement: &str,
        params: &[SqlValue],
    ) -> DbResult<Self::Rows>;

    /// Runs a single-row query.
    ///
    /// Cannot fail at the call site; any failure is deferred into the
    /// returned [`RowHandle`].
    async fn query_row(
        &self,
        ctx: &RequestContext,
        statement: &str,
        params: &[SqlValue],
    ) -> RowHandle<Self::Row>;
}

//! The instrumented database-access decorator.
//!
//! [`InstrumentedDb`] wraps any [`DbHandle`] and implements the same trait,
//! so it drops into any code written against the capability. Every operation
//! is timed around the delegated call only and produces exactly one log
//! event after the call returns: Debug on success, Error on failure, with
//! the statement text, bound parameters, and elapsed milliseconds as fields.
//!
//! The decorator is a pure observability facade: it never retries, rewrites,
//! or swallows results, and it adds no transactional semantics.

use std::time::Instant;

use async_trait::async_trait;

use crate::context::{logger_for, RequestContext};
use crate::db::handle::{DbHandle, RowHandle, SqlValue};
use crate::error::DbResult;

/// Behavior-preserving logging decorator over a database handle.
///
/// # Examples
///
/// ```rust,no_run
/// use sqltrace::{DatabaseConfig, InstrumentedDb, PostgresDb, RequestContext, SqlValue};
/// use sqltrace::DbHandle;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = PostgresDb::new(DatabaseConfig::from_env())?;
/// let db = InstrumentedDb::new(backend);
///
/// let ctx = RequestContext::new().with_request_id("req-1");
/// let affected = db
///     .execute(&ctx, "UPDATE users SET active = $1", &[SqlValue::from(true)])
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct InstrumentedDb<D> {
    inner: D,
}

impl<D> InstrumentedDb<D> {
    /// Wraps a database handle.
    pub fn new(inner: D) -> Self {
        Self { inner }
    }

    /// Borrows the wrapped handle.
    pub fn inner(&self) -> &D {
        &self.inner
    }

    /// Unwraps the decorator, returning the inner handle.
    pub fn into_inner(self) -> D {
        self.inner
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

#[async_trait]
impl<D: DbHandle> DbHandle for InstrumentedDb<D> {
    type Prepared = D::Prepared;
    type Rows = D::Rows;
    type Row = D::Row;

    async fn execute(
        &self,
        ctx: &RequestContext,
        statement: &str,
        params: &[SqlValue],
    ) -> DbResult<u64> {
        let start = Instant::now();
        let result = self.inner.execute(ctx, statement, params).await;
        let duration_ms = elapsed_ms(start);

        logger_for(ctx).in_scope(|| match &result {
            Err(error) => tracing::error!(
                request_id = ctx.request_id(),
                statement,
                params = ?params,
                duration_ms,
                error = %error,
                "SQL exec"
            ),
            Ok(_) => tracing::debug!(
                request_id = ctx.request_id(),
                statement,
                params = ?params,
                duration_ms,
                "SQL exec"
            ),
        });

        result
    }

    async fn prepare(&self, ctx: &RequestContext, statement: &str) -> DbResult<Self::Prepared> {
        let start = Instant::now();
        let result = self.inner.prepare(ctx, statement).await;
        let duration_ms = elapsed_ms(start);

        logger_for(ctx).in_scope(|| match &result {
            Err(error) => tracing::error!(
                request_id = ctx.request_id(),
                statement,
                duration_ms,
                error = %error,
                "SQL prepare"
            ),
            Ok(_) => tracing::debug!(
                request_id = ctx.request_id(),
                statement,
                duration_ms,
                "SQL prepare"
            ),
        });

        // The raw prepared handle is returned as-is; executions through it
        // bypass instrumentation.
        result
    }

    async fn query(
        &self,
        ctx: &RequestContext,
        statement: &str,
        params: &[SqlValue],
    ) -> DbResult<Self::Rows> {
        let start = Instant::now();
        let result = self.inner.query(ctx, statement, params).await;
        let duration_ms = elapsed_ms(start);

        logger_for(ctx).in_scope(|| match &result {
            Err(error) => tracing::error!(
                request_id = ctx.request_id(),
                statement,
                params = ?params,
                duration_ms,
                error = %error,
                "SQL query"
            ),
            Ok(_) => tracing::debug!(
                request_id = ctx.request_id(),
                statement,
                params = ?params,
                duration_ms,
                "SQL query"
            ),
        });

        result
    }

    async fn query_row(
        &self,
        ctx: &RequestContext,
        statement: &str,
        params: &[SqlValue],
    ) -> RowHandle<Self::Row> {
        let start = Instant::now();
        let row = self.inner.query_row(ctx, statement, params).await;
        let duration_ms = elapsed_ms(start);

        // The call site cannot fail synchronously; any failure is deferred
        // inside the handle, so this always logs at Debug.
        logger_for(ctx).in_scope(|| {
            tracing::debug!(
                request_id = ctx.request_id(),
                statement,
                params = ?params,
                duration_ms,
                "SQL query row"
            )
        });

        row
    }
}

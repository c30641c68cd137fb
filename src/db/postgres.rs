//! Postgres implementation of the database-access capability.

use async_trait::async_trait;
use deadpool_postgres::{Pool, Runtime};
use tokio_postgres::types::ToSql;
use tokio_postgres::{NoTls, Row, Statement};

use crate::config::DatabaseConfig;
use crate::context::RequestContext;
use crate::db::handle::{DbHandle, RowHandle, SqlValue};
use crate::error::{DbError, DbResult};

/// Pooled Postgres backend.
///
/// Checks a client out of a `deadpool-postgres` pool per operation, the same
/// way a pooling database handle behaves in other stacks. Usually consumed
/// through [`InstrumentedDb`](crate::InstrumentedDb) rather than directly.
pub struct PostgresDb {
    pool: Pool,
    config: DatabaseConfig,
}

impl PostgresDb {
    /// Builds a connection pool from the given configuration.
    pub fn new(config: DatabaseConfig) -> DbResult<Self> {
        let mut cfg = deadpool_postgres::Config::new();
        cfg.host = Some(config.host.clone());
        cfg.port = Some(config.port);
        cfg.user = Some(config.user.clone());
        cfg.password = Some(config.password.clone());
        cfg.dbname = Some(config.database.clone());
        cfg.pool = Some(deadpool_postgres::PoolConfig::new(config.max_connections));

        let pool = cfg.create_pool(Some(Runtime::Tokio1), NoTls)?;

        Ok(Self { pool, config })
    }

    /// Builds a pool from environment configuration.
    pub fn from_env() -> DbResult<Self> {
        Self::new(DatabaseConfig::from_env())
    }

    /// The configuration this pool was built from.
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Connectivity probe: round-trips `SELECT 1`.
    pub async fn ping(&self) -> DbResult<()> {
        let client = self.client().await?;
        client.query_one("SELECT 1", &[]).await?;
        Ok(())
    }

    /// Current pool statistics as (size, available).
    pub fn pool_stats(&self) -> (usize, usize) {
        let status = self.pool.status();
        (status.size, status.available)
    }

    async fn client(&self) -> DbResult<deadpool_postgres::Client> {
        self.pool.get().await.map_err(DbError::from)
    }
}

/// Lowers a [`SqlValue`] to a native Postgres bind reference.
fn bind_ref(value: &SqlValue) -> &(dyn ToSql + Sync) {
    static NULL_PARAM: Option<String> = None;
    match value {
        SqlValue::Null => &NULL_PARAM,
        SqlValue::Bool(v) => v,
        SqlValue::Int(v) => v,
        SqlValue::Float(v) => v,
        SqlValue::Text(v) => v,
        SqlValue::Bytes(v) => v,
        SqlValue::Timestamp(v) => v,
    }
}

fn bind_refs(params: &[SqlValue]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(bind_ref).collect()
}

#[async_trait]
impl DbHandle for PostgresDb {
    type Prepared = Statement;
    type Rows = Vec<Row>;
    type Row = Row;

    async fn execute(
        &self,
        _ctx: &RequestContext,
        statement: &str,
        params: &[SqlValue],
    ) -> DbResult<u64> {
        let client = self.client().await?;
        let affected = client.execute(statement, &bind_refs(params)).await?;
        Ok(affected)
    }

    async fn prepare(&self, _ctx: &RequestContext, statement: &str) -> DbResult<Self::Prepared> {
        let client = self.client().await?;
        let prepared = client.prepare(statement).await?;
        Ok(prepared)
    }

    async fn query(
        &self,
        _ctx: &RequestContext,
        statement: &str,
        params: &[SqlValue],
    ) -> DbResult<Self::Rows> {
        let client = self.client().await?;
        let rows = client.query(statement, &bind_refs(params)).await?;
        Ok(rows)
    }

    async fn query_row(
        &self,
        _ctx: &RequestContext,
        statement: &str,
        params: &[SqlValue],
    ) -> RowHandle<Self::Row> {
        // Pool acquisition and query failures alike are deferred into the
        // handle; the call site stays infallible.
        let client = match self.client().await {
            Ok(client) => client,
            Err(error) => return RowHandle::err(error),
        };
        match client.query_one(statement, &bind_refs(params)).await {
            Ok(row) => RowHandle::ok(row),
            Err(error) => RowHandle::err(error.into()),
        }
    }
}

//! Mock implementations and log-capture support for testing.
//!
//! [`MockDbHandle`] is a scripted stand-in for a real backend: outcomes are
//! queued per call, an artificial delay can be injected to make timing
//! observable, and every call is recorded for assertions. [`CaptureLayer`]
//! collects emitted `tracing` events (level, message, fields) so tests can
//! assert on exactly what was logged.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use crate::context::RequestContext;
use crate::db::{DbHandle, RowHandle, SqlValue};
use crate::error::{DbError, DbResult};

/// A recorded call against the mock handle.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Which operation was invoked ("execute", "prepare", "query", "query_row").
    pub operation: &'static str,
    /// The statement text as received.
    pub statement: String,
    /// The bound parameters as received (empty for prepare).
    pub params: Vec<SqlValue>,
}

/// Prepared-statement stand-in returned by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct MockPrepared {
    /// The statement that was prepared.
    pub statement: String,
}

/// Row stand-in returned by the mock.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockRow {
    /// Column values.
    pub values: Vec<SqlValue>,
}

/// Scripted mock database handle.
pub struct MockDbHandle {
    delay: Option<Duration>,
    rows_affected: u64,
    rows: Vec<MockRow>,
    errors: Mutex<VecDeque<DbError>>,
    row_error: Mutex<Option<DbError>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockDbHandle {
    /// Creates a mock that succeeds on every call.
    pub fn new() -> Self {
        Self {
            delay: None,
            rows_affected: 1,
            rows: Vec::new(),
            errors: Mutex::new(VecDeque::new()),
            row_error: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Sleeps for the given duration inside every operation, so logged
    /// durations have something to measure.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Sets the rows-affected count returned by successful executes.
    pub fn with_rows_affected(mut self, rows_affected: u64) -> Self {
        self.rows_affected = rows_affected;
        self
    }

    /// Sets the row set returned by successful queries.
    pub fn with_rows(mut self, rows: Vec<MockRow>) -> Self {
        self.rows = rows;
        self
    }

    /// Queues an error for the next execute/prepare/query call.
    pub fn fail_next(&self, error: DbError) {
        self.errors.lock().unwrap().push_back(error);
    }

    /// Makes the next query_row return a handle carrying a deferred error.
    pub fn defer_row_error(&self, error: DbError) {
        *self.row_error.lock().unwrap() = Some(error);
    }

    /// All calls recorded so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str, statement: &str, params: &[SqlValue]) {
        self.calls.lock().unwrap().push(RecordedCall {
            operation,
            statement: statement.to_string(),
            params: params.to_vec(),
        });
    }

    async fn sleep_if_scripted(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn next_error(&self) -> Option<DbError> {
        self.errors.lock().unwrap().pop_front()
    }
}

impl Default for MockDbHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DbHandle for MockDbHandle {
    type Prepared = MockPrepared;
    type Rows = Vec<MockRow>;
    type Row = MockRow;

    async fn execute(
        &self,
        _ctx: &RequestContext,
        statement: &str,
        params: &[SqlValue],
    ) -> DbResult<u64> {
        self.record("execute", statement, params);
        self.sleep_if_scripted().await;
        match self.next_error() {
            Some(error) => Err(error),
            None => Ok(self.rows_affected),
        }
    }

    async fn prepare(&self, _ctx: &RequestContext, statement: &str) -> DbResult<Self::Prepared> {
        self.record("prepare", statement, &[]);
        self.sleep_if_scripted().await;
        match self.next_error() {
            Some(error) => Err(error),
            None => Ok(MockPrepared {
                statement: statement.to_string(),
            }),
        }
    }

    async fn query(
        &self,
        _ctx: &RequestContext,
        statement: &str,
        params: &[SqlValue],
    ) -> DbResult<Self::Rows> {
        self.record("query", statement, params);
        self.sleep_if_scripted().await;
        match self.next_error() {
            Some(error) => Err(error),
            None => Ok(self.rows.clone()),
        }
    }

    async fn query_row(
        &self,
        _ctx: &RequestContext,
        statement: &str,
        params: &[SqlValue],
    ) -> RowHandle<Self::Row> {
        self.record("query_row", statement, params);
        self.sleep_if_scripted().await;
        match self.row_error.lock().unwrap().take() {
            Some(error) => RowHandle::err(error),
            None => RowHandle::ok(self.rows.first().cloned().unwrap_or_default()),
        }
    }
}

/// One event captured by [`CaptureLayer`].
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    /// The event's level.
    pub level: Level,
    /// The formatted message.
    pub message: String,
    /// All other fields, stringified.
    pub fields: HashMap<String, String>,
}

/// A `tracing-subscriber` layer that records every event it sees.
#[derive(Clone, Default)]
pub struct CaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CaptureLayer {
    /// Creates an empty capture layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of the events captured so far.
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Events captured at the given level.
    pub fn events_at(&self, level: Level) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.level == level)
            .collect()
    }

    /// A subscriber that feeds this layer, for use with
    /// `tracing::subscriber::with_default` or `Future::with_subscriber`.
    pub fn subscriber(&self) -> impl Subscriber + Send + Sync + 'static {
        tracing_subscriber::registry().with(self.clone())
    }

    /// Like [`CaptureLayer::subscriber`], but with events below `max` level
    /// disabled on the subscriber.
    pub fn subscriber_with_max_level(
        &self,
        max: Level,
    ) -> impl Subscriber + Send + Sync + 'static {
        let filter = tracing_subscriber::filter::LevelFilter::from_level(max);
        tracing_subscriber::registry().with(filter).with(self.clone())
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldRecorder::default();
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct FieldRecorder {
    message: String,
    fields: HashMap<String, String>,
}

impl Visit for FieldRecorder {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.insert(field.name().to_string(), value.to_string());
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields
            .insert(field.name().to_string(), value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields
            .insert(field.name().to_string(), value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields
            .insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields
                .insert(field.name().to_string(), format!("{:?}", value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_calls_in_order() {
        tokio_test::block_on(async {
            let mock = MockDbHandle::new();
            let ctx = RequestContext::background();

            mock.execute(&ctx, "A", &[]).await.unwrap();
            mock.query(&ctx, "B", &[SqlValue::from(1i64)]).await.unwrap();

            let calls = mock.calls();
            assert_eq!(calls.len(), 2);
            assert_eq!(calls[0].operation, "execute");
            assert_eq!(calls[1].operation, "query");
            assert_eq!(calls[1].params, vec![SqlValue::Int(1)]);
        });
    }

    #[test]
    fn test_mock_scripted_error_consumed_once() {
        tokio_test::block_on(async {
            let mock = MockDbHandle::new();
            let ctx = RequestContext::background();
            mock.fail_next(DbError::Query("boom".into()));

            assert!(mock.execute(&ctx, "X", &[]).await.is_err());
            assert!(mock.execute(&ctx, "X", &[]).await.is_ok());
        });
    }

    #[test]
    fn test_capture_layer_records_level_message_and_fields() {
        let capture = CaptureLayer::new();
        tracing::subscriber::with_default(capture.subscriber(), || {
            tracing::debug!(answer = 42u64, "the message");
        });

        let events = capture.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, Level::DEBUG);
        assert_eq!(events[0].message, "the message");
        assert_eq!(events[0].fields["answer"], "42");
    }

    #[test]
    fn test_capture_layer_level_filtering() {
        let capture = CaptureLayer::new();
        tracing::subscriber::with_default(
            capture.subscriber_with_max_level(Level::WARN),
            || {
                tracing::info!("suppressed");
                tracing::error!("kept");
            },
        );

        let events = capture.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "kept");
    }
}

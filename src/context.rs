//! Call context carrying cancellation scope and request-scoped log metadata.
//!
//! Every database operation takes a [`RequestContext`] explicitly. It plays
//! the role a cancellable call context plays in other stacks: request-scoped
//! logging metadata travels with it, and cancelling the operation is simply
//! dropping the in-flight future.

use tracing::Span;

/// Explicit call context for database operations.
///
/// Carries the `tracing` span the operation's log events should be scoped to,
/// plus an optional request id attached as a field on every event.
///
/// # Examples
///
/// ```
/// use sqltrace::RequestContext;
///
/// let ctx = RequestContext::new().with_request_id("req-42");
/// assert_eq!(ctx.request_id(), Some("req-42"));
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: Option<String>,
    span: Span,
}

impl RequestContext {
    /// Creates a context scoped to the current `tracing` span.
    pub fn new() -> Self {
        Self {
            request_id: None,
            span: Span::current(),
        }
    }

    /// Creates a context with no span association.
    ///
    /// Events emitted under this context are recorded at the dispatcher's
    /// root scope. Useful for startup and background work.
    pub fn background() -> Self {
        Self {
            request_id: None,
            span: Span::none(),
        }
    }

    /// Scopes the context to an explicit span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Attaches a request id, included as a field on every log event emitted
    /// under this context.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// The request id, if one was attached.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// The span this context is scoped to.
    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the logger scope bound to the given call context.
///
/// This is the explicit context-to-logger accessor: events meant to carry the
/// context's request/trace metadata are emitted inside the returned span.
pub fn logger_for(ctx: &RequestContext) -> &Span {
    ctx.span()
}

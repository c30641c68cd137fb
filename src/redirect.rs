//! Framework log redirection.
//!
//! HTTP frameworks that predate structured logging write their diagnostics
//! as raw lines into a pair of process-wide writer slots (one for ordinary
//! output, one for errors). [`RedirectSink`] is a writer that forwards each
//! such line into the structured logger at a fixed level, and
//! [`redirect_framework_logs`] installs a pair of sinks into the framework's
//! slots in one explicit call at startup.

use std::io::{self, Write};

use tracing::Level;

/// A write-sink that forwards framework log lines into `tracing` at a fixed
/// level.
///
/// Contract per write call (the framework emits one log statement per call):
/// a single trailing line terminator is stripped, the trimmed text is emitted
/// at the sink's level if that level is enabled, and the full input length is
/// always reported as consumed. Suppression by level is not an error. The
/// sink keeps no state between calls.
#[derive(Debug)]
pub struct RedirectSink {
    level: Level,
}

impl RedirectSink {
    /// Sink for the framework's ordinary output, emitting at Info.
    pub fn info() -> Self {
        Self { level: Level::INFO }
    }

    /// Sink for the framework's error output, emitting at Error.
    pub fn error() -> Self {
        Self {
            level: Level::ERROR,
        }
    }

    /// The fixed level this sink emits at.
    pub fn level(&self) -> Level {
        self.level
    }
}

/// Strips exactly one trailing `\n` or `\r\n`.
fn strip_line_terminator(text: &str) -> &str {
    match text.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => text,
    }
}

impl Write for RedirectSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        let line = strip_line_terminator(&text);

        if self.level == Level::ERROR {
            if tracing::enabled!(Level::ERROR) {
                tracing::error!("{}", line);
            }
        } else if tracing::enabled!(Level::INFO) {
            tracing::info!("{}", line);
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// The framework's logging hook slots.
///
/// Mutable references to the two writer slots the framework pushes log lines
/// into. Passing them here explicitly keeps the installation a single visible
/// call at startup instead of hidden global mutation.
pub struct FrameworkLogHooks<'a> {
    /// Slot for ordinary output.
    pub writer: &'a mut Box<dyn Write + Send>,
    /// Slot for error output.
    pub error_writer: &'a mut Box<dyn Write + Send>,
}

/// Installs redirect sinks into the framework's logging hooks.
///
/// After this call the framework's ordinary output surfaces as Info events
/// and its error output as Error events on the structured logger.
///
/// # Examples
///
/// ```
/// use sqltrace::{redirect_framework_logs, FrameworkLogHooks};
/// use std::io::Write;
///
/// // Stand-ins for the framework's global writer slots.
/// let mut writer: Box<dyn Write + Send> = Box::new(std::io::sink());
/// let mut error_writer: Box<dyn Write + Send> = Box::new(std::io::sink());
///
/// redirect_framework_logs(FrameworkLogHooks {
///     writer: &mut writer,
///     error_writer: &mut error_writer,
/// });
///
/// writer.write_all(b"listening on :8080\n").unwrap();
/// ```
pub fn redirect_framework_logs(hooks: FrameworkLogHooks<'_>) {
    *hooks.writer = Box::new(RedirectSink::info());
    *hooks.error_writer = Box::new(RedirectSink::error());
}

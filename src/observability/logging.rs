//! Logging bootstrap built on `tracing-subscriber`.

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Minimum level captured by the subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Most verbose
    Trace,
    /// Diagnostic detail (per-statement SQL events live here)
    Debug,
    /// Normal operation
    Info,
    /// Recoverable problems
    Warn,
    /// Failures only
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl From<LogLevel> for tracing::level_filters::LevelFilter {
    fn from(level: LogLevel) -> Self {
        Level::from(level).into()
    }
}

/// Output format of the subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, for development
    Pretty,
    /// Structured JSON, for production
    Json,
    /// Single-line compact
    Compact,
}

/// One-shot logging initialization, builder style.
///
/// # Examples
///
/// ```
/// use sqltrace::observability::{LogFormat, LogLevel, LoggingConfig};
///
/// let config = LoggingConfig::new()
///     .with_level(LogLevel::Debug)
///     .with_format(LogFormat::Compact);
/// assert_eq!(config.level(), LogLevel::Debug);
/// ```
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    level: LogLevel,
    format: LogFormat,
    include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            include_target: true,
        }
    }
}

impl LoggingConfig {
    /// Creates a configuration with defaults (Info, Pretty).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum captured level.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets whether the emitting module path is included in output.
    pub fn with_target(mut self, include: bool) -> Self {
        self.include_target = include;
        self
    }

    /// The configured minimum level.
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// The configured format.
    pub fn format(&self) -> LogFormat {
        self.format
    }

    /// Installs the global subscriber. Call once at startup.
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed.
    pub fn init(self) -> Result<(), Box<dyn std::error::Error>> {
        let filter = EnvFilter::from_default_env()
            .add_directive(tracing::level_filters::LevelFilter::from(self.level).into());

        match self.format {
            LogFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(
                        fmt::layer()
                            .with_ansi(true)
                            .with_target(self.include_target),
                    )
                    .try_init()?;
            }
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().json().with_target(self.include_target))
                    .try_init()?;
            }
            LogFormat::Compact => {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().compact().with_target(self.include_target))
                    .try_init()?;
            }
        }

        Ok(())
    }
}

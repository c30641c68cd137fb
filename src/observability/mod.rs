//! Observability bootstrap: structured logging initialization.
//!
//! The rest of the crate only EMITS events; this module is where an
//! application wires up the `tracing-subscriber` backend that receives them.
//!
//! ```rust,no_run
//! use sqltrace::observability::{LogFormat, LogLevel, LoggingConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! LoggingConfig::new()
//!     .with_level(LogLevel::Debug)
//!     .with_format(LogFormat::Json)
//!     .init()?;
//! # Ok(())
//! # }
//! ```

mod logging;

pub use logging::{LogFormat, LogLevel, LoggingConfig};

//! # Farmstand Telemetry
//!
//! Logging setup shared by the farmstand binaries and tests.
//!
//! Logs are emitted through `tracing`; [`init_logging`] installs a
//! `tracing-subscriber` registry with an env filter and either JSON or
//! pretty output. Field names used across crates live in [`fields`].

#![doc(html_root_url = "https://docs.rs/farmstand-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{fields, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

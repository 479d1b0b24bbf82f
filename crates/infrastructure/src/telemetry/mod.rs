//! Logging and tracing infrastructure
//!
//! Installs the process-wide `tracing` subscriber for the binaries.

mod subscriber;

pub use subscriber::{LogFormat, TelemetryConfig, TelemetryError, init_telemetry};

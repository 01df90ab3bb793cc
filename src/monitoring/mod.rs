//! Monitoring Module
//!
//! Structured logging setup on top of `tracing`.

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};

//! Observability module
//!
//! Logging setup for the `nixos-options` binary.

pub mod logging;

pub use logging::{LOG_LEVEL_ENV, LogFormat, LogSettings, init_logging};

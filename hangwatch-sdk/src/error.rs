//! Error types for the watchdog.

use thiserror::Error;

/// Errors raised while configuring or launching a watchdog.
///
/// Hang detection itself never fails: a probe that does not come back is
/// the condition being reported, not an error.
#[derive(Debug, Error)]
pub enum WatchdogError {
    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No runtime was available and a dedicated one could not be started.
    #[error("Failed to start probe runtime: {0}")]
    Runtime(String),
}

//! The alert value observed by presentation layers.

use alloc::string::String;

use crate::Severity;

/// An active hang alert.
///
/// `generation` increases with every alert the notifier raises, so two
/// alerts with identical text can still be told apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alert {
    pub severity: Severity,
    pub message: String,
    pub generation: u64,
    /// Unix timestamp in milliseconds when the alert was raised.
    pub raised_at_ms: u64,
}

impl Alert {
    pub fn new(
        severity: Severity,
        message: impl Into<String>,
        generation: u64,
        raised_at_ms: u64,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            generation,
            raised_at_ms,
        }
    }
}

/// The current alert, or `None` when nothing is being reported.
pub type AlertState = Option<Alert>;

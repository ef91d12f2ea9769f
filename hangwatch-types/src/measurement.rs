//! A single measured stall.

use core::time::Duration;

use crate::{Severity, Thresholds};

/// The result of one stalled probe.
///
/// Produced once per detected stall and classified straight away; nothing
/// in the watchdog keeps these around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HangMeasurement {
    /// Unix timestamp in milliseconds when the stall was detected.
    pub detected_at_ms: u64,
    /// How long the monitored context took (or had been blocked), in whole milliseconds.
    pub stall_ms: u64,
}

impl HangMeasurement {
    pub const fn new(detected_at_ms: u64, stall_ms: u64) -> Self {
        Self {
            detected_at_ms,
            stall_ms,
        }
    }

    /// Build a measurement stamped with the current wall-clock time.
    ///
    /// Sub-millisecond remainders are truncated.
    #[cfg(feature = "std")]
    pub fn from_elapsed(stall: Duration) -> Self {
        let stall_ms = u64::try_from(stall.as_millis()).unwrap_or(u64::MAX);
        Self::new(crate::current_timestamp_ms(), stall_ms)
    }

    pub fn stall(&self) -> Duration {
        Duration::from_millis(self.stall_ms)
    }

    pub fn severity(&self, thresholds: &Thresholds) -> Severity {
        thresholds.classify(self.stall_ms)
    }
}

//! Severity thresholds and alert message formatting.

use alloc::format;
use alloc::string::String;

use crate::Severity;

/// Default warning threshold in milliseconds.
pub const DEFAULT_WARNING_MS: u64 = 100;

/// Default critical threshold in milliseconds.
pub const DEFAULT_CRITICAL_MS: u64 = 250;

/// Thresholds that turn a stall duration into a [`Severity`].
///
/// Both bounds are exclusive: a stall of exactly `warning_ms` is not a
/// warning, and a stall of exactly `critical_ms` is still only a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Thresholds {
    /// Stalls longer than this are at least a warning.
    pub warning_ms: u64,
    /// Stalls longer than this are critical.
    pub critical_ms: u64,
}

impl Thresholds {
    /// Create thresholds from explicit bounds.
    pub const fn new(warning_ms: u64, critical_ms: u64) -> Self {
        Self {
            warning_ms,
            critical_ms,
        }
    }

    /// Classify a stall duration in whole milliseconds.
    pub fn classify(&self, stall_ms: u64) -> Severity {
        if stall_ms > self.critical_ms {
            Severity::Critical
        } else if stall_ms > self.warning_ms {
            Severity::Warning
        } else {
            Severity::None
        }
    }

    /// The alert text for a severity, or `None` when it does not alert.
    pub fn message(&self, severity: Severity) -> Option<String> {
        match severity {
            Severity::None => None,
            Severity::Warning => Some(format!("Potential App Hang (> {}ms)", self.warning_ms)),
            Severity::Critical => Some(format!("App Hang Detected (> {}ms)", self.critical_ms)),
        }
    }

    /// Classify and format in one step. Returns `None` below the warning bound.
    pub fn alert_for(&self, stall_ms: u64) -> Option<(Severity, String)> {
        let severity = self.classify(stall_ms);
        self.message(severity).map(|message| (severity, message))
    }

    /// True when the warning bound does not exceed the critical bound.
    pub fn is_ordered(&self) -> bool {
        self.warning_ms <= self.critical_ms
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(DEFAULT_WARNING_MS, DEFAULT_CRITICAL_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let t = Thresholds::default();
        assert_eq!(t.warning_ms, 100);
        assert_eq!(t.critical_ms, 250);
        assert!(t.is_ordered());
    }

    #[test]
    fn classification_boundaries() {
        let t = Thresholds::default();

        assert_eq!(t.classify(0), Severity::None);
        assert_eq!(t.classify(100), Severity::None);
        assert_eq!(t.classify(101), Severity::Warning);
        assert_eq!(t.classify(250), Severity::Warning);
        assert_eq!(t.classify(251), Severity::Critical);
        assert_eq!(t.classify(u64::MAX), Severity::Critical);
    }

    #[test]
    fn messages_embed_their_own_threshold() {
        let t = Thresholds::default();

        assert_eq!(t.message(Severity::None), None);
        assert_eq!(
            t.message(Severity::Warning).as_deref(),
            Some("Potential App Hang (> 100ms)")
        );
        assert_eq!(
            t.message(Severity::Critical).as_deref(),
            Some("App Hang Detected (> 250ms)")
        );
    }

    #[test]
    fn custom_thresholds_change_messages() {
        let t = Thresholds::new(50, 500);
        assert_eq!(
            t.message(Severity::Warning).as_deref(),
            Some("Potential App Hang (> 50ms)")
        );
        assert_eq!(t.classify(400), Severity::Warning);
    }

    #[test]
    fn alert_for_skips_healthy_stalls() {
        let t = Thresholds::default();

        assert!(t.alert_for(80).is_none());

        let (severity, message) = t.alert_for(300).unwrap();
        assert_eq!(severity, Severity::Critical);
        assert_eq!(message, "App Hang Detected (> 250ms)");
    }

    #[test]
    fn inverted_bounds_are_reported() {
        assert!(!Thresholds::new(300, 200).is_ordered());
        assert!(Thresholds::new(200, 200).is_ordered());
    }
}

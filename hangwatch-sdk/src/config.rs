//! Watchdog timing and threshold configuration.

use std::time::Duration;

use hangwatch_types::{Thresholds, DEFAULT_CRITICAL_MS, DEFAULT_WARNING_MS};
use serde::{Deserialize, Serialize};

use crate::error::WatchdogError;

/// Configuration for the watchdog.
///
/// All values are in milliseconds so the struct can be loaded from a
/// settings file or environment variables as plain integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchdogConfig {
    /// Delay between the start of consecutive probes (default: 100ms)
    pub check_interval_ms: u64,
    /// How long a probe may take before the context counts as stalled (default: 300ms)
    pub probe_timeout_ms: u64,
    /// Extra wait after a timeout to measure how long the stall actually lasts (default: 100ms)
    pub measure_grace_ms: u64,
    /// Stalls longer than this raise a warning (default: 100ms)
    pub warning_threshold_ms: u64,
    /// Stalls longer than this raise a critical alert (default: 250ms)
    pub critical_threshold_ms: u64,
    /// How long an alert stays up before clearing itself (default: 2000ms)
    pub alert_dwell_ms: u64,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            check_interval_ms: 100,
            probe_timeout_ms: 300,
            measure_grace_ms: 100,
            warning_threshold_ms: DEFAULT_WARNING_MS,
            critical_threshold_ms: DEFAULT_CRITICAL_MS,
            alert_dwell_ms: 2000,
        }
    }
}

impl WatchdogConfig {
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn measure_grace(&self) -> Duration {
        Duration::from_millis(self.measure_grace_ms)
    }

    pub fn alert_dwell(&self) -> Duration {
        Duration::from_millis(self.alert_dwell_ms)
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.warning_threshold_ms, self.critical_threshold_ms)
    }

    /// Check that every value is usable.
    ///
    /// A zero grace period is allowed and means the stall is reported at
    /// the timeout value.
    pub fn validate(&self) -> Result<(), WatchdogError> {
        if self.check_interval_ms == 0 {
            return Err(WatchdogError::InvalidConfig(
                "check_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.probe_timeout_ms == 0 {
            return Err(WatchdogError::InvalidConfig(
                "probe_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.alert_dwell_ms == 0 {
            return Err(WatchdogError::InvalidConfig(
                "alert_dwell_ms must be greater than zero".to_string(),
            ));
        }
        if !self.thresholds().is_ordered() {
            return Err(WatchdogError::InvalidConfig(format!(
                "warning_threshold_ms ({}) exceeds critical_threshold_ms ({})",
                self.warning_threshold_ms, self.critical_threshold_ms
            )));
        }
        Ok(())
    }
}

/// Convert a duration to whole milliseconds, saturating at `u64::MAX`.
pub(crate) fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = WatchdogConfig::default();
        assert_eq!(config.check_interval(), Duration::from_millis(100));
        assert_eq!(config.probe_timeout(), Duration::from_millis(300));
        assert_eq!(config.measure_grace(), Duration::from_millis(100));
        assert_eq!(config.alert_dwell(), Duration::from_secs(2));
        assert_eq!(config.thresholds(), Thresholds::new(100, 250));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = WatchdogConfig {
            probe_timeout_ms: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("probe_timeout_ms"));
    }

    #[test]
    fn zero_interval_and_dwell_are_rejected() {
        let interval = WatchdogConfig {
            check_interval_ms: 0,
            ..Default::default()
        };
        assert!(interval.validate().is_err());

        let dwell = WatchdogConfig {
            alert_dwell_ms: 0,
            ..Default::default()
        };
        assert!(dwell.validate().is_err());
    }

    #[test]
    fn zero_grace_is_allowed() {
        let config = WatchdogConfig {
            measure_grace_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let config = WatchdogConfig {
            warning_threshold_ms: 500,
            critical_threshold_ms: 250,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(WatchdogError::InvalidConfig(_))
        ));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: WatchdogConfig =
            serde_json::from_str(r#"{"probe_timeout_ms": 500}"#).unwrap();
        assert_eq!(config.probe_timeout_ms, 500);
        assert_eq!(config.check_interval_ms, 100);
        assert_eq!(config.alert_dwell_ms, 2000);
    }

    #[test]
    fn duration_ms_saturates() {
        assert_eq!(duration_ms(Duration::from_micros(1_999)), 1);
        assert_eq!(duration_ms(Duration::MAX), u64::MAX);
    }
}

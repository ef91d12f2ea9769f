//! Stall severity levels.

use core::fmt;

/// Classification of a measured stall.
///
/// Ordered so that `None < Warning < Critical`, which lets callers take the
/// worst of several severities with `max()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    /// The stall stayed at or under the warning threshold.
    #[default]
    None,
    /// Above the warning threshold, at or under the critical one.
    Warning,
    /// Above the critical threshold.
    Critical,
}

impl Severity {
    /// Lowercase name, as used in logs and serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }

    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::None => "OK",
            Severity::Warning => "WARN",
            Severity::Critical => "CRIT",
        }
    }

    /// Whether this severity should raise an alert.
    pub fn is_alert(&self) -> bool {
        !matches!(self, Severity::None)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! # hangwatch-types
//!
//! Core types for detecting stalls of a single monitored execution context
//! (usually a UI or main thread). This crate holds the plain data model that
//! the watchdog produces and that presentation layers consume.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Works without any serialization framework
//! - **Optional serialization**: Enable the `serde` feature to serialize alerts
//! - **No runtime coupling**: Nothing here spawns, sleeps or locks
//!
//! ## Features
//!
//! - `std` (default): Standard library support (wall-clock timestamps)
//! - `serde`: Serialization via serde
//!
//! ## Example
//!
//! ```rust
//! use hangwatch_types::{Severity, Thresholds};
//!
//! let thresholds = Thresholds::default();
//!
//! assert_eq!(thresholds.classify(100), Severity::None);
//! assert_eq!(thresholds.classify(101), Severity::Warning);
//! assert_eq!(thresholds.classify(251), Severity::Critical);
//!
//! assert_eq!(
//!     thresholds.message(Severity::Critical).as_deref(),
//!     Some("App Hang Detected (> 250ms)")
//! );
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod alert;
mod measurement;
mod severity;
mod thresholds;

pub use alert::*;
pub use measurement::*;
pub use severity::*;
pub use thresholds::*;

/// Milliseconds since the Unix epoch, or 0 if the clock is before it.
#[cfg(feature = "std")]
pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

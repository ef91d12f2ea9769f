//! # hangwatch-sdk
//!
//! A responsiveness watchdog for a single execution context, typically a
//! UI or main thread.
//!
//! The watchdog periodically schedules a no-op task onto the monitored
//! context and waits for it with a deadline. If the task cannot run in
//! time the context is stalled: the stall is measured, classified as a
//! warning or critical hang, and published as an alert that clears itself
//! after a fixed dwell time.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hangwatch_sdk::{EventLoop, Watchdog};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Any type implementing `MonitoredContext` works; `EventLoop` is a
//!     // simple single-threaded task queue.
//!     let (handle, event_loop) = EventLoop::new();
//!     event_loop.spawn("main-loop").unwrap();
//!
//!     let watchdog = Watchdog::new(handle);
//!     let mut alerts = watchdog.subscribe();
//!
//!     // Start probing (non-blocking)
//!     watchdog.start();
//!
//!     // Render whenever the alert changes
//!     while alerts.changed().await.is_ok() {
//!         match &*alerts.borrow() {
//!             Some(alert) => println!("[{}] {}", alert.severity.symbol(), alert.message),
//!             None => println!("responsive"),
//!         }
//!     }
//! }
//! ```
//!
//! ## Features
//!
//! - **Bounded probes**: every wait has a deadline, so a dead context is
//!   reported as a stall instead of hanging the watchdog
//! - **Self-expiring alerts**: a stale expiry never clears a newer alert
//! - **Thread-safe control**: start, stop and observe from any thread
//! - **Runtime agnostic start**: uses the ambient tokio runtime when there
//!   is one, a dedicated thread otherwise

mod config;
mod context;
mod error;
mod notifier;
mod probe;
mod runtime;
mod watchdog;

pub use config::WatchdogConfig;
pub use context::{EventLoop, LoopHandle, MonitoredContext, Task};
pub use error::WatchdogError;
pub use notifier::Notifier;
pub use probe::{probe, ProbeOutcome};
pub use watchdog::{MonitorStatus, Watchdog, WatchdogBuilder};

// Re-export types for convenience
pub use hangwatch_types::{Alert, AlertState, HangMeasurement, Severity, Thresholds};

//! # hangwatch
//!
//! A command-line harness and library around [`hangwatch_sdk`]: it runs a
//! simulated UI loop, injects stalls into it, and prints the watchdog's
//! alert every time it changes.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Application                         │
//! │  ┌──────────┐   ┌────────────┐   ┌──────────┐   ┌─────────┐  │
//! │  │ settings │──▶│  watchdog  │──▶│ observer │──▶│ stdout  │  │
//! │  │ (config) │   │  (sdk)     │   │ (render) │   │         │  │
//! │  └──────────┘   └─────┬──────┘   └──────────┘   └─────────┘  │
//! │                       │ probes                               │
//! │                       ▼                                      │
//! │                ┌─────────────┐                               │
//! │                │ event loop  │◀── injected stalls (app)      │
//! │                └─────────────┘                               │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: wires the loop, the watchdog, the stall injector and the printer
//! - **[`settings`]**: defaults, TOML file, `HANGWATCH_*` env vars and CLI overrides
//! - **[`observer`]**: renders each alert change as a text banner or JSON line
//! - **[`duration`]**: parsing of flags like `150ms` or `2s`
//!
//! ## Usage
//!
//! ```bash
//! # Inject a 150ms and a 400ms stall alternately, once per second
//! hangwatch --stall 150ms --stall 400ms --every 1s
//!
//! # Tighter thresholds, JSON output, stop after 10 seconds
//! hangwatch --warn 50ms --crit 150ms --stall 200ms --format json --run-for 10s
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use std::time::Duration;
//! use hangwatch::app::{App, Scenario};
//! use hangwatch::observer::OutputFormat;
//! use hangwatch_sdk::WatchdogConfig;
//!
//! # tokio_test::block_on(async {
//! let scenario = Scenario {
//!     stalls: vec![Duration::from_millis(400)],
//!     every: Duration::from_secs(1),
//! };
//! let app = App::new(
//!     WatchdogConfig::default(),
//!     scenario,
//!     OutputFormat::Text,
//!     Some(Duration::from_secs(5)),
//! );
//! app.run().await.unwrap();
//! # });
//! ```

pub mod app;
pub mod duration;
pub mod observer;
pub mod settings;

pub use app::{App, Scenario};
pub use observer::OutputFormat;

//! Layered watchdog settings.
//!
//! Precedence, lowest first: built-in defaults, an optional TOML file,
//! `HANGWATCH_*` environment variables, then command-line flags.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use config::{Config, Environment, File, FileFormat};
use hangwatch_sdk::WatchdogConfig;

use crate::duration::{as_millis, parse_duration};

/// Environment variable prefix, e.g. `HANGWATCH_PROBE_TIMEOUT_MS=500`.
pub const ENV_PREFIX: &str = "HANGWATCH";

/// Load settings from defaults, `path` (if any) and the environment.
pub fn load(path: Option<&Path>) -> Result<WatchdogConfig> {
    let mut builder = Config::builder().add_source(
        Config::try_from(&WatchdogConfig::default()).context("failed to encode default settings")?,
    );

    if let Some(path) = path {
        builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
    }

    let config = builder
        .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()
        .with_context(|| match path {
            Some(p) => format!("failed to load settings from {}", p.display()),
            None => "failed to load settings".to_string(),
        })?;

    config
        .try_deserialize()
        .context("settings do not describe a valid watchdog configuration")
}

/// Command-line overrides for individual settings.
#[derive(Args, Debug, Default, Clone)]
pub struct Overrides {
    /// Delay between probes (e.g. "100ms")
    #[arg(long)]
    pub interval: Option<String>,

    /// Probe timeout before the loop counts as stalled (e.g. "300ms")
    #[arg(long)]
    pub timeout: Option<String>,

    /// Extra wait used to measure a stall after it is detected (e.g. "100ms")
    #[arg(long)]
    pub grace: Option<String>,

    /// Warning threshold (e.g. "100ms")
    #[arg(long)]
    pub warn: Option<String>,

    /// Critical threshold (e.g. "250ms")
    #[arg(long)]
    pub crit: Option<String>,

    /// How long an alert stays up (e.g. "2s")
    #[arg(long)]
    pub dwell: Option<String>,
}

impl Overrides {
    /// Apply every flag that was given, then validate the result.
    pub fn apply(&self, config: &mut WatchdogConfig) -> Result<()> {
        let fields = [
            (&self.interval, &mut config.check_interval_ms, "--interval"),
            (&self.timeout, &mut config.probe_timeout_ms, "--timeout"),
            (&self.grace, &mut config.measure_grace_ms, "--grace"),
            (&self.warn, &mut config.warning_threshold_ms, "--warn"),
            (&self.crit, &mut config.critical_threshold_ms, "--crit"),
            (&self.dwell, &mut config.alert_dwell_ms, "--dwell"),
        ];

        for (flag_value, field, flag) in fields {
            if let Some(raw) = flag_value {
                let d = parse_duration(raw).with_context(|| format!("invalid {}", flag))?;
                *field = as_millis(d);
            }
        }

        config.validate()?;
        Ok(())
    }
}

//! Demo application: a simulated UI loop watched by the watchdog.

use std::io;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use hangwatch_sdk::{EventLoop, LoopHandle, Watchdog, WatchdogConfig};
use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::{debug, info};

use crate::duration::{as_millis, format_duration};
use crate::observer::{self, OutputFormat};

/// Stalls to inject into the monitored loop.
#[derive(Debug, Clone, Default)]
pub struct Scenario {
    /// Stall lengths, injected round-robin.
    pub stalls: Vec<Duration>,
    /// Time between injections.
    pub every: Duration,
}

/// Application state for one run.
#[derive(Debug)]
pub struct App {
    config: WatchdogConfig,
    scenario: Scenario,
    format: OutputFormat,
    run_for: Option<Duration>,
}

impl App {
    pub fn new(
        config: WatchdogConfig,
        scenario: Scenario,
        format: OutputFormat,
        run_for: Option<Duration>,
    ) -> Self {
        Self {
            config,
            scenario,
            format,
            run_for,
        }
    }

    /// Run until `run_for` elapses or Ctrl-C is pressed.
    pub async fn run(self) -> Result<()> {
        let (handle, event_loop) = EventLoop::new();
        let loop_thread = event_loop
            .spawn("monitored-loop")
            .context("failed to start monitored loop")?;

        let watchdog = Watchdog::builder()
            .config(self.config)
            .build(handle.clone())?;

        let printer = tokio::spawn(observer::watch_alerts(
            watchdog.subscribe(),
            self.format,
            io::stdout(),
        ));

        info!(
            interval = %format_duration(self.config.check_interval()),
            timeout = %format_duration(self.config.probe_timeout()),
            warning_ms = self.config.warning_threshold_ms,
            critical_ms = self.config.critical_threshold_ms,
            "watching monitored loop"
        );
        watchdog.start();

        let injector = tokio::spawn(inject_stalls(handle.clone(), self.scenario));

        match self.run_for {
            Some(limit) => {
                tokio::select! {
                    _ = tokio::time::sleep(limit) => debug!("run time elapsed"),
                    _ = tokio::signal::ctrl_c() => info!("interrupted"),
                }
            }
            None => tokio::signal::ctrl_c()
                .await
                .context("failed to listen for Ctrl-C")?,
        }

        injector.abort();
        watchdog.stop();
        drop(watchdog);

        // The printer ends once the notifier is dropped; don't wait on a
        // stalled loop to get there.
        match timeout(Duration::from_secs(1), printer).await {
            Ok(joined) => {
                let lines = joined.context("alert printer panicked")??;
                debug!(lines, "alert printer finished");
            }
            Err(_) => debug!("alert printer still running at shutdown"),
        }

        handle.quit();
        drop(handle);
        let tasks = tokio::task::spawn_blocking(move || loop_thread.join())
            .await
            .context("failed to join monitored loop")?
            .map_err(|_| anyhow::anyhow!("monitored loop panicked"))?;
        debug!(tasks, "monitored loop finished");

        Ok(())
    }
}

/// Block the loop with each scenario stall in turn, forever.
async fn inject_stalls(handle: LoopHandle, scenario: Scenario) {
    if scenario.stalls.is_empty() || scenario.every.is_zero() {
        return;
    }

    let mut ticker = interval(scenario.every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    for stall in scenario.stalls.iter().copied().cycle() {
        ticker.tick().await;
        info!(stall_ms = as_millis(stall), "injecting stall");
        if !handle.execute(move || thread::sleep(stall)) {
            break;
        }
    }
}

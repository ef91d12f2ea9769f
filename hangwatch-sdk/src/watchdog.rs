//! The Watchdog: periodic probing, classification and alerting.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use hangwatch_types::{AlertState, HangMeasurement, Severity, Thresholds};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, error, warn};

use crate::config::{duration_ms, WatchdogConfig};
use crate::context::MonitoredContext;
use crate::error::WatchdogError;
use crate::notifier::Notifier;
use crate::probe::{probe, ProbeOutcome};
use crate::runtime::spawn_detached;

/// Whether the watchdog is probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorStatus {
    #[default]
    Idle,
    Running,
}

/// Watches a single execution context for stalls.
///
/// While running, the watchdog probes the context on a fixed cadence. A
/// probe that does not come back within the timeout is measured, classified
/// against the thresholds and, for warnings and critical stalls, shown as an
/// alert that clears itself after the dwell time.
///
/// `start()` and `stop()` can be called from any thread, any number of
/// times. The watchdog is restartable.
///
/// # Example
///
/// ```rust,no_run
/// use hangwatch_sdk::{EventLoop, Watchdog};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let (handle, event_loop) = EventLoop::new();
///     event_loop.spawn("ui").unwrap();
///
///     let watchdog = Watchdog::new(handle.clone());
///     let mut alerts = watchdog.subscribe();
///     watchdog.start();
///
///     // Block the loop long enough to be noticed.
///     handle.execute(|| std::thread::sleep(Duration::from_millis(500)));
///
///     alerts.changed().await.unwrap();
///     println!("{:?}", *alerts.borrow());
///
///     watchdog.stop();
/// }
/// ```
pub struct Watchdog {
    shared: Arc<Shared>,
    runtime: Option<Handle>,
}

struct Shared {
    context: Arc<dyn MonitoredContext>,
    notifier: Notifier,
    config: WatchdogConfig,
    control: Mutex<Control>,
}

#[derive(Default)]
struct Control {
    status: MonitorStatus,
    /// Incremented on every start; a loop only reports for its own session.
    session: u64,
    stop_tx: Option<watch::Sender<bool>>,
}

impl Watchdog {
    /// Create a watchdog with the default configuration.
    pub fn new<C: MonitoredContext>(context: C) -> Self {
        Self::from_parts(Arc::new(context), WatchdogConfig::default(), None)
    }

    /// Create a builder for configuring the watchdog.
    pub fn builder() -> WatchdogBuilder {
        WatchdogBuilder::new()
    }

    fn from_parts(
        context: Arc<dyn MonitoredContext>,
        config: WatchdogConfig,
        runtime: Option<Handle>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                context,
                notifier: Notifier::build(
                    config.alert_dwell(),
                    runtime.clone().or_else(|| Handle::try_current().ok()),
                ),
                config,
                control: Mutex::new(Control::default()),
            }),
            runtime,
        }
    }

    /// Start probing. Does nothing if already running.
    ///
    /// The probe loop runs on the runtime given to the builder, else on the
    /// runtime this is called from, else on a dedicated `hangwatch-probe`
    /// thread. The first probe is sent right away.
    pub fn start(&self) {
        let mut control = self.shared.control.lock();
        if control.status == MonitorStatus::Running {
            return;
        }

        let session = control.session + 1;
        let (stop_tx, stop_rx) = watch::channel(false);
        let task = run_probe_loop(self.shared.clone(), session, stop_rx);

        match spawn_detached("hangwatch-probe", self.runtime.as_ref(), task) {
            Ok(()) => {
                control.session = session;
                control.status = MonitorStatus::Running;
                control.stop_tx = Some(stop_tx);
                debug!(session, "hang monitoring started");
            }
            Err(e) => error!(error = %e, "failed to start hang monitoring"),
        }
    }

    /// Stop probing and clear the current alert.
    ///
    /// Safe to call when already stopped. The alert is gone by the time
    /// this returns; the loop itself winds down at its next await point.
    pub fn stop(&self) {
        let mut control = self.shared.control.lock();
        if let Some(stop_tx) = control.stop_tx.take() {
            let _ = stop_tx.send(true);
            debug!(session = control.session, "hang monitoring stopped");
        }
        control.status = MonitorStatus::Idle;
        self.shared.notifier.clear();
    }

    pub fn is_monitoring(&self) -> bool {
        self.status() == MonitorStatus::Running
    }

    pub fn status(&self) -> MonitorStatus {
        self.shared.control.lock().status
    }

    /// Classify a stall duration and update the alert accordingly.
    ///
    /// Warnings and critical stalls replace the current alert. A duration
    /// at or under the warning threshold clears any alert still showing.
    /// Works whether or not the watchdog is running.
    ///
    /// Serialized with [`stop`](Watchdog::stop): a report racing a stop
    /// lands either before it (and is cleared) or after it returns.
    pub fn report(&self, stall: Duration) -> Severity {
        let _control = self.shared.control.lock();
        let thresholds = self.shared.config.thresholds();
        let stall_ms = duration_ms(stall);

        match thresholds.alert_for(stall_ms) {
            Some((severity, message)) => {
                warn!(stall_ms, severity = %severity, "{}", message);
                self.shared.notifier.show(severity, message);
                severity
            }
            None => {
                self.shared.notifier.clear();
                Severity::None
            }
        }
    }

    /// Subscribe to alert changes.
    pub fn subscribe(&self) -> watch::Receiver<AlertState> {
        self.shared.notifier.subscribe()
    }

    /// The alert being shown right now, if any.
    pub fn current_alert(&self) -> AlertState {
        self.shared.notifier.current()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.shared.notifier
    }

    pub fn config(&self) -> &WatchdogConfig {
        &self.shared.config
    }

    pub fn thresholds(&self) -> Thresholds {
        self.shared.config.thresholds()
    }
}

impl Drop for Watchdog {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for Watchdog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watchdog")
            .field("status", &self.status())
            .field("config", &self.shared.config)
            .finish()
    }
}

impl Shared {
    /// Surface a stall from the probe loop of `session`.
    ///
    /// Holding the control lock keeps this atomic with respect to `stop()`:
    /// a loop that has been stopped cannot raise an alert afterwards.
    fn report_stall(&self, session: u64, measurement: HangMeasurement) {
        let control = self.control.lock();
        if control.status != MonitorStatus::Running || control.session != session {
            debug!(session, "dropping stall report from stopped probe loop");
            return;
        }

        let thresholds = self.config.thresholds();
        let severity = measurement.severity(&thresholds);
        match thresholds.message(severity) {
            Some(message) => {
                warn!(
                    stall_ms = measurement.stall_ms,
                    detected_at_ms = measurement.detected_at_ms,
                    severity = %severity,
                    "{}",
                    message
                );
                self.notifier.show(severity, message);
            }
            None => debug!(stall_ms = measurement.stall_ms, "stall under warning threshold"),
        }
    }
}

async fn run_probe_loop(shared: Arc<Shared>, session: u64, mut stop_rx: watch::Receiver<bool>) {
    let config = shared.config;
    let mut ticker = interval(config.check_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = stop_rx.changed() => break,
            outcome = next_probe(&mut ticker, shared.context.as_ref(), &config) => {
                if let ProbeOutcome::Stalled(measurement) = outcome {
                    shared.report_stall(session, measurement);
                }
            }
        }
    }

    debug!(session, "probe loop exited");
}

async fn next_probe(
    ticker: &mut Interval,
    context: &dyn MonitoredContext,
    config: &WatchdogConfig,
) -> ProbeOutcome {
    ticker.tick().await;
    probe(context, config.probe_timeout(), config.measure_grace()).await
}

/// Builder for configuring a Watchdog.
#[derive(Debug, Default)]
pub struct WatchdogBuilder {
    config: WatchdogConfig,
    runtime: Option<Handle>,
}

impl WatchdogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: WatchdogConfig) -> Self {
        self.config = config;
        self
    }

    /// Delay between probes. Defaults to 100ms.
    pub fn check_interval(mut self, d: Duration) -> Self {
        self.config.check_interval_ms = duration_ms(d);
        self
    }

    /// How long a probe may take before counting as a stall. Defaults to 300ms.
    pub fn probe_timeout(mut self, d: Duration) -> Self {
        self.config.probe_timeout_ms = duration_ms(d);
        self
    }

    /// Extra wait used to measure a stall after it is detected. Defaults to 100ms.
    pub fn measure_grace(mut self, d: Duration) -> Self {
        self.config.measure_grace_ms = duration_ms(d);
        self
    }

    pub fn thresholds(mut self, thresholds: Thresholds) -> Self {
        self.config.warning_threshold_ms = thresholds.warning_ms;
        self.config.critical_threshold_ms = thresholds.critical_ms;
        self
    }

    /// How long alerts stay up. Defaults to 2 seconds.
    pub fn alert_dwell(mut self, d: Duration) -> Self {
        self.config.alert_dwell_ms = duration_ms(d);
        self
    }

    /// Run the probe loop on this runtime regardless of where `start()` is called.
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Build the watchdog, validating the configuration.
    pub fn build<C: MonitoredContext>(self, context: C) -> Result<Watchdog, WatchdogError> {
        self.config.validate()?;
        Ok(Watchdog::from_parts(
            Arc::new(context),
            self.config,
            self.runtime,
        ))
    }
}

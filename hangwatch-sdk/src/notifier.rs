//! Ownership of the current alert and its automatic expiry.

use std::sync::{Arc, Weak};
use std::thread;
use std::time::Duration;

use hangwatch_types::{current_timestamp_ms, Alert, AlertState, Severity};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Holds the single current alert and clears it after a dwell time.
///
/// Every [`show`](Notifier::show) stamps the alert with a new generation
/// and arms a timer for that generation only. When a timer fires it clears
/// the alert only if nothing newer has been shown (or cleared) since, so an
/// old warning's timer can never take down a fresh critical alert.
///
/// The alert is published through a [`watch`] channel: readers on any
/// thread see whole values and can await changes.
///
/// Expiry timers run on the tokio runtime captured when the notifier is
/// created. Without one, each timer gets a short-lived OS thread.
///
/// # Example
///
/// ```rust
/// use hangwatch_sdk::{Notifier, Severity};
/// use std::time::Duration;
///
/// let notifier = Notifier::new(Duration::from_secs(2));
/// notifier.show(Severity::Warning, "Potential App Hang (> 100ms)");
///
/// let alert = notifier.current().unwrap();
/// assert_eq!(alert.severity, Severity::Warning);
///
/// notifier.clear();
/// assert!(notifier.current().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Notifier {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    generation: Mutex<u64>,
    sender: watch::Sender<AlertState>,
    dwell: Duration,
    runtime: Option<Handle>,
}

impl Inner {
    fn expire(&self, token: u64) -> bool {
        let generation = self.generation.lock();
        if *generation != token {
            debug!(token, current = *generation, "alert superseded, skipping expiry");
            return false;
        }
        self.sender.send_if_modified(take_alert)
    }
}

fn take_alert(state: &mut AlertState) -> bool {
    state.take().is_some()
}

impl Notifier {
    /// Create a notifier whose alerts clear themselves after `dwell`.
    ///
    /// Expiry timers go to the runtime this is called from, if any.
    pub fn new(dwell: Duration) -> Self {
        Self::build(dwell, Handle::try_current().ok())
    }

    /// Create a notifier whose expiry timers run on `runtime`.
    pub fn with_runtime(dwell: Duration, runtime: Handle) -> Self {
        Self::build(dwell, Some(runtime))
    }

    pub(crate) fn build(dwell: Duration, runtime: Option<Handle>) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                generation: Mutex::new(0),
                sender,
                dwell,
                runtime,
            }),
        }
    }

    /// Replace the current alert and arm its expiry.
    ///
    /// Returns the generation token assigned to this alert.
    pub fn show(&self, severity: Severity, message: impl Into<String>) -> u64 {
        let token = {
            let mut generation = self.inner.generation.lock();
            *generation += 1;
            let alert = Alert::new(severity, message, *generation, current_timestamp_ms());
            self.inner.sender.send_replace(Some(alert));
            *generation
        };
        self.arm_expiry(token);
        token
    }

    /// Remove the current alert and invalidate any pending expiry.
    pub fn clear(&self) {
        let mut generation = self.inner.generation.lock();
        *generation += 1;
        self.inner.sender.send_if_modified(take_alert);
    }

    /// The alert being shown right now, if any.
    pub fn current(&self) -> AlertState {
        self.inner.sender.borrow().clone()
    }

    /// Subscribe to alert changes.
    ///
    /// The receiver starts at the current value; `changed()` resolves on
    /// every show and on every clear that removes an alert.
    pub fn subscribe(&self) -> watch::Receiver<AlertState> {
        self.inner.sender.subscribe()
    }

    /// The most recently issued generation token.
    pub fn generation(&self) -> u64 {
        *self.inner.generation.lock()
    }

    pub fn dwell(&self) -> Duration {
        self.inner.dwell
    }

    fn arm_expiry(&self, token: u64) {
        let inner: Weak<Inner> = Arc::downgrade(&self.inner);
        let dwell = self.inner.dwell;

        if let Some(handle) = &self.inner.runtime {
            handle.spawn(async move {
                tokio::time::sleep(dwell).await;
                if let Some(inner) = inner.upgrade() {
                    inner.expire(token);
                }
            });
            return;
        }

        let spawned = thread::Builder::new()
            .name("hangwatch-expiry".to_string())
            .spawn(move || {
                thread::sleep(dwell);
                if let Some(inner) = inner.upgrade() {
                    inner.expire(token);
                }
            });
        if let Err(e) = spawned {
            warn!(error = %e, token, "could not arm alert expiry");
        }
    }
}

//! Round-trip liveness probe.
//!
//! A probe enqueues a no-op task onto the monitored context and waits, with
//! a deadline, for it to run. If the context cannot run even that within
//! the timeout it is stalled. The probe then keeps listening to the same
//! task for a short grace window so the stall can be measured at the
//! moment the context recovers, rather than reported at the timeout value.

use std::time::{Duration, Instant};

use hangwatch_types::{current_timestamp_ms, HangMeasurement};
use tokio::sync::oneshot;
use tokio::time::timeout;

use crate::config::duration_ms;
use crate::context::MonitoredContext;

/// What one probe observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The probe ran within the timeout.
    Responsive {
        /// Time from scheduling the probe to it running.
        round_trip: Duration,
    },
    /// The probe did not run within the timeout.
    Stalled(HangMeasurement),
}

impl ProbeOutcome {
    pub fn is_stalled(&self) -> bool {
        matches!(self, ProbeOutcome::Stalled(_))
    }
}

/// Probe `context` once.
///
/// Every wait is bounded: the call returns after at most
/// `timeout + grace`. A context that refuses the task, or drops it
/// without running it, is reported as stalled for that full budget.
pub async fn probe<C>(context: &C, probe_timeout: Duration, grace: Duration) -> ProbeOutcome
where
    C: MonitoredContext + ?Sized,
{
    let (tx, mut rx) = oneshot::channel::<Instant>();
    let scheduled_at = Instant::now();

    let accepted = context.schedule(Box::new(move || {
        let _ = tx.send(Instant::now());
    }));
    if !accepted {
        return wait_out_budget(scheduled_at, probe_timeout + grace).await;
    }

    match timeout(probe_timeout, &mut rx).await {
        Ok(Ok(ran_at)) => {
            return ProbeOutcome::Responsive {
                round_trip: ran_at.saturating_duration_since(scheduled_at),
            };
        }
        Ok(Err(_)) => return wait_out_budget(scheduled_at, probe_timeout + grace).await,
        Err(_) => {}
    }

    let detected_at_ms = current_timestamp_ms();
    let stall = match timeout(grace, &mut rx).await {
        Ok(Ok(ran_at)) => ran_at.saturating_duration_since(scheduled_at),
        _ => scheduled_at.elapsed(),
    };

    ProbeOutcome::Stalled(HangMeasurement::new(detected_at_ms, duration_ms(stall)))
}

async fn wait_out_budget(scheduled_at: Instant, budget: Duration) -> ProbeOutcome {
    let deadline = scheduled_at + budget;
    tokio::time::sleep(deadline.saturating_duration_since(Instant::now())).await;
    ProbeOutcome::Stalled(HangMeasurement::from_elapsed(scheduled_at.elapsed()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{EventLoop, Task};
    use std::thread;

    struct Blackhole;

    impl MonitoredContext for Blackhole {
        fn schedule(&self, task: Task) -> bool {
            drop(task);
            true
        }
    }

    #[tokio::test]
    async fn responsive_loop_answers_quickly() {
        let (handle, event_loop) = EventLoop::new();
        let thread = event_loop.spawn("probe-ui").unwrap();

        let outcome = probe(&handle, Duration::from_millis(300), Duration::from_millis(100)).await;
        match outcome {
            ProbeOutcome::Responsive { round_trip } => {
                assert!(round_trip < Duration::from_millis(300))
            }
            other => panic!("expected responsive, got {:?}", other),
        }

        handle.quit();
        thread.join().unwrap();
    }

    #[tokio::test]
    async fn blocked_loop_is_reported_as_stalled() {
        let (handle, event_loop) = EventLoop::new();
        let thread = event_loop.spawn("probe-ui").unwrap();

        handle.execute(|| thread::sleep(Duration::from_millis(600)));
        let outcome = probe(&handle, Duration::from_millis(100), Duration::from_millis(50)).await;

        match outcome {
            ProbeOutcome::Stalled(m) => {
                assert!(m.stall_ms >= 100, "stall_ms = {}", m.stall_ms);
                assert!(m.detected_at_ms > 0);
            }
            other => panic!("expected stall, got {:?}", other),
        }

        handle.quit();
        thread.join().unwrap();
    }

    #[tokio::test]
    async fn stall_ending_in_grace_window_is_measured_at_recovery() {
        let (handle, event_loop) = EventLoop::new();
        let thread = event_loop.spawn("probe-ui").unwrap();

        handle.execute(|| thread::sleep(Duration::from_millis(400)));
        let outcome = probe(&handle, Duration::from_millis(200), Duration::from_millis(500)).await;

        // Recovery at ~400ms, well before the 700ms budget runs out.
        match outcome {
            ProbeOutcome::Stalled(m) => {
                assert!(m.stall_ms >= 350, "stall_ms = {}", m.stall_ms);
                assert!(m.stall_ms < 650, "stall_ms = {}", m.stall_ms);
            }
            other => panic!("expected stall, got {:?}", other),
        }

        handle.quit();
        thread.join().unwrap();
    }

    #[tokio::test]
    async fn vanished_context_counts_as_full_stall() {
        let (handle, event_loop) = EventLoop::new();
        drop(event_loop);

        let started = Instant::now();
        let outcome = probe(&handle, Duration::from_millis(60), Duration::from_millis(20)).await;

        assert!(outcome.is_stalled());
        assert!(started.elapsed() >= Duration::from_millis(80));
        if let ProbeOutcome::Stalled(m) = outcome {
            assert!(m.stall_ms >= 80);
        }
    }

    #[tokio::test]
    async fn dropped_probe_task_counts_as_full_stall() {
        let outcome = probe(&Blackhole, Duration::from_millis(40), Duration::from_millis(10)).await;

        match outcome {
            ProbeOutcome::Stalled(m) => assert!(m.stall_ms >= 50),
            other => panic!("expected stall, got {:?}", other),
        }
    }
}

//! The execution context being watched.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tokio::sync::mpsc;

/// A unit of work scheduled onto a monitored context.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// An execution context the watchdog can probe.
///
/// Implement this for whatever drives your UI or main thread: the
/// watchdog only needs a way to enqueue a task that will run there.
pub trait MonitoredContext: Send + Sync + 'static {
    /// Enqueue `task` to run on the context.
    ///
    /// Returns `false` if the context is gone and the task was dropped.
    /// A context that accepts the task and never runs it is simply stalled.
    fn schedule(&self, task: Task) -> bool;
}

impl<T: MonitoredContext + ?Sized> MonitoredContext for Arc<T> {
    fn schedule(&self, task: Task) -> bool {
        (**self).schedule(task)
    }
}

enum Message {
    Run(Task),
    Quit,
}

/// A cooperative single-threaded task loop.
///
/// Stands in for a UI event loop: tasks run one at a time in the order
/// they were queued, so anything slow blocks every task behind it.
///
/// # Example
///
/// ```rust
/// use hangwatch_sdk::EventLoop;
///
/// let (handle, event_loop) = EventLoop::new();
/// let thread = event_loop.spawn("main-loop").unwrap();
///
/// handle.execute(|| println!("running on the loop"));
/// handle.quit();
///
/// assert_eq!(thread.join().unwrap(), 1);
/// ```
#[derive(Debug)]
pub struct EventLoop {
    receiver: mpsc::UnboundedReceiver<Message>,
}

impl EventLoop {
    /// Create a loop and the handle used to feed it.
    pub fn new() -> (LoopHandle, EventLoop) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (LoopHandle { sender }, EventLoop { receiver })
    }

    /// Run tasks on the calling thread until every handle is dropped or
    /// [`LoopHandle::quit`] is called. Returns the number of tasks run.
    ///
    /// Blocks the thread, so do not call it from inside an async runtime.
    pub fn run(mut self) -> usize {
        let mut ran = 0;
        while let Some(message) = self.receiver.blocking_recv() {
            match message {
                Message::Run(task) => {
                    task();
                    ran += 1;
                }
                Message::Quit => break,
            }
        }
        ran
    }

    /// Run whatever is queued right now without waiting for more.
    ///
    /// Useful when the loop is pumped from an existing frame callback.
    /// Returns the number of tasks run; a quit request stops the drain.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(message) = self.receiver.try_recv() {
            match message {
                Message::Run(task) => {
                    task();
                    ran += 1;
                }
                Message::Quit => {
                    self.receiver.close();
                    break;
                }
            }
        }
        ran
    }

    /// Run the loop on a new named OS thread.
    pub fn spawn(self, name: &str) -> io::Result<JoinHandle<usize>> {
        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || self.run())
    }
}

/// A handle for queueing work onto an [`EventLoop`].
///
/// Cheap to clone; the loop keeps running while any handle is alive.
#[derive(Debug, Clone)]
pub struct LoopHandle {
    sender: mpsc::UnboundedSender<Message>,
}

impl LoopHandle {
    /// Queue a closure to run on the loop. Returns `false` if the loop is gone.
    pub fn execute<F>(&self, f: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.sender.send(Message::Run(Box::new(f))).is_ok()
    }

    /// Ask the loop to stop after the tasks queued before this call.
    pub fn quit(&self) {
        let _ = self.sender.send(Message::Quit);
    }

    /// Whether the loop has stopped accepting work.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl MonitoredContext for LoopHandle {
    fn schedule(&self, task: Task) -> bool {
        self.sender.send(Message::Run(task)).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn tasks_run_in_order_on_the_loop_thread() {
        let (handle, event_loop) = EventLoop::new();
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));

        for i in 0..5 {
            let seen = seen.clone();
            handle.execute(move || {
                let name = thread::current().name().map(str::to_string);
                seen.lock().push((i, name));
            });
        }
        handle.quit();

        let thread = event_loop.spawn("ui").unwrap();
        assert_eq!(thread.join().unwrap(), 5);

        let seen = seen.lock();
        let order: Vec<_> = seen.iter().map(|(i, _)| *i).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
        assert!(seen.iter().all(|(_, name)| name.as_deref() == Some("ui")));
    }

    #[test]
    fn loop_ends_when_all_handles_drop() {
        let (handle, event_loop) = EventLoop::new();
        handle.execute(|| {});
        drop(handle);
        assert_eq!(event_loop.run(), 1);
    }

    #[test]
    fn schedule_fails_once_loop_is_gone() {
        let (handle, event_loop) = EventLoop::new();
        drop(event_loop);

        assert!(handle.is_closed());
        assert!(!handle.schedule(Box::new(|| {})));
        assert!(!handle.execute(|| {}));
    }

    #[test]
    fn run_pending_drains_without_blocking() {
        let (handle, mut event_loop) = EventLoop::new();
        let count = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let count = count.clone();
            handle.execute(move || {
                count.fetch_add(1, Ordering::Relaxed);
            });
        }

        assert_eq!(event_loop.run_pending(), 3);
        assert_eq!(event_loop.run_pending(), 0);
        assert_eq!(count.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn quit_in_run_pending_closes_the_loop() {
        let (handle, mut event_loop) = EventLoop::new();
        handle.execute(|| {});
        handle.quit();
        handle.execute(|| {});

        assert_eq!(event_loop.run_pending(), 1);
        assert!(handle.is_closed());
    }

    #[test]
    fn arc_wrapped_context_schedules() {
        let (handle, mut event_loop) = EventLoop::new();
        let shared: Arc<dyn MonitoredContext> = Arc::new(handle);

        assert!(shared.schedule(Box::new(|| {})));
        assert_eq!(event_loop.run_pending(), 1);
    }
}

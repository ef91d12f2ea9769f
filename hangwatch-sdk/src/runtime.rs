//! Choosing where background tasks run.

use std::future::Future;
use std::thread;

use tokio::runtime::{Builder, Handle};

use crate::error::WatchdogError;

/// Spawn `task` on `preferred`, else on the ambient runtime, else on a new
/// named thread driving its own current-thread runtime.
pub(crate) fn spawn_detached<F>(
    thread_name: &str,
    preferred: Option<&Handle>,
    task: F,
) -> Result<(), WatchdogError>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Some(handle) = preferred.cloned().or_else(|| Handle::try_current().ok()) {
        handle.spawn(task);
        return Ok(());
    }

    let runtime = Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|e| WatchdogError::Runtime(e.to_string()))?;

    thread::Builder::new()
        .name(thread_name.to_string())
        .spawn(move || runtime.block_on(task))
        .map_err(|e| WatchdogError::Runtime(e.to_string()))?;

    Ok(())
}

// Debounced trigger for full syncs.
// Bursts of tab, window and visibility events collapse into one trailing run.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Quiet period before a triggered sync starts.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Runs the most recently triggered job once no new trigger arrives for `delay`.
///
/// Only the wait is cancellable. A job that has started always runs to
/// completion, and runs never overlap.
pub struct DebouncedTrigger {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
    run_lock: Arc<tokio::sync::Mutex<()>>,
}

impl DebouncedTrigger {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
            run_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules `job`, replacing any job still waiting. Must be called inside a tokio runtime.
    pub fn trigger<F, Fut>(&self, job: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let run_lock = self.run_lock.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(async move {
                let _running = run_lock.lock().await;
                job().await;
            });
        });

        let mut pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }

    /// Drops the waiting job, if any.
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }

    /// True while a job is waiting out its quiet period.
    pub fn is_pending(&self) -> bool {
        let pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
        pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Default for DebouncedTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

//! Single-slot timer that coalesces rapid triggers into one delayed run.
//!
//! Each [`schedule`](Debouncer::schedule) call aborts whatever was pending
//! and arranges for the new action to run once, `delay` after the call. At
//! any moment the instance holds 0 or 1 pending timer. Infallible by
//! construction; an aborted action simply never runs.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;

pub struct Debouncer {
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(None),
        }
    }

    /// Replace any pending action with `action`, to run after `delay`.
    ///
    /// Cancellation only reaches the timer: once it fires, the action is
    /// detached and runs to completion even if the debouncer is
    /// rescheduled or dropped while the action is still in flight.
    pub fn schedule<F>(&self, delay: Duration, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(action);
        });

        let mut slot = self.pending.lock().unwrap();
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }

    /// Abort the pending action, if any, without scheduling a new one.
    pub fn cancel_pending(&self) {
        if let Some(handle) = self.pending.lock().unwrap().take() {
            handle.abort();
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cloneable flag used to ask a running session or supervisor to stop.
///
/// Stopping is cooperative: the flag is checked once per render iteration (after the
/// update-interval sleep) and after each reconnect backoff, never in the middle of a write.
/// Clones share the same flag, so one can be moved into a signal handler.
///
/// # Examples
///
/// ```
/// use unolcd_core::StopHandle;
///
/// let stop = StopHandle::new();
/// let remote = stop.clone();
/// assert!(!stop.is_stopped());
///
/// remote.stop();
/// assert!(stop.is_stopped());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    /// Creates a handle that has not been stopped.
    pub fn new() -> Self {
        StopHandle::default()
    }

    /// Requests a stop. Idempotent.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    /// Returns whether a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

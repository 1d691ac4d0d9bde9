use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::debug;

use unolcd_core::{Clock, StopHandle};

/// A [`Clock`] that only moves when slept on or explicitly advanced.
///
/// Clones share the same time, so a test can keep one handle while a session or supervisor
/// owns another. Every sleep is recorded, which makes it easy to assert on render intervals
/// and reconnect backoff without actually waiting.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use unolcd_core::{Clock, StopHandle};
/// use unolcd_testing::ManualClock;
///
/// let stop = StopHandle::new();
/// let clock = ManualClock::new().stop_after(2, stop.clone());
/// let start = clock.now();
///
/// clock.sleep(Duration::from_secs(1));
/// assert!(!stop.is_stopped());
/// clock.sleep(Duration::from_secs(1));
/// assert!(stop.is_stopped());
///
/// assert_eq!(Duration::from_secs(2), clock.now() - start);
/// assert_eq!(vec![Duration::from_secs(1); 2], clock.sleeps());
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Rc<Inner>,
}

#[derive(Debug)]
struct Inner {
    now: Cell<Instant>,
    sleeps: RefCell<Vec<Duration>>,
    stop_after: RefCell<Option<(usize, StopHandle)>>,
}

impl ManualClock {
    /// Creates a new `ManualClock` starting at the current instant.
    pub fn new() -> Self {
        ManualClock {
            inner: Rc::new(Inner {
                now: Cell::new(Instant::now()),
                sleeps: RefCell::new(vec![]),
                stop_after: RefCell::new(None),
            }),
        }
    }

    /// Arranges for `stop` to be triggered once `sleeps` sleeps in total have been recorded.
    ///
    /// This is the usual way to bound an otherwise endless render loop in a test.
    pub fn stop_after(self, sleeps: usize, stop: StopHandle) -> Self {
        *self.inner.stop_after.borrow_mut() = Some((sleeps, stop));
        self.check_stop();
        self
    }

    /// Moves time forward without recording a sleep.
    pub fn advance(&self, duration: Duration) {
        self.inner.now.set(self.inner.now.get() + duration);
    }

    /// Returns every duration slept so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.inner.sleeps.borrow().clone()
    }

    fn check_stop(&self) {
        if let Some((limit, ref stop)) = *self.inner.stop_after.borrow() {
            if self.inner.sleeps.borrow().len() >= limit {
                stop.stop();
            }
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        ManualClock::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.inner.now.get()
    }

    fn sleep(&self, duration: Duration) {
        debug!("Manual clock sleeping {:?}", duration);
        self.advance(duration);
        self.inner.sleeps.borrow_mut().push(duration);
        self.check_stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_time() {
        let clock = ManualClock::new();
        let other = clock.clone();
        let start = clock.now();

        other.sleep(Duration::from_millis(250));
        clock.advance(Duration::from_millis(750));

        assert_eq!(Duration::from_secs(1), other.now() - start);
        assert_eq!(vec![Duration::from_millis(250)], clock.sleeps());
    }

    #[test]
    fn stop_after_zero_stops_immediately() {
        let stop = StopHandle::new();
        let _clock = ManualClock::new().stop_after(0, stop.clone());
        assert!(stop.is_stopped());
    }
}

use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

/// Source of monotonic time and the only way a session suspends itself.
///
/// Injected into sessions and supervisors so that rotation and backoff timing can be tested
/// deterministically (see `ManualClock` in [`unolcd-testing`]).
///
/// [`unolcd-testing`]: https://docs.rs/unolcd-testing
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> Instant;

    /// Blocks for `duration`.
    fn sleep(&self, duration: Duration);
}

/// The real clock: [`Instant::now`] and [`thread::sleep`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use unolcd_core::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let start = clock.now();
/// clock.sleep(Duration::from_millis(1));
/// assert!(clock.now() > start);
/// ```
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

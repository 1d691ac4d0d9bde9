use std::time::{Duration, Instant};

/// Decides which provider is on screen.
///
/// Starts at index 0 and advances by one (wrapping) whenever strictly more than the change
/// interval has passed since the last switch, so every provider is shown for at least that
/// long. Time is passed in rather than sampled, which keeps the logic pure.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use unolcd::Rotation;
///
/// let start = Instant::now();
/// let mut rotation = Rotation::new(2, Duration::from_secs(5), start);
///
/// assert_eq!(0, rotation.tick(start + Duration::from_secs(5)));
/// assert_eq!(1, rotation.tick(start + Duration::from_millis(5001)));
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rotation {
    count: usize,
    change_interval: Duration,
    current: usize,
    last_switch: Instant,
}

impl Rotation {
    /// Creates a new `Rotation` over `count` providers, showing the first as of `now`.
    ///
    /// A `count` of zero is treated as one.
    pub fn new(count: usize, change_interval: Duration, now: Instant) -> Self {
        Rotation {
            count: count.max(1),
            change_interval,
            current: 0,
            last_switch: now,
        }
    }

    /// Advances the rotation to `now` and returns the index of the provider to show.
    ///
    /// An instant earlier than the last switch counts as no time passing.
    pub fn tick(&mut self, now: Instant) -> usize {
        if now.saturating_duration_since(self.last_switch) > self.change_interval {
            self.current = (self.current + 1) % self.count;
            self.last_switch = now;
        }
        self.current
    }

    /// Returns the index of the provider currently shown.
    pub fn current(&self) -> usize {
        self.current
    }
}

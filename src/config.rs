use std::time::Duration;

use thiserror::Error;

use crate::core::BacklightColor;
use crate::Provider;

/// Seconds between redraws when not otherwise configured.
pub const DEFAULT_UPDATE_INTERVAL: f64 = 1.0;

/// Seconds each provider stays on screen when not otherwise configured.
pub const DEFAULT_CHANGE_INTERVAL: u64 = 10;

/// Errors in user-supplied configuration, detected before any connection is attempted.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// No serial port was given.
    #[error("No serial port specified")]
    MissingPort,

    /// The provider list was empty.
    #[error("No outputs selected")]
    NoProviders,

    /// A provider name did not match anything in the registry.
    #[error("Unknown output {:?}", name)]
    UnknownProvider {
        /// The name that failed to match.
        name: String,
    },

    /// The update interval was not a positive, finite number of seconds.
    #[error("Update interval must be a positive number of seconds, got {}", .0)]
    InvalidUpdateInterval(f64),

    /// The change interval was zero.
    #[error("Change interval must be at least 1 second, got {}", .0)]
    InvalidChangeInterval(u64),
}

/// Everything a session needs to know about what to draw and how often.
///
/// Built once from user input and validated up front; the providers are the only part that
/// changes afterward, through their own internal state.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use unolcd::{BacklightColor, RunConfig, TimeProvider};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let config = RunConfig::new(vec![Box::new(TimeProvider)], 0.5, 10)?
///     .with_auto_reconnect(true)
///     .with_backlight(BacklightColor::Teal);
///
/// assert_eq!(Duration::from_millis(500), config.update_interval());
/// assert_eq!(Duration::from_secs(10), config.change_interval());
/// assert!(config.auto_reconnect());
/// #
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct RunConfig {
    providers: Vec<Box<dyn Provider>>,
    update_interval: Duration,
    change_interval: Duration,
    auto_reconnect: bool,
    backlight: BacklightColor,
}

impl RunConfig {
    /// Creates a new `RunConfig` with auto-reconnect off and a white backlight.
    ///
    /// `update_interval` is in (possibly fractional) seconds; `change_interval` is in whole seconds.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::NoProviders`] if `providers` is empty
    /// * [`ConfigError::InvalidUpdateInterval`] if `update_interval` is not positive and finite
    /// * [`ConfigError::InvalidChangeInterval`] if `change_interval` is zero
    pub fn new(providers: Vec<Box<dyn Provider>>, update_interval: f64, change_interval: u64) -> Result<Self, ConfigError> {
        if providers.is_empty() {
            return Err(ConfigError::NoProviders);
        }

        let update = match Duration::try_from_secs_f64(update_interval) {
            Ok(duration) if !duration.is_zero() => duration,
            _ => return Err(ConfigError::InvalidUpdateInterval(update_interval)),
        };

        if change_interval == 0 {
            return Err(ConfigError::InvalidChangeInterval(change_interval));
        }

        Ok(RunConfig {
            providers,
            update_interval: update,
            change_interval: Duration::from_secs(change_interval),
            auto_reconnect: false,
            backlight: BacklightColor::default(),
        })
    }

    /// Sets whether a lost connection is retried indefinitely.
    pub fn with_auto_reconnect(mut self, auto_reconnect: bool) -> Self {
        self.auto_reconnect = auto_reconnect;
        self
    }

    /// Sets the backlight color sent during every handshake.
    pub fn with_backlight(mut self, backlight: BacklightColor) -> Self {
        self.backlight = backlight;
        self
    }

    /// Returns the providers, in rotation order.
    pub fn providers(&self) -> &[Box<dyn Provider>] {
        &self.providers
    }

    /// Returns a mutable reference to the provider at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn provider_mut(&mut self, index: usize) -> &mut dyn Provider {
        &mut *self.providers[index]
    }

    /// Returns the delay between redraws.
    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }

    /// Returns how long each provider stays on screen.
    pub fn change_interval(&self) -> Duration {
        self.change_interval
    }

    /// Returns whether a lost connection is retried.
    pub fn auto_reconnect(&self) -> bool {
        self.auto_reconnect
    }

    /// Returns the backlight color sent during the handshake.
    pub fn backlight(&self) -> BacklightColor {
        self.backlight
    }
}

use std::fmt::{self, Debug, Display, Formatter};
use std::time::Duration;

use log::{error, info, warn};

use crate::core::{Clock, Connector, Geometry, StopHandle, SystemClock, TransportError};
use crate::{ErrorChain, RunConfig, Terminal};

/// Delay before reconnecting after a lost connection, unless overridden.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(2);

/// A change in connection state, reported to the callback registered with [`Supervisor::on_status`].
#[derive(Debug, Copy, Clone)]
pub enum Status<'a> {
    /// About to open the transport.
    Connecting {
        /// What is being connected to.
        target: &'a str,
    },

    /// The handshake completed.
    Connected {
        /// What was connected to.
        target: &'a str,

        /// The geometry resolved by the handshake.
        geometry: Geometry,
    },

    /// The session ended because of a transport failure.
    Disconnected {
        /// What was connected to.
        target: &'a str,

        /// The failure that ended the session.
        error: &'a TransportError,
    },

    /// The supervisor has stopped for good.
    Stopped,
}

impl Display for Status<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Status::Connecting { target } => write!(f, "Connecting to {}", target),
            Status::Connected { target, geometry } => write!(f, "Connected to {} ({})", target, geometry),
            Status::Disconnected { target, .. } => write!(f, "Disconnected from {}", target),
            Status::Stopped => write!(f, "Stopped"),
        }
    }
}

/// Where the supervisor is in its lifecycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum State {
    Attempting,
    Backoff,
    Stopped,
}

/// Runs sessions against a terminal, reconnecting after failures if configured to.
///
/// Each attempt opens a fresh transport through the [`Connector`] and performs a full handshake,
/// since the terminal may have been reset while disconnected. With auto-reconnect enabled,
/// failures are followed by a fixed backoff and another attempt, without limit. Otherwise the
/// first failure ends the run.
///
/// Stopping through the [`StopHandle`] takes effect after the current render sleep or backoff,
/// and never opens a new connection.
///
/// # Examples
///
/// ```no_run
/// use unolcd::{Registry, RunConfig, SerialConnector, StopHandle, Supervisor};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let providers = Registry::builtin().create_all(["time"])?;
/// let config = RunConfig::new(providers, 1.0, 10)?.with_auto_reconnect(true);
///
/// let mut supervisor = Supervisor::new(SerialConnector::new("/dev/ttyACM0"), config)
///     .on_status(|status| println!("{}", status));
/// supervisor.run(&StopHandle::new())?;
/// #
/// # Ok(()) }
/// ```
pub struct Supervisor<K: Connector, C: Clock + Clone = SystemClock> {
    connector: K,
    config: RunConfig,
    clock: C,
    backoff: Duration,
    on_status: Option<Box<dyn FnMut(Status<'_>)>>,
}

impl<K: Connector> Supervisor<K> {
    /// Creates a new `Supervisor` using the system clock and the default backoff.
    pub fn new(connector: K, config: RunConfig) -> Self {
        Supervisor {
            connector,
            config,
            clock: SystemClock,
            backoff: DEFAULT_BACKOFF,
            on_status: None,
        }
    }
}

impl<K: Connector, C: Clock + Clone> Supervisor<K, C> {
    /// Sets the delay between a failure and the next attempt.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Replaces the clock used for backoff and by each session.
    pub fn with_clock<D: Clock + Clone>(self, clock: D) -> Supervisor<K, D> {
        Supervisor {
            connector: self.connector,
            config: self.config,
            clock,
            backoff: self.backoff,
            on_status: self.on_status,
        }
    }

    /// Registers a callback to be told about connection state changes.
    pub fn on_status<F: FnMut(Status<'_>) + 'static>(mut self, callback: F) -> Self {
        self.on_status = Some(Box::new(callback));
        self
    }

    /// Returns a reference to the connector.
    pub fn connector(&self) -> &K {
        &self.connector
    }

    /// Runs until stopped, or until a session fails with auto-reconnect disabled.
    ///
    /// # Errors
    ///
    /// Returns the [`TransportError`] that ended the last session if auto-reconnect is disabled.
    /// With auto-reconnect enabled this only returns `Ok(())`, once `stop` is triggered.
    pub fn run(&mut self, stop: &StopHandle) -> Result<(), TransportError> {
        let target = self.connector.target().to_owned();
        let mut state = State::Attempting;

        loop {
            state = match state {
                State::Stopped => break,
                _ if stop.is_stopped() => State::Stopped,
                State::Attempting => match self.attempt(&target, stop) {
                    Ok(()) => State::Stopped,
                    Err(e) => {
                        self.notify(Status::Disconnected {
                            target: &target,
                            error: &e,
                        });
                        if !self.config.auto_reconnect() {
                            error!("Lost connection to {}: {}", target, ErrorChain(&e));
                            self.notify(Status::Stopped);
                            return Err(e);
                        }
                        warn!(
                            "Lost connection to {}: {}; retrying in {:?}",
                            target,
                            ErrorChain(&e),
                            self.backoff
                        );
                        State::Backoff
                    }
                },
                State::Backoff => {
                    self.clock.sleep(self.backoff);
                    State::Attempting
                }
            };
        }

        self.notify(Status::Stopped);
        Ok(())
    }

    /// Runs one session from connection to completion. The terminal, and with it
    /// the transport, is dropped on return regardless of outcome.
    fn attempt(&mut self, target: &str, stop: &StopHandle) -> Result<(), TransportError> {
        self.notify(Status::Connecting { target });
        let transport = self.connector.connect()?;

        let mut terminal = Terminal::new(transport, self.clock.clone());
        let geometry = terminal.handshake(self.config.backlight())?;
        info!("Connected to {}", target);
        self.notify(Status::Connected { target, geometry });

        terminal.run(&mut self.config, stop)
    }

    fn notify(&mut self, status: Status<'_>) {
        if let Some(ref mut callback) = self.on_status {
            callback(status);
        }
    }
}

impl<K: Connector + Debug, C: Clock + Clone + Debug> Debug for Supervisor<K, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("connector", &self.connector)
            .field("config", &self.config)
            .field("clock", &self.clock)
            .field("backoff", &self.backoff)
            .field("on_status", &self.on_status.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display() {
        let error = TransportError::Disconnected;
        assert_eq!("Connecting to COM3", Status::Connecting { target: "COM3" }.to_string());
        assert_eq!(
            "Connected to COM3 (20x4)",
            Status::Connected {
                target: "COM3",
                geometry: Geometry::try_new(20, 4).unwrap(),
            }
            .to_string()
        );
        assert_eq!(
            "Disconnected from COM3",
            Status::Disconnected {
                target: "COM3",
                error: &error,
            }
            .to_string()
        );
    }
}

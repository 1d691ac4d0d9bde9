use std::io::{self, ErrorKind, Read, Write};
use std::time::{Duration, Instant};

use log::{debug, info};
use serial_core::prelude::*;

use unolcd_core::{Connector, Transport, TransportError};

use crate::serial_port;

/// Read timeout set on the port when it is configured. Each [`Transport::read_line`] call
/// replaces it with its own timeout.
pub const PORT_TIMEOUT: Duration = Duration::from_secs(1);

/// An implementation of [`Transport`] that talks to a terminal over a serial port.
///
/// Writes and replies are logged using the [`log`] crate for debugging purposes. Consuming binaries
/// typically use the [`env_logger`] crate and can be run with the `RUST_LOG=debug` environment variable
/// to watch the traffic go by.
///
/// # Examples
///
/// ```no_run
/// use unolcd_serial::SerialTransport;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let port = serial::open("/dev/ttyACM0")?;
/// let transport = SerialTransport::try_new(port)?;
/// // Can now hand the transport to a Terminal.
/// #
/// # Ok(()) }
/// ```
///
/// [`log`]: https://crates.io/crates/log
/// [`env_logger`]: https://crates.io/crates/env_logger
#[derive(Debug, Eq, PartialEq, Hash)]
pub struct SerialTransport<P: SerialPort> {
    port: P,
}

impl<P: SerialPort> SerialTransport<P> {
    /// Creates a new `SerialTransport` that communicates over the specified serial port.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Io`] if the serial port cannot be configured.
    pub fn try_new(mut port: P) -> Result<Self, TransportError> {
        serial_port::configure_port(&mut port, PORT_TIMEOUT).map_err(io::Error::from)?;
        Ok(SerialTransport { port })
    }

    /// Returns a reference to the underlying serial port.
    pub fn port(&self) -> &P {
        &self.port
    }
}

impl<P: SerialPort> Transport for SerialTransport<P> {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        debug!("Serial write: {:?}", String::from_utf8_lossy(bytes));
        self.port.write_all(bytes).map_err(classify)?;
        self.port.flush().map_err(classify)?;
        Ok(())
    }

    /// Reads bytes one at a time until a newline arrives or `timeout` elapses.
    fn read_line(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError> {
        let deadline = Instant::now() + timeout;
        self.port.set_timeout(timeout).map_err(io::Error::from)?;

        let mut line = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            match self.port.read(&mut byte) {
                Ok(0) => return Err(TransportError::Disconnected),
                Ok(_) => {
                    line.push(byte[0]);
                    if byte[0] == b'\n' {
                        break;
                    }
                }
                Err(ref e) if e.kind() == ErrorKind::TimedOut || e.kind() == ErrorKind::WouldBlock => break,
                Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(classify(e)),
            }

            if Instant::now() >= deadline {
                break;
            }
        }

        if line.is_empty() {
            debug!("Serial read timed out after {:?}", timeout);
            Ok(None)
        } else {
            debug!("Serial reply: {:?}", String::from_utf8_lossy(&line));
            Ok(Some(line))
        }
    }
}

/// Distinguishes a vanished device from other I/O failures.
fn classify(error: io::Error) -> TransportError {
    match error.kind() {
        ErrorKind::BrokenPipe | ErrorKind::NotConnected | ErrorKind::UnexpectedEof | ErrorKind::WriteZero => {
            TransportError::Disconnected
        }
        _ => TransportError::Io { source: error },
    }
}

/// Opens a fresh [`SerialTransport`] on a device path for every connection attempt.
///
/// # Examples
///
/// ```no_run
/// use unolcd_core::Connector;
/// use unolcd_serial::SerialConnector;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let mut connector = SerialConnector::new("/dev/ttyACM0");
/// let transport = connector.connect()?;
/// #
/// # Ok(()) }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SerialConnector {
    path: String,
}

impl SerialConnector {
    /// Creates a new `SerialConnector` for the device at `path`.
    pub fn new<S: Into<String>>(path: S) -> Self {
        SerialConnector { path: path.into() }
    }
}

impl Connector for SerialConnector {
    type Transport = SerialTransport<serial::SystemPort>;

    fn connect(&mut self) -> Result<Self::Transport, TransportError> {
        info!("Opening {}", self.path);
        let port = serial::open(&self.path).map_err(|e| TransportError::Open {
            target: self.path.clone(),
            source: Box::new(e),
        })?;
        SerialTransport::try_new(port)
    }

    fn target(&self) -> &str {
        &self.path
    }
}

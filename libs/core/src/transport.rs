use std::cell::RefCell;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Formatter};
use std::io;
use std::rc::Rc;
use std::time::Duration;

use thiserror::Error;

/// Errors indicating that the link to the terminal is unusable.
///
/// Any of these ends the current session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The transport could not be opened.
    #[error("Failed to open {}", target)]
    Open {
        /// Path or other description of what was being opened.
        target: String,

        /// The underlying error.
        source: Box<dyn StdError + Send + Sync>,
    },

    /// Reading from or writing to the transport failed.
    #[error("Failed reading/writing the transport")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// The other end went away.
    #[error("Terminal disconnected")]
    Disconnected,
}

/// Abstraction over a byte link to a terminal.
///
/// Writes are delivered in the order submitted. The only reads are the line-oriented replies
/// to attribute queries during the handshake, each bounded by a timeout.
///
/// Typically `SerialTransport` from [`unolcd-serial`] or `VirtualTerminal` from [`unolcd-testing`]
/// are sufficient, and you do not need to implement this yourself.
///
/// # Examples
///
/// Implementing a transport that discards everything:
///
/// ```
/// use std::time::Duration;
/// use unolcd_core::{Transport, TransportError};
///
/// struct NullTransport;
///
/// impl Transport for NullTransport {
///     fn write_bytes(&mut self, _: &[u8]) -> Result<(), TransportError> {
///         Ok(())
///     }
///
///     fn read_line(&mut self, _: Duration) -> Result<Option<Vec<u8>>, TransportError> {
///         Ok(None)
///     }
/// }
/// ```
///
/// [`unolcd-serial`]: https://docs.rs/unolcd-serial
/// [`unolcd-testing`]: https://docs.rs/unolcd-testing
pub trait Transport {
    /// Writes all of `bytes` to the terminal.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Reads a single line (up to and including `\n`) from the terminal.
    ///
    /// Returns `Ok(None)` if nothing arrived before `timeout` elapsed. Data that arrived
    /// before the timeout without a line terminator is returned as-is.
    fn read_line(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError>;
}

// Provide a Debug representation so types that contain trait objects can derive Debug.
impl Debug for dyn Transport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<Transport trait>")
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        (**self).write_bytes(bytes)
    }

    fn read_line(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError> {
        (**self).read_line(timeout)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        (**self).write_bytes(bytes)
    }

    fn read_line(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError> {
        (**self).read_line(timeout)
    }
}

/// Allows a transport to be inspected by its owner while a session drives it.
impl<T: Transport + ?Sized> Transport for Rc<RefCell<T>> {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.borrow_mut().write_bytes(bytes)
    }

    fn read_line(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError> {
        self.borrow_mut().read_line(timeout)
    }
}

/// Creates a fresh [`Transport`] for each connection attempt.
///
/// # Examples
///
/// ```
/// use unolcd_core::{Connector, TransportError};
/// use unolcd_testing::VirtualTerminal;
///
/// struct VirtualConnector;
///
/// impl Connector for VirtualConnector {
///     type Transport = VirtualTerminal;
///
///     fn connect(&mut self) -> Result<VirtualTerminal, TransportError> {
///         Ok(VirtualTerminal::new(16, 2))
///     }
///
///     fn target(&self) -> &str {
///         "virtual"
///     }
/// }
/// ```
pub trait Connector {
    /// The transport produced by a successful connection.
    type Transport: Transport;

    /// Opens a new transport.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the terminal cannot be reached.
    fn connect(&mut self) -> Result<Self::Transport, TransportError>;

    /// Describes what is being connected to, for logging (e.g. a device path).
    fn target(&self) -> &str;
}

impl<C: Connector + ?Sized> Connector for &mut C {
    type Transport = C::Transport;

    fn connect(&mut self) -> Result<Self::Transport, TransportError> {
        (**self).connect()
    }

    fn target(&self) -> &str {
        (**self).target()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct RecordingTransport {
        written: Vec<u8>,
    }

    impl Transport for RecordingTransport {
        fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
            self.written.extend_from_slice(bytes);
            Ok(())
        }

        fn read_line(&mut self, _: Duration) -> Result<Option<Vec<u8>>, TransportError> {
            Ok(None)
        }
    }

    #[test]
    fn shared_transport_visible_to_owner() {
        let shared = Rc::new(RefCell::new(RecordingTransport::default()));
        let mut handle = Rc::clone(&shared);
        handle.write_bytes(b"h").unwrap();
        handle.write_bytes(b"cr0").unwrap();
        assert_eq!(b"hcr0", shared.borrow().written.as_slice());
    }

    #[test]
    fn boxed_transport_forwards() {
        let mut boxed: Box<dyn Transport> = Box::new(RecordingTransport::default());
        boxed.write_bytes(b"r").unwrap();
        assert_eq!(None, boxed.read_line(Duration::from_secs(1)).unwrap());
    }

    #[test]
    fn display() {
        let error = TransportError::Open {
            target: "/dev/ttyACM0".into(),
            source: "no such device".into(),
        };
        assert_eq!("Failed to open /dev/ttyACM0", error.to_string());
        assert_eq!("Terminal disconnected", TransportError::Disconnected.to_string());
    }
}

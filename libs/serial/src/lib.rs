//! Tools for communicating with Uno LCD Terminals over serial.
//!
//! For the basic task of driving a terminal, you likely want to use the high-level API
//! in the [`unolcd`] crate instead.
//!
//! However, you can use the [`configure_port`] function to configure a serial port appropriately
//! if you're doing custom lower-level communication.
//!
//! # Examples
//!
//! ```no_run
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! #
//! let mut port = serial::open("/dev/ttyACM0")?;
//! unolcd_serial::configure_port(&mut port, Duration::from_secs(1))?;
//! // Now ready for communication with a terminal (8N1 9600 baud).
//! #
//! # Ok(()) }
//! ```
//!
//! [`unolcd`]: https://docs.rs/unolcd
#![doc(html_root_url = "https://docs.rs/unolcd-serial/0.2.0")]
#![deny(
    missing_copy_implementations,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![warn(
    missing_docs,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]

mod serial_port;
mod serial_transport;

pub use self::serial_port::{configure_port, BAUD_RATE};
pub use self::serial_transport::{SerialConnector, SerialTransport, PORT_TIMEOUT};

//! A library for showing status information on Uno LCD Terminal character displays over serial.
//!
//! Provides a way to connect to a terminal, pick one or more output providers that each produce a few
//! lines of text, and keep the display updated, switching between providers on a slower cadence.
//! Lost connections can optionally be retried until the terminal comes back.
//!
//! Tested with a 16 × 2 display. Any size the terminal reports is supported, and terminals that
//! don't report a size are assumed to be 16 × 2.
//!
//! # Examples
//!
//! ```no_run
//! use unolcd::{Registry, RunConfig, SerialConnector, StopHandle, Supervisor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! #
//! // Choose what to show and how often to update it.
//! let providers = Registry::builtin().create_all(["time"])?;
//! let config = RunConfig::new(providers, 1.0, 10)?.with_auto_reconnect(true);
//!
//! // Hand the stop handle to whatever should be able to end the run,
//! // such as a Ctrl-C handler.
//! let stop = StopHandle::new();
//!
//! // Connect and keep the display updated until stopped.
//! let mut supervisor = Supervisor::new(SerialConnector::new("/dev/ttyACM0"), config);
//! supervisor.run(&stop)?;
//! #
//! # Ok(()) }
//! ```
//!
//! A single session can also be driven directly, without reconnection:
//!
//! ```no_run
//! use unolcd::{BacklightColor, Terminal};
//! use unolcd::core::{Connector, SystemClock};
//! use unolcd::SerialConnector;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! #
//! let transport = SerialConnector::new("/dev/ttyACM0").connect()?;
//! let mut terminal = Terminal::new(transport, SystemClock);
//! terminal.handshake(BacklightColor::Green)?;
//! terminal.render(&["Hello", "world"])?;
//! #
//! # Ok(()) }
//! ```
//!
//! # Sub-crates
//!
//! In addition to the high-level API of [`Supervisor`] and [`Terminal`], several lower-level components
//! are provided that can be combined for more specialized use-cases.
//!
//! - [`unolcd-core`] \(re-exported as `core`\) contains the command protocol, the [`Transport`] trait,
//!   and the clock and cancellation primitives, and is useful if you want to implement a custom transport.
//! - [`unolcd-serial`] \(re-exported as `serial`\) contains functions for configuring the serial port,
//!   as well as the implementation of [`SerialTransport`].
//! - [`unolcd-testing`] contains tools not directly related to driving real terminals,
//!   but useful for testing and debugging.
//!
//! [`unolcd-core`]: https://docs.rs/unolcd-core
//! [`unolcd-serial`]: https://docs.rs/unolcd-serial
//! [`unolcd-testing`]: https://docs.rs/unolcd-testing
#![doc(html_root_url = "https://docs.rs/unolcd/0.2.0")]
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

pub use unolcd_core as core;
pub use unolcd_serial as serial;

mod config;
mod error_chain;
mod provider;
mod rotation;
mod supervisor;
mod terminal;

pub use self::config::{ConfigError, RunConfig, DEFAULT_CHANGE_INTERVAL, DEFAULT_UPDATE_INTERVAL};
pub use self::error_chain::ErrorChain;
pub use self::provider::{FnProvider, Provider, Registry, TimeProvider};
pub use self::rotation::Rotation;
pub use self::supervisor::{Status, Supervisor, DEFAULT_BACKOFF};
pub use self::terminal::{Terminal, QUERY_TIMEOUT};

pub use self::core::{BacklightColor, Geometry, StopHandle, Transport, TransportError};
pub use self::serial::{SerialConnector, SerialTransport};

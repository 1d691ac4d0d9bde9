//! Core types for describing communication with Uno LCD Terminal character displays.
//!
//! For the basic task of driving a terminal, you likely want to use the high-level API
//! in the [`unolcd`] crate instead.
//!
//! However, `unolcd_core` is useful for crates that want to speak the terminal's command
//! protocol directly, or that want to provide their own [`Transport`] implementations
//! for use by `unolcd`.
//!
//! The terminal is a character LCD (typically 16 × 2) on a microcontroller attached over serial.
//! It understands single-letter ASCII commands to reset, move the cursor, write text, set the
//! backlight, and report its dimensions.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use unolcd_core::{parse_attribute_response, Command, Geometry, TerminalAttribute, Transport};
//! use unolcd_testing::VirtualTerminal;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! #
//! let mut terminal = VirtualTerminal::new(20, 4);
//!
//! // Ask the terminal how wide it is.
//! terminal.write_bytes(&Command::GetAttribute(TerminalAttribute::Width).to_bytes())?;
//! let reply = terminal.read_line(Duration::from_secs(1))?.unwrap_or_default();
//! assert_eq!(Ok(20), parse_attribute_response(&reply));
//!
//! // Write a line of text padded to that width.
//! terminal.write_bytes(&Command::Home.to_bytes())?;
//! terminal.write_bytes(&Command::write_string("Hello", 20).to_bytes())?;
//! assert_eq!("Hello", terminal.line(0).trim_end());
//! #
//! # Ok(()) }
//! ```
//!
//! [`unolcd`]: https://docs.rs/unolcd
#![doc(html_root_url = "https://docs.rs/unolcd-core/0.2.0")]
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

mod attribute;
mod backlight;
mod clock;
mod command;
mod geometry;
mod stop;
mod transport;

pub use self::attribute::{parse_attribute_response, AttributeError, TerminalAttribute};
pub use self::backlight::{BacklightColor, UnknownColorError};
pub use self::clock::{Clock, SystemClock};
pub use self::command::Command;
pub use self::geometry::Geometry;
pub use self::stop::StopHandle;
pub use self::transport::{Connector, Transport, TransportError};

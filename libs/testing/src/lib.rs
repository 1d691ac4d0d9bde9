//! Tools for testing and debugging Uno LCD Terminal communications.
//!
//! For the basic task of driving a terminal, you likely want to use the high-level API
//! in the [`unolcd`] crate instead.
//!
//! This crate isn't directly related to controlling a real terminal, but provides stand-ins for
//! the pieces that touch the outside world. [`VirtualTerminal`] is a mock terminal that speaks
//! the command protocol and keeps an inspectable character grid, [`ManualClock`] is a clock
//! that only advances when slept on, and [`ScriptedConnector`] replays a fixed sequence of
//! connection outcomes.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use unolcd_core::{Command, Transport};
//! use unolcd_testing::VirtualTerminal;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! #
//! let mut terminal = VirtualTerminal::new(16, 2);
//! terminal.write_bytes(&Command::Home.to_bytes())?;
//! terminal.write_bytes(&Command::write_string("Hello", 16).to_bytes())?;
//!
//! assert_eq!("Hello           ", terminal.line(0));
//! assert_eq!(1, terminal.writes().iter().filter(|w| w.starts_with(b"p")).count());
//! #
//! # Ok(()) }
//! ```
//!
//! [`unolcd`]: https://docs.rs/unolcd
#![doc(html_root_url = "https://docs.rs/unolcd-testing/0.2.0")]
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

mod manual_clock;
mod scripted_connector;
mod virtual_terminal;

pub use self::manual_clock::ManualClock;
pub use self::scripted_connector::ScriptedConnector;
pub use self::virtual_terminal::{AttributeReply, VirtualTerminal};

use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use std::io::{self, Write};

use crate::{BacklightColor, TerminalAttribute};

/// A single instruction to the terminal in its byte-oriented command protocol.
///
/// Every command begins with a one-byte ASCII opcode. Payloads are either a fixed number of bytes
/// or self-delimiting (decimal digits, or text terminated by CRLF), so there is no length prefix
/// or checksum. Encoding is pure and deterministic.
///
/// Both owned and borrowed text are supported.
///
/// # Examples
///
/// ```
/// use unolcd_core::{BacklightColor, Command};
///
/// assert_eq!(b"bw", Command::SetBacklight(BacklightColor::White).to_bytes().as_slice());
/// assert_eq!(b"cr1", Command::set_row(1).to_bytes().as_slice());
/// assert_eq!(b"pHi  \r\n", Command::write_string("Hi", 4).to_bytes().as_slice());
/// ```
///
/// # Format Details
///
/// ```text
/// r                       reset
/// d                       clear
/// h                       home
/// [cc<digits>][cr<digits>] set cursor column and/or row, decimal ASCII
/// a<attr>                 get attribute; the terminal answers with a decimal ASCII line
/// p<text><spaces>\r\n     write string, space-padded to the requested width
/// b<color>                set backlight
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command<'a> {
    /// Resets the terminal to its power-on state.
    Reset,

    /// Blanks the display.
    ///
    /// Not used while rendering; redraws rely on [`Home`](Command::Home) plus padded writes instead.
    Clear,

    /// Moves the write cursor to column 0, row 0.
    Home,

    /// Moves the write cursor. Fields that are `None` are left unchanged
    /// and contribute nothing to the encoding.
    SetCursor {
        /// New column, if any.
        col: Option<u32>,
        /// New row, if any.
        row: Option<u32>,
    },

    /// Asks the terminal to report an attribute on a single line.
    GetAttribute(TerminalAttribute),

    /// Writes text at the cursor, padded with spaces to at least `width` bytes.
    ///
    /// Text longer than `width` is sent as-is; fitting it to the display is the caller's job.
    WriteString {
        /// The text to write.
        text: Cow<'a, str>,
        /// The minimum payload length in bytes.
        width: usize,
    },

    /// Sets the backlight color.
    SetBacklight(BacklightColor),
}

impl<'a> Command<'a> {
    /// Creates a [`SetCursor`](Command::SetCursor) command that only changes the row.
    ///
    /// # Examples
    ///
    /// ```
    /// # use unolcd_core::Command;
    /// assert_eq!(Command::SetCursor { col: None, row: Some(3) }, Command::set_row(3));
    /// ```
    pub fn set_row(row: u32) -> Self {
        Command::SetCursor { col: None, row: Some(row) }
    }

    /// Creates a [`WriteString`](Command::WriteString) command.
    ///
    /// # Examples
    ///
    /// ```
    /// # use unolcd_core::Command;
    /// let owned = Command::write_string(format!("{}:{}", 12, 30), 16);
    /// let borrowed = Command::write_string("12:30", 16);
    /// assert_eq!(owned, borrowed);
    /// ```
    pub fn write_string<T: Into<Cow<'a, str>>>(text: T, width: usize) -> Self {
        Command::WriteString {
            text: text.into(),
            width,
        }
    }

    /// Converts the command to its wire format.
    ///
    /// # Examples
    ///
    /// ```
    /// # use unolcd_core::{Command, TerminalAttribute};
    /// let command = Command::SetCursor { col: Some(2), row: Some(5) };
    /// assert_eq!(b"cc2cr5", command.to_bytes().as_slice());
    ///
    /// let command = Command::GetAttribute(TerminalAttribute::Width);
    /// assert_eq!(b"aw", command.to_bytes().as_slice());
    /// ```
    pub fn to_bytes(&self) -> Vec<u8> {
        match *self {
            Command::Reset => vec![b'r'],
            Command::Clear => vec![b'd'],
            Command::Home => vec![b'h'],
            Command::SetCursor { col, row } => {
                let mut output = Vec::new();
                if let Some(col) = col {
                    output.extend_from_slice(b"cc");
                    output.extend_from_slice(col.to_string().as_bytes());
                }
                if let Some(row) = row {
                    output.extend_from_slice(b"cr");
                    output.extend_from_slice(row.to_string().as_bytes());
                }
                output
            }
            Command::GetAttribute(attribute) => vec![b'a', attribute.to_byte()],
            Command::WriteString { ref text, width } => {
                let text = text.as_bytes();
                let padding = width.saturating_sub(text.len());

                // Opcode, text, padding, and CRLF
                let mut output = Vec::with_capacity(1 + text.len() + padding + 2);
                output.push(b'p');
                output.extend_from_slice(text);
                output.resize(output.len() + padding, b' ');
                output.extend_from_slice(b"\r\n");
                output
            }
            Command::SetBacklight(color) => vec![b'b', color.to_byte()],
        }
    }

    /// Writes the wire format of the command to a writer.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the write fails.
    ///
    /// # Examples
    ///
    /// ```
    /// # use unolcd_core::Command;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// #
    /// let mut output = Vec::new();
    /// Command::Home.write(&mut output)?;
    /// Command::set_row(0).write(&mut output)?;
    /// assert_eq!(b"hcr0", output.as_slice());
    /// #
    /// # Ok(()) }
    /// ```
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }
}

impl Display for Command<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Command::Reset => write!(f, "Reset"),
            Command::Clear => write!(f, "Clear"),
            Command::Home => write!(f, "Home"),
            Command::SetCursor { col, row } => {
                write!(f, "SetCursor(")?;
                match (col, row) {
                    (Some(col), Some(row)) => write!(f, "col {}, row {}", col, row)?,
                    (Some(col), None) => write!(f, "col {}", col)?,
                    (None, Some(row)) => write!(f, "row {}", row)?,
                    (None, None) => {}
                }
                write!(f, ")")
            }
            Command::GetAttribute(attribute) => write!(f, "GetAttribute({:?})", attribute),
            Command::WriteString { ref text, width } => write!(f, "WriteString({:?}, width {})", text, width),
            Command::SetBacklight(color) => write!(f, "SetBacklight({})", color),
        }
    }
}

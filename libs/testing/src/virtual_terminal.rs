use std::collections::VecDeque;
use std::mem;
use std::time::Duration;

use log::{debug, info, warn};

use unolcd_core::{BacklightColor, Command, TerminalAttribute, Transport, TransportError};

/// How a [`VirtualTerminal`] answers a query for one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeReply {
    /// Answer with the decimal value followed by CRLF, like real firmware.
    Value(u32),
    /// Answer with exactly these bytes.
    Raw(Vec<u8>),
    /// Never answer, so the host's read times out.
    Silent,
}

/// Mock implementation of a terminal attached over serial.
///
/// Interprets the byte stream written to it as the terminal's command protocol and keeps a
/// character grid, cursor, and backlight state that tests can inspect. Attribute queries are
/// answered according to a configurable [`AttributeReply`] per attribute.
///
/// Characters written past the right edge are clipped, matching the behavior of an HD44780-style
/// display that does not wrap.
///
/// Every call to [`write_bytes`](Transport::write_bytes) is also recorded verbatim so that tests
/// can assert on the exact wire traffic.
///
/// Commands are logged using the [`log`] crate for debugging purposes.
///
/// # Examples
///
/// ```
/// use unolcd_core::{Command, Transport};
/// use unolcd_testing::VirtualTerminal;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let mut terminal = VirtualTerminal::new(16, 2);
/// terminal.write_bytes(&Command::set_row(1).to_bytes())?;
/// terminal.write_bytes(&Command::write_string("12:30:00", 16).to_bytes())?;
/// assert_eq!("12:30:00        ", terminal.line(1));
/// #
/// # Ok(()) }
/// ```
///
/// [`log`]: https://crates.io/crates/log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualTerminal {
    width: usize,
    height: usize,
    width_reply: AttributeReply,
    height_reply: AttributeReply,
    color_reply: AttributeReply,
    grid: Vec<Vec<u8>>,
    cursor: (usize, usize),
    backlight: Option<BacklightColor>,
    resets: usize,
    parser: ParseState,
    pending_reply: VecDeque<u8>,
    writes: Vec<Vec<u8>>,
    disconnect_after: Option<usize>,
}

/// Position within the command currently being received.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseState {
    Idle,
    Cursor,
    CursorValue { axis: Axis, digits: Vec<u8> },
    Attribute,
    Backlight,
    Text(Vec<u8>),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Axis {
    Col,
    Row,
}

impl VirtualTerminal {
    /// Creates a new `VirtualTerminal` with the given dimensions, which it reports truthfully.
    ///
    /// # Examples
    ///
    /// ```
    /// # use unolcd_testing::VirtualTerminal;
    /// let terminal = VirtualTerminal::new(20, 4);
    /// assert_eq!(4, terminal.lines().len());
    /// ```
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width as usize, height as usize);
        VirtualTerminal {
            width,
            height,
            width_reply: AttributeReply::Value(width as u32),
            height_reply: AttributeReply::Value(height as u32),
            color_reply: AttributeReply::Value(1),
            grid: vec![vec![b' '; width]; height],
            cursor: (0, 0),
            backlight: None,
            resets: 0,
            parser: ParseState::Idle,
            pending_reply: VecDeque::new(),
            writes: vec![],
            disconnect_after: None,
        }
    }

    /// Overrides how the width and height queries are answered, independently of the real grid size.
    ///
    /// # Examples
    ///
    /// ```
    /// # use unolcd_testing::{AttributeReply, VirtualTerminal};
    /// // A 16 × 2 terminal with confused firmware.
    /// let terminal = VirtualTerminal::new(16, 2)
    ///     .with_replies(AttributeReply::Raw(b"??\r\n".to_vec()), AttributeReply::Silent);
    /// ```
    pub fn with_replies(mut self, width: AttributeReply, height: AttributeReply) -> Self {
        self.width_reply = width;
        self.height_reply = height;
        self
    }

    /// Makes every write after the first `writes` fail with [`TransportError::Disconnected`],
    /// simulating the cable being pulled.
    ///
    /// # Examples
    ///
    /// ```
    /// # use unolcd_core::{Transport, TransportError};
    /// # use unolcd_testing::VirtualTerminal;
    /// let mut terminal = VirtualTerminal::new(16, 2).disconnect_after(1);
    /// assert!(terminal.write_bytes(b"r").is_ok());
    /// assert!(matches!(terminal.write_bytes(b"bw"), Err(TransportError::Disconnected)));
    /// ```
    pub fn disconnect_after(mut self, writes: usize) -> Self {
        self.disconnect_after = Some(writes);
        self
    }

    /// Returns the contents of a row, including trailing spaces.
    ///
    /// # Panics
    ///
    /// Panics if `row` is outside the grid.
    pub fn line(&self, row: usize) -> String {
        String::from_utf8_lossy(&self.grid[row]).into_owned()
    }

    /// Returns the contents of every row.
    pub fn lines(&self) -> Vec<String> {
        (0..self.height).map(|row| self.line(row)).collect()
    }

    /// Returns the current cursor position as (column, row).
    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    /// Returns the backlight color, or `None` if it has never been set since power on.
    pub fn backlight(&self) -> Option<BacklightColor> {
        self.backlight
    }

    /// Returns how many times the terminal has been reset.
    pub fn resets(&self) -> usize {
        self.resets
    }

    /// Returns the raw bytes of every successful write, one entry per call.
    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }

    /// Feeds a single received byte through the command parser.
    fn receive(&mut self, byte: u8) {
        let state = mem::replace(&mut self.parser, ParseState::Idle);
        self.parser = match state {
            ParseState::Idle => match byte {
                b'r' => self.execute(Command::Reset),
                b'd' => self.execute(Command::Clear),
                b'h' => self.execute(Command::Home),
                b'c' => ParseState::Cursor,
                b'a' => ParseState::Attribute,
                b'b' => ParseState::Backlight,
                b'p' => ParseState::Text(vec![]),
                _ => {
                    warn!("Vterm ignoring unknown opcode 0x{:02X}", byte);
                    ParseState::Idle
                }
            },

            ParseState::Cursor => match byte {
                b'c' => ParseState::CursorValue { axis: Axis::Col, digits: vec![] },
                b'r' => ParseState::CursorValue { axis: Axis::Row, digits: vec![] },
                _ => {
                    warn!("Vterm ignoring unknown cursor axis 0x{:02X}", byte);
                    ParseState::Idle
                }
            },

            ParseState::CursorValue { axis, mut digits } => {
                if byte.is_ascii_digit() {
                    digits.push(byte);
                    ParseState::CursorValue { axis, digits }
                } else {
                    // A non-digit ends the number and begins the next command.
                    self.finish_cursor(axis, &digits);
                    self.receive(byte);
                    mem::replace(&mut self.parser, ParseState::Idle)
                }
            }

            ParseState::Attribute => {
                match TerminalAttribute::from_byte(byte) {
                    Some(attribute) => {
                        let _ = self.execute(Command::GetAttribute(attribute));
                    }
                    None => warn!("Vterm ignoring unknown attribute 0x{:02X}", byte),
                }
                ParseState::Idle
            }

            ParseState::Backlight => {
                match BacklightColor::from_byte(byte) {
                    Some(color) => {
                        let _ = self.execute(Command::SetBacklight(color));
                    }
                    None => warn!("Vterm ignoring unknown color 0x{:02X}", byte),
                }
                ParseState::Idle
            }

            ParseState::Text(mut text) => {
                if byte == b'\n' {
                    if text.last() == Some(&b'\r') {
                        let _ = text.pop();
                    }
                    let width = text.len();
                    let text = String::from_utf8_lossy(&text).into_owned();
                    self.execute(Command::write_string(text, width))
                } else {
                    text.push(byte);
                    ParseState::Text(text)
                }
            }
        };
    }

    /// Completes a cursor command once its digits have been received.
    fn finish_cursor(&mut self, axis: Axis, digits: &[u8]) {
        let value = std::str::from_utf8(digits).ok().and_then(|d| d.parse::<u32>().ok());
        match (axis, value) {
            (Axis::Col, Some(col)) => {
                let _ = self.execute(Command::SetCursor { col: Some(col), row: None });
            }
            (Axis::Row, Some(row)) => {
                let _ = self.execute(Command::SetCursor { col: None, row: Some(row) });
            }
            (_, None) => warn!("Vterm ignoring cursor command without a value"),
        }
    }

    /// Applies a fully-received command and returns the parser to idle.
    fn execute(&mut self, command: Command<'_>) -> ParseState {
        debug!("Vterm command: {}", command);
        match command {
            Command::Reset => {
                info!("Vterm reset");
                self.resets += 1;
                self.backlight = None;
                self.blank();
            }
            Command::Clear => self.blank(),
            Command::Home => self.cursor = (0, 0),
            Command::SetCursor { col, row } => {
                if let Some(col) = col {
                    self.cursor.0 = (col as usize).min(self.width);
                }
                if let Some(row) = row {
                    self.cursor.1 = (row as usize).min(self.height.saturating_sub(1));
                }
            }
            Command::GetAttribute(attribute) => {
                let reply = match attribute {
                    TerminalAttribute::Width => &self.width_reply,
                    TerminalAttribute::Height => &self.height_reply,
                    TerminalAttribute::HasColor => &self.color_reply,
                };
                let bytes = match *reply {
                    AttributeReply::Value(value) => format!("{}\r\n", value).into_bytes(),
                    AttributeReply::Raw(ref bytes) => bytes.clone(),
                    AttributeReply::Silent => vec![],
                };
                self.pending_reply.extend(bytes);
            }
            Command::WriteString { ref text, .. } => {
                let (col, row) = self.cursor;
                let visible = text.as_bytes().iter().take(self.width.saturating_sub(col));
                for (offset, &byte) in visible.enumerate() {
                    self.grid[row][col + offset] = byte;
                }
                self.cursor.0 = (col + text.len()).min(self.width);
            }
            Command::SetBacklight(color) => {
                info!("Vterm backlight {}", color);
                self.backlight = Some(color);
            }
        }
        ParseState::Idle
    }

    /// Blanks the grid and homes the cursor.
    fn blank(&mut self) {
        for row in &mut self.grid {
            row.iter_mut().for_each(|cell| *cell = b' ');
        }
        self.cursor = (0, 0);
    }
}

impl Transport for VirtualTerminal {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        if let Some(limit) = self.disconnect_after {
            if self.writes.len() >= limit {
                return Err(TransportError::Disconnected);
            }
        }

        self.writes.push(bytes.to_vec());
        for &byte in bytes {
            self.receive(byte);
        }
        Ok(())
    }

    /// Returns the next pending reply line, or `None` as if the read timed out.
    fn read_line(&mut self, _: Duration) -> Result<Option<Vec<u8>>, TransportError> {
        if self.pending_reply.is_empty() {
            return Ok(None);
        }

        let end = self
            .pending_reply
            .iter()
            .position(|&b| b == b'\n')
            .map_or(self.pending_reply.len(), |index| index + 1);
        Ok(Some(self.pending_reply.drain(..end).collect()))
    }
}

use std::time::Duration;

use log::{debug, info, warn};

use crate::core::{
    parse_attribute_response, AttributeError, BacklightColor, Clock, Command, Geometry, StopHandle, SystemClock,
    TerminalAttribute, Transport, TransportError,
};
use crate::{Rotation, RunConfig};

/// How long to wait for the terminal to answer an attribute query.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(1);

/// A session with a single terminal over an exclusively-owned transport.
///
/// A session starts with a [`handshake`](Self::handshake) that resets the terminal, sets the
/// backlight, and asks for the display size, then [`run`](Self::run)s the render loop until
/// stopped or until the transport fails. The transport is released when the `Terminal` is dropped.
///
/// # Examples
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use unolcd::{BacklightColor, Terminal};
/// use unolcd_testing::{ManualClock, VirtualTerminal};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let device = Rc::new(RefCell::new(VirtualTerminal::new(20, 4)));
/// let mut terminal = Terminal::new(device.clone(), ManualClock::new());
///
/// let geometry = terminal.handshake(BacklightColor::White)?;
/// assert_eq!((20, 4), (geometry.width(), geometry.height()));
///
/// terminal.render(&["Hello", "world"])?;
/// assert_eq!("world", device.borrow().line(1).trim_end());
/// #
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct Terminal<T: Transport, C: Clock = SystemClock> {
    transport: T,
    clock: C,
    geometry: Geometry,
}

impl<T: Transport, C: Clock> Terminal<T, C> {
    /// Creates a new `Terminal` over the given transport.
    ///
    /// Nothing is sent until [`handshake`](Self::handshake); until then the
    /// geometry is assumed to be [`Geometry::DEFAULT`].
    pub fn new(transport: T, clock: C) -> Self {
        Terminal {
            transport,
            clock,
            geometry: Geometry::DEFAULT,
        }
    }

    /// Resets the terminal, sets the backlight, and resolves its geometry.
    ///
    /// Each dimension the terminal fails to report (no answer within [`QUERY_TIMEOUT`],
    /// or an answer that is not a decimal number between 1 and [`Geometry::MAX_DIMENSION`])
    /// falls back to the default independently of the other.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the transport fails. Bad or missing answers are not errors.
    pub fn handshake(&mut self, backlight: BacklightColor) -> Result<Geometry, TransportError> {
        self.send(&Command::Reset)?;
        self.send(&Command::SetBacklight(backlight))?;

        let width = self.query(TerminalAttribute::Width)?;
        let height = self.query(TerminalAttribute::Height)?;
        self.geometry = Geometry::from_responses(width.clone(), height.clone());
        warn_on_fallback("width", &width, self.geometry.width());
        warn_on_fallback("height", &height, self.geometry.height());
        info!("Terminal geometry is {}", self.geometry);
        Ok(self.geometry)
    }

    /// Draws one frame.
    ///
    /// Homes the cursor, then writes each line on its own row, padded to the display width so
    /// that stale characters from a previous, longer line are overwritten. Lines wider than the
    /// display are cut at the last whole character that fits, and lines beyond the last row
    /// are dropped.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the transport fails.
    pub fn render<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<(), TransportError> {
        self.send(&Command::Home)?;
        self.write_rows(lines)
    }

    /// Writes each line on its own row, starting from the top.
    fn write_rows<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<(), TransportError> {
        let width = self.geometry.width() as usize;
        let height = self.geometry.height() as usize;
        if lines.len() > height {
            debug!("Dropping {} lines that don't fit on a {} display", lines.len() - height, self.geometry);
        }

        for (row, line) in lines.iter().take(height).enumerate() {
            self.send(&Command::set_row(row as u32))?;
            self.send(&Command::write_string(fit_to_width(line.as_ref(), width), width))?;
        }
        Ok(())
    }

    /// Runs the render loop until `stop` is triggered.
    ///
    /// Each iteration picks the active provider (rotating after the change interval),
    /// homes the cursor, draws the provider's lines, and sleeps for the update interval.
    /// Home goes out before the provider is asked for its lines. The stop request is
    /// checked before each iteration, so it takes effect after the current sleep.
    ///
    /// Does not perform the handshake; call [`handshake`](Self::handshake) first.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the transport fails, which ends the session.
    pub fn run(&mut self, config: &mut RunConfig, stop: &StopHandle) -> Result<(), TransportError> {
        let mut rotation = Rotation::new(config.providers().len(), config.change_interval(), self.clock.now());

        while !stop.is_stopped() {
            let previous = rotation.current();
            let index = rotation.tick(self.clock.now());
            if index != previous {
                info!("Switching to output {}", config.providers()[index].name());
            }

            self.send(&Command::Home)?;
            let lines = config.provider_mut(index).lines();
            self.write_rows(&lines)?;
            self.clock.sleep(config.update_interval());
        }

        info!("Stop requested, ending session");
        Ok(())
    }

    /// Returns the geometry resolved by the last handshake.
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Ends the session and gives back the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Sends a single command.
    fn send(&mut self, command: &Command<'_>) -> Result<(), TransportError> {
        debug!("Command: {}", command);
        self.transport.write_bytes(&command.to_bytes())
    }

    /// Asks for an attribute and decodes the answer, keeping decode failures separate from transport failures.
    fn query(&mut self, attribute: TerminalAttribute) -> Result<Result<u32, AttributeError>, TransportError> {
        self.send(&Command::GetAttribute(attribute))?;
        let reply = self.transport.read_line(QUERY_TIMEOUT)?;
        debug!("Reply: {:?}", reply.as_deref().map(String::from_utf8_lossy));
        Ok(reply
            .ok_or(AttributeError::Timeout)
            .and_then(|bytes| parse_attribute_response(&bytes)))
    }
}

fn warn_on_fallback(dimension: &str, reply: &Result<u32, AttributeError>, resolved: u32) {
    match reply {
        Err(e) => warn!("Couldn't read terminal {} ({}), assuming {}", dimension, e, resolved),
        Ok(value) if *value != resolved => warn!("Terminal reported {} {}, assuming {}", dimension, value, resolved),
        Ok(_) => {}
    }
}

/// Shortens `line` to at most `width` bytes without splitting a character.
fn fit_to_width(line: &str, width: usize) -> &str {
    if line.len() <= width {
        return line;
    }

    let mut end = width;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    &line[..end]
}

use std::time::Duration;

use serial_core as serial;
use serial_core::prelude::*;

/// The only line rate the terminal firmware supports.
pub const BAUD_RATE: serial::BaudRate = serial::Baud9600;

/// Configures the given serial port appropriately for use with an Uno LCD Terminal.
///
/// Specifically, the terminal requires 8N1 format at 9600 baud with no flow control.
/// Also sets the provided timeout value.
///
/// # Errors
///
/// Returns the underlying [`serial_core::Error`] if the port rejects the settings.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let mut port = serial::open("/dev/ttyACM0")?;
/// unolcd_serial::configure_port(&mut port, Duration::from_secs(1))?;
/// // Now ready for communication with a terminal (8N1 9600 baud).
/// #
/// # Ok(()) }
/// ```
pub fn configure_port<P: SerialPort>(port: &mut P, timeout: Duration) -> serial::Result<()> {
    port.reconfigure(&|settings| {
        settings.set_baud_rate(BAUD_RATE)?;
        settings.set_char_size(serial::Bits8);
        settings.set_parity(serial::ParityNone);
        settings.set_stop_bits(serial::Stop1);
        settings.set_flow_control(serial::FlowNone);
        Ok(())
    })?;
    port.set_timeout(timeout)?;
    Ok(())
}

use std::time::Duration;

use serial_core::SerialDevice;

use unolcd::core::{SystemClock, Transport, TransportError};
use unolcd::serial::PORT_TIMEOUT;
use unolcd::{BacklightColor, Geometry, SerialTransport, Terminal};

mod mock_serial_port;
use crate::mock_serial_port::{MockSerialPort, SerialFailure};

const TIMEOUT: Duration = Duration::from_secs(1);

#[test]
fn port_configured() {
    let transport = SerialTransport::try_new(MockSerialPort::new(vec![], SerialFailure::None)).unwrap();
    let settings = transport.port().read_settings().unwrap();
    assert_eq!(serial_core::BaudRate::Baud9600, settings.baud_rate);
    assert_eq!(serial_core::CharSize::Bits8, settings.char_size);
    assert_eq!(serial_core::Parity::ParityNone, settings.parity);
    assert_eq!(serial_core::StopBits::Stop1, settings.stop_bits);
    assert_eq!(serial_core::FlowControl::FlowNone, settings.flow_control);
    assert_eq!(PORT_TIMEOUT, transport.port().timeout());
}

#[test]
fn configuration_failure() {
    let result = SerialTransport::try_new(MockSerialPort::new(vec![], SerialFailure::WriteSettings));
    assert!(matches!(result, Err(TransportError::Io { .. })));
}

#[test]
fn writes_in_order() {
    let mut transport = SerialTransport::try_new(MockSerialPort::new(vec![], SerialFailure::None)).unwrap();
    transport.write_bytes(b"h").unwrap();
    transport.write_bytes(b"cr0").unwrap();
    transport.write_bytes(b"pHi\r\n").unwrap();
    assert_eq!(b"hcr0pHi\r\n", transport.port().written());
}

#[test]
fn reads_one_line_at_a_time() {
    let port = MockSerialPort::new(b"20\r\n4\r\n".to_vec(), SerialFailure::None);
    let mut transport = SerialTransport::try_new(port).unwrap();

    assert_eq!(Some(b"20\r\n".to_vec()), transport.read_line(TIMEOUT).unwrap());
    assert_eq!(Some(b"4\r\n".to_vec()), transport.read_line(TIMEOUT).unwrap());
    assert_eq!(None, transport.read_line(TIMEOUT).unwrap());
    transport.port().done();
}

#[test]
fn partial_line_returned_on_timeout() {
    let port = MockSerialPort::new(b"16".to_vec(), SerialFailure::None);
    let mut transport = SerialTransport::try_new(port).unwrap();
    assert_eq!(Some(b"16".to_vec()), transport.read_line(TIMEOUT).unwrap());
}

#[test]
fn read_timeout_applied_to_port() {
    let port = MockSerialPort::new(vec![], SerialFailure::None);
    let mut transport = SerialTransport::try_new(port).unwrap();
    let _ = transport.read_line(Duration::from_millis(300)).unwrap();
    assert_eq!(Duration::from_millis(300), transport.port().timeout());
}

#[test]
fn read_failure() {
    let port = MockSerialPort::new(vec![], SerialFailure::Read);
    let mut transport = SerialTransport::try_new(port).unwrap();
    assert!(matches!(transport.read_line(TIMEOUT), Err(TransportError::Io { .. })));
}

#[test]
fn unplugged() {
    let port = MockSerialPort::new(vec![], SerialFailure::Unplugged);
    let mut transport = SerialTransport::try_new(port).unwrap();
    assert!(matches!(transport.write_bytes(b"r"), Err(TransportError::Disconnected)));
    assert!(matches!(transport.read_line(TIMEOUT), Err(TransportError::Disconnected)));
}

#[test]
fn handshake_over_serial() {
    let port = MockSerialPort::new(b"20\r\n4\r\n".to_vec(), SerialFailure::None);
    let transport = SerialTransport::try_new(port).unwrap();
    let mut terminal = Terminal::new(transport, SystemClock);

    let geometry = terminal.handshake(BacklightColor::White).unwrap();
    assert_eq!(Geometry::try_new(20, 4), Some(geometry));

    terminal.render(&["Hello"]).unwrap();
    let transport = terminal.into_transport();
    assert_eq!(&b"rbwawahhcr0pHello               \r\n"[..], transport.port().written());
    transport.port().done();
}

#[test]
fn handshake_over_silent_serial() {
    let port = MockSerialPort::new(vec![], SerialFailure::None);
    let transport = SerialTransport::try_new(port).unwrap();
    let mut terminal = Terminal::new(transport, SystemClock);
    assert_eq!(Geometry::DEFAULT, terminal.handshake(BacklightColor::White).unwrap());
}

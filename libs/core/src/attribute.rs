use std::str;

use thiserror::Error;

/// Errors related to decoding the terminal's reply to a [`GetAttribute`](crate::Command::GetAttribute) query.
///
/// These are never fatal: the caller is expected to substitute a default value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AttributeError {
    /// The terminal did not answer before the read timed out.
    #[error("Terminal did not answer the attribute query in time")]
    Timeout,

    /// The reply was not valid UTF-8.
    #[error("Attribute reply {:?} is not valid UTF-8", bytes)]
    NotUtf8 {
        /// The raw reply.
        bytes: Vec<u8>,
    },

    /// The reply was not a decimal integer.
    #[error("Attribute reply {:?} is not a decimal integer", response)]
    NotANumber {
        /// The reply, with surrounding whitespace removed.
        response: String,
    },

    /// The reply was zero, which is never a usable dimension.
    #[error("Attribute reply was zero")]
    Zero,
}

/// An attribute of the terminal that can be queried with [`GetAttribute`](crate::Command::GetAttribute).
///
/// # Examples
///
/// ```
/// use unolcd_core::TerminalAttribute;
///
/// assert_eq!(b'w', TerminalAttribute::Width.to_byte());
/// assert_eq!(Some(TerminalAttribute::Height), TerminalAttribute::from_byte(b'h'));
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TerminalAttribute {
    /// Number of character columns.
    Width,
    /// Number of character rows.
    Height,
    /// Whether the backlight supports color (reported as `0` or `1`).
    HasColor,
}

impl TerminalAttribute {
    /// Returns the protocol byte identifying this attribute.
    pub fn to_byte(self) -> u8 {
        match self {
            TerminalAttribute::Width => b'w',
            TerminalAttribute::Height => b'h',
            TerminalAttribute::HasColor => b'c',
        }
    }

    /// Looks up the attribute identified by a protocol byte, if any.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'w' => Some(TerminalAttribute::Width),
            b'h' => Some(TerminalAttribute::Height),
            b'c' => Some(TerminalAttribute::HasColor),
            _ => None,
        }
    }
}

/// Decodes the terminal's reply to an attribute query as a positive decimal integer.
///
/// Surrounding ASCII whitespace (including the trailing CRLF) is ignored.
///
/// # Errors
///
/// Returns:
/// * [`AttributeError::NotUtf8`] if the reply is not valid UTF-8.
/// * [`AttributeError::NotANumber`] if the reply is not a decimal integer.
/// * [`AttributeError::Zero`] if the reply is `0`.
///
/// # Examples
///
/// ```
/// use unolcd_core::{parse_attribute_response, AttributeError};
///
/// assert_eq!(Ok(20), parse_attribute_response(b"20\r\n"));
/// assert!(matches!(parse_attribute_response(b"??\r\n"), Err(AttributeError::NotANumber { .. })));
/// ```
pub fn parse_attribute_response(bytes: &[u8]) -> Result<u32, AttributeError> {
    let text = str::from_utf8(bytes).map_err(|_| AttributeError::NotUtf8 { bytes: bytes.into() })?;
    let text = text.trim();

    // u32's parser would also accept a leading '+', which the device never sends.
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AttributeError::NotANumber { response: text.into() });
    }

    match text.parse::<u32>() {
        Ok(0) => Err(AttributeError::Zero),
        Ok(value) => Ok(value),
        Err(_) => Err(AttributeError::NotANumber { response: text.into() }),
    }
}

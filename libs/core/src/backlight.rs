use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

/// Error returned when a color name does not match any [`BacklightColor`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown backlight color {:?}", name)]
pub struct UnknownColorError {
    /// The name that failed to parse.
    pub name: String,
}

/// A color the terminal's backlight can be set to with [`SetBacklight`](crate::Command::SetBacklight).
///
/// Terminals without an RGB backlight treat every color other than [`Off`](BacklightColor::Off) as "on".
///
/// # Examples
///
/// ```
/// use unolcd_core::BacklightColor;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let color: BacklightColor = "Teal".parse()?;
/// assert_eq!(BacklightColor::Teal, color);
/// assert_eq!(b't', color.to_byte());
/// #
/// # Ok(()) }
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum BacklightColor {
    /// Backlight off.
    Off,
    /// Red.
    Red,
    /// Yellow.
    Yellow,
    /// Green.
    Green,
    /// Teal.
    Teal,
    /// Blue.
    Blue,
    /// Violet.
    Violet,
    /// White, the baseline set during every handshake.
    #[default]
    White,
}

impl BacklightColor {
    /// Every color, in protocol order.
    pub const ALL: [BacklightColor; 8] = [
        BacklightColor::Off,
        BacklightColor::Red,
        BacklightColor::Yellow,
        BacklightColor::Green,
        BacklightColor::Teal,
        BacklightColor::Blue,
        BacklightColor::Violet,
        BacklightColor::White,
    ];

    /// Returns the protocol byte identifying this color.
    pub fn to_byte(self) -> u8 {
        match self {
            BacklightColor::Off => b'o',
            BacklightColor::Red => b'r',
            BacklightColor::Yellow => b'y',
            BacklightColor::Green => b'g',
            BacklightColor::Teal => b't',
            BacklightColor::Blue => b'b',
            BacklightColor::Violet => b'v',
            BacklightColor::White => b'w',
        }
    }

    /// Looks up the color identified by a protocol byte, if any.
    pub fn from_byte(byte: u8) -> Option<Self> {
        BacklightColor::ALL.iter().copied().find(|color| color.to_byte() == byte)
    }

    /// Returns the lowercase name of this color.
    pub fn name(self) -> &'static str {
        match self {
            BacklightColor::Off => "off",
            BacklightColor::Red => "red",
            BacklightColor::Yellow => "yellow",
            BacklightColor::Green => "green",
            BacklightColor::Teal => "teal",
            BacklightColor::Blue => "blue",
            BacklightColor::Violet => "violet",
            BacklightColor::White => "white",
        }
    }
}

impl Display for BacklightColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BacklightColor {
    type Err = UnknownColorError;

    /// Parses a color from its name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BacklightColor::ALL
            .iter()
            .copied()
            .find(|color| color.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownColorError { name: s.into() })
    }
}

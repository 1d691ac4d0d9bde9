use std::fmt::{self, Display, Formatter};

use crate::AttributeError;

/// The character grid of a terminal, in columns and rows.
///
/// Both dimensions are always between 1 and [`Geometry::MAX_DIMENSION`]. Resolved once per session from the terminal's
/// answers to the width and height queries, falling back to [`Geometry::DEFAULT`] for
/// any dimension the terminal fails to report.
///
/// # Examples
///
/// ```
/// use unolcd_core::{AttributeError, Geometry};
///
/// let geometry = Geometry::from_responses(Ok(20), Err(AttributeError::Timeout));
/// assert_eq!(20, geometry.width());
/// assert_eq!(2, geometry.height());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Geometry {
    width: u32,
    height: u32,
}

impl Geometry {
    /// The geometry assumed when the terminal does not report one: 16 × 2.
    pub const DEFAULT: Geometry = Geometry { width: 16, height: 2 };

    /// The largest width or height accepted from a terminal.
    ///
    /// Character LCD controllers top out well below this, so a larger reply is line noise.
    pub const MAX_DIMENSION: u32 = 255;

    /// Creates a `Geometry`, or `None` if either dimension is zero or above [`MAX_DIMENSION`](Self::MAX_DIMENSION).
    ///
    /// # Examples
    ///
    /// ```
    /// # use unolcd_core::Geometry;
    /// assert!(Geometry::try_new(20, 4).is_some());
    /// assert!(Geometry::try_new(0, 4).is_none());
    /// assert!(Geometry::try_new(20, 4_000_000).is_none());
    /// ```
    pub fn try_new(width: u32, height: u32) -> Option<Self> {
        if is_plausible(width) && is_plausible(height) {
            Some(Geometry { width, height })
        } else {
            None
        }
    }

    /// Builds a `Geometry` from decoded attribute replies, substituting the default
    /// for each dimension independently when its reply could not be used.
    pub fn from_responses(width: Result<u32, AttributeError>, height: Result<u32, AttributeError>) -> Self {
        Geometry {
            width: width.ok().filter(|&w| is_plausible(w)).unwrap_or(Self::DEFAULT.width),
            height: height.ok().filter(|&h| is_plausible(h)).unwrap_or(Self::DEFAULT.height),
        }
    }

    /// Returns the number of columns.
    pub fn width(self) -> u32 {
        self.width
    }

    /// Returns the number of rows.
    pub fn height(self) -> u32 {
        self.height
    }
}

fn is_plausible(dimension: u32) -> bool {
    (1..=Geometry::MAX_DIMENSION).contains(&dimension)
}

impl Default for Geometry {
    fn default() -> Self {
        Geometry::DEFAULT
    }
}

impl Display for Geometry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

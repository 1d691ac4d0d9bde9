use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::iter;

/// Displays an error followed by each of its sources, separated by `": "`.
///
/// # Examples
///
/// ```
/// use std::io;
/// use unolcd::{ErrorChain, TransportError};
///
/// let error = TransportError::from(io::Error::new(io::ErrorKind::Other, "cable cut"));
/// assert_eq!("Failed reading/writing the transport: cable cut", ErrorChain(&error).to_string());
/// ```
#[derive(Debug, Copy, Clone)]
pub struct ErrorChain<'a>(pub &'a dyn Error);

impl Display for ErrorChain<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let chain = iter::successors(Some(self.0), |&e| e.source());
        for (i, error) in chain.enumerate() {
            if i > 0 {
                f.write_str(": ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

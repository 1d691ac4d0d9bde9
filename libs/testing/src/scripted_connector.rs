use std::collections::VecDeque;

use log::info;

use unolcd_core::{Connector, Transport, TransportError};

/// A [`Connector`] that hands out a predetermined sequence of connection results.
///
/// Once the script runs out, every further attempt fails with [`TransportError::Open`].
///
/// # Examples
///
/// ```
/// use unolcd_core::{Connector, TransportError};
/// use unolcd_testing::{ScriptedConnector, VirtualTerminal};
///
/// let mut connector = ScriptedConnector::new(
///     "virtual",
///     vec![Err(TransportError::Disconnected), Ok(VirtualTerminal::new(16, 2))],
/// );
///
/// assert!(connector.connect().is_err());
/// assert!(connector.connect().is_ok());
/// assert!(connector.connect().is_err());
/// assert_eq!(3, connector.attempts());
/// ```
#[derive(Debug)]
pub struct ScriptedConnector<T: Transport> {
    target: String,
    script: VecDeque<Result<T, TransportError>>,
    attempts: usize,
}

impl<T: Transport> ScriptedConnector<T> {
    /// Creates a new `ScriptedConnector` that reports the given target and yields `script` in order.
    pub fn new<S, I>(target: S, script: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = Result<T, TransportError>>,
    {
        ScriptedConnector {
            target: target.into(),
            script: script.into_iter().collect(),
            attempts: 0,
        }
    }

    /// Returns how many times [`connect`](Connector::connect) has been called.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Returns the number of scripted results not yet handed out.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl<T: Transport> Connector for ScriptedConnector<T> {
    type Transport = T;

    fn connect(&mut self) -> Result<T, TransportError> {
        self.attempts += 1;
        info!("Scripted connection attempt {} to {}", self.attempts, self.target);
        self.script.pop_front().unwrap_or_else(|| {
            Err(TransportError::Open {
                target: self.target.clone(),
                source: "connection script exhausted".into(),
            })
        })
    }

    fn target(&self) -> &str {
        &self.target
    }
}

//! Error type for statboard-core

use thiserror::Error;

/// Result type alias for statboard-core operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// The single failure kind for an encoding session.
///
/// Every way a session can go wrong - an operation called in the wrong
/// state, a row with the wrong number of values, a sink that stops
/// accepting bytes - is reported through this one type, because the remedy
/// is always the same: discard the session and its partial output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("tabular stream error: {message}")]
pub struct ProtocolError {
    message: String,
}

impl ProtocolError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Description of the rule that was violated.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for ProtocolError {
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("sink write failed: {err}"))
    }
}

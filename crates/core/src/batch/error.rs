//! Error types for the batch module.

use thiserror::Error;

use crate::session::SessionError;

/// Errors that prevent a pass from running.
///
/// Per-item failures never surface here; they are recorded on the item.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Another pass holds the session.
    #[error("A conversion pass is already running")]
    AlreadyRunning,

    /// The session rejected the pass.
    #[error("Session error: {0}")]
    Session(SessionError),
}

impl From<SessionError> for BatchError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::ConversionInProgress => Self::AlreadyRunning,
            other => Self::Session(other),
        }
    }
}

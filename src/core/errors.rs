use std::fmt::{self, Display};

use crate::connections::errors::ConnectionError;

/// Why a session-level operation failed.
#[derive(Debug)]
pub enum SessionError {
    /// A profile name did not resolve; no transport was created.
    ProfileNotFound(String),
    /// A stateful operation was called without a prior successful connect.
    NoActiveSession,
    Transport(ConnectionError),
}

impl From<ConnectionError> for SessionError {
    fn from(err: ConnectionError) -> SessionError {
        SessionError::Transport(err)
    }
}

impl Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::ProfileNotFound(name) => write!(f, "Profile '{}' not found.", name),
            SessionError::NoActiveSession => {
                write!(f, "No active session. Connect to an FTP server first.")
            }
            SessionError::Transport(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

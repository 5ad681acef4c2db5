use std::fmt::{self, Display};

/// Errors raised while reading, writing or querying connection profiles.
#[derive(Debug)]
pub enum StoreError {
    IoError(std::io::Error),
    /// The profile document is not well-formed or has the wrong shape.
    Document(String),
    ProfileNotFound(String),
    InvalidProfile(String),
    /// No user-level location could be resolved; profiles live in memory only.
    NoConfigPath,
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> StoreError {
        StoreError::IoError(err)
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::IoError(e) => write!(f, "IO error: {}", e),
            StoreError::Document(msg) => write!(f, "Invalid profile document: {}", msg),
            StoreError::ProfileNotFound(name) => write!(f, "Profile '{}' not found.", name),
            StoreError::InvalidProfile(msg) => write!(f, "Invalid profile: {}", msg),
            StoreError::NoConfigPath => write!(f, "No user configuration directory available"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

use std::fmt::{self, Display};

/// A central error enum for transport-related errors.
#[derive(Debug)]
pub enum ConnectionError {
    IoError(std::io::Error),
    /// The FTP engine rejected a command or the control/data channel failed.
    FtpError(String),
    TlsError(String),
    InvalidHost(String),
    NotConnected,
}

/// Convert from std::io::Error.
impl From<std::io::Error> for ConnectionError {
    fn from(err: std::io::Error) -> ConnectionError {
        ConnectionError::IoError(err)
    }
}

/// Convert from suppaftp::FtpError.
/// Without this, `?` on suppaftp calls won't work inside `FtpConnection`.
impl From<suppaftp::FtpError> for ConnectionError {
    fn from(err: suppaftp::FtpError) -> Self {
        ConnectionError::FtpError(err.to_string())
    }
}

#[cfg(feature = "tls")]
impl From<suppaftp::native_tls::Error> for ConnectionError {
    fn from(err: suppaftp::native_tls::Error) -> Self {
        ConnectionError::TlsError(err.to_string())
    }
}

impl Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionError::IoError(e) => write!(f, "IO error: {}", e),
            ConnectionError::FtpError(msg) => write!(f, "FTP error: {}", msg),
            ConnectionError::TlsError(msg) => write!(f, "TLS error: {}", msg),
            ConnectionError::InvalidHost(host) => write!(f, "Invalid host: '{}'", host),
            ConnectionError::NotConnected => write!(f, "Not connected"),
        }
    }
}

impl std::error::Error for ConnectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConnectionError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

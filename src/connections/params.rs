use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Everything needed to open one transport connection.
///
/// The fields are wiped when the value is dropped, so a cached session
/// does not leave the password behind in freed memory.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ConnectionParams {
    pub host: String,
    pub username: String,
    pub password: String,
    pub use_ssl: bool,
}

impl ConnectionParams {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        use_ssl: bool,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            use_ssl,
        }
    }
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"***")
            .field("use_ssl", &self.use_ssl)
            .finish()
    }
}

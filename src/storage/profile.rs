use std::fmt;

use crate::connections::params::ConnectionParams;

/// A user-named FTP connection preset.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct ConnectionProfile {
    pub name: String,
    pub host: String,
    pub username: String,
    pub password: String,
    pub use_ssl: bool,
}

impl ConnectionProfile {
    pub fn new(
        name: impl Into<String>,
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        use_ssl: bool,
    ) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            username: username.into(),
            password: password.into(),
            use_ssl,
        }
    }

    /// Returns the unique, human-readable identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parameters needed to open a transport for this profile.
    pub fn params(&self) -> ConnectionParams {
        ConnectionParams::new(
            self.host.as_str(),
            self.username.as_str(),
            self.password.as_str(),
            self.use_ssl,
        )
    }
}

impl fmt::Debug for ConnectionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionProfile")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"***")
            .field("use_ssl", &self.use_ssl)
            .finish()
    }
}

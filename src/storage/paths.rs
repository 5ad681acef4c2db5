use directories::BaseDirs;
use std::env;
use std::path::PathBuf;

/// File name used at both configuration levels.
pub const CONFIG_FILE: &str = "connections.xml";
/// Product sub-directory under the per-user config directory.
pub const PRODUCT_DIR: &str = "FtpBridge";

/// The two places profiles are read from.
///
/// `application` holds shipped defaults and is never written;
/// `user` holds overrides and receives every save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorePaths {
    pub application: Option<PathBuf>,
    pub user: Option<PathBuf>,
}

impl StorePaths {
    pub fn new(application: impl Into<PathBuf>, user: impl Into<PathBuf>) -> Self {
        Self {
            application: Some(application.into()),
            user: Some(user.into()),
        }
    }

    /// `connections.xml` next to the running binary, and
    /// `~/.config/FtpBridge/connections.xml` on Linux, `%APPDATA%\FtpBridge\connections.xml`
    /// on Windows, `~/Library/Application Support/FtpBridge/connections.xml` on macOS.
    pub fn discover() -> Self {
        Self {
            application: application_config_path(),
            user: user_config_path(),
        }
    }
}

pub fn application_config_path() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    exe.parent().map(|dir| dir.join(CONFIG_FILE))
}

pub fn user_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|d| d.config_dir().join(PRODUCT_DIR).join(CONFIG_FILE))
}

#![allow(dead_code)]

pub mod fake_transport;

use ftp_bridge::storage::{ProfileStore, StorePaths};
use log::LevelFilter;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Logs will appear only when you run with `-- --nocapture` or when the test fails.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// An application-level and a user-level location inside a fresh temp dir.
/// The user-level file sits in a sub-directory that does not exist yet.
pub struct ConfigDirs {
    pub root: TempDir,
    pub application: PathBuf,
    pub user: PathBuf,
}

impl ConfigDirs {
    pub fn new() -> anyhow::Result<Self> {
        let root = tempfile::tempdir()?;
        let application = root.path().join("bin").join("connections.xml");
        let user = root.path().join("appdata").join("FtpBridge").join("connections.xml");
        fs::create_dir_all(application.parent().expect("application dir"))?;
        Ok(Self {
            root,
            application,
            user,
        })
    }

    pub fn paths(&self) -> StorePaths {
        StorePaths::new(&self.application, &self.user)
    }

    /// Equivalent of starting the process again.
    pub fn open_store(&self) -> ProfileStore {
        ProfileStore::open(self.paths())
    }
}

/// Build a `connections.xml` document from `(name, host, user, password, ssl)` rows.
pub fn profile_document(rows: &[(&str, &str, &str, &str, bool)]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<FtpConnections>\n");
    for (name, host, user, password, ssl) in rows {
        xml.push_str(&format!(
            "  <Profile name=\"{name}\">\n    <Host>{host}</Host>\n    <Username>{user}</Username>\n    <Password>{password}</Password>\n    <UseSsl>{ssl}</UseSsl>\n  </Profile>\n"
        ));
    }
    xml.push_str("</FtpConnections>\n");
    xml
}

pub fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

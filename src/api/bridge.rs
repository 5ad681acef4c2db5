use log::info;
use std::path::Path;
use std::sync::Arc;

use super::status::{failure, guarded, report, success};
use crate::connections::params::ConnectionParams;
use crate::connections::transport::TransportFactory;
use crate::core::session_executor::SessionExecutor;
use crate::storage::profile::ConnectionProfile;
use crate::storage::store::{Persistence, ProfileStore};

/// The only value `set_save_location` accepts (case-insensitive).
pub const APPLICATION_LOCATION: &str = "Application";

/// Host-facing FTP surface that never fails by unwinding.
///
/// Every method returns a status string beginning with `SUCCESS: ` or
/// `ERROR: `. Methods that produce a list fill the `&mut Vec<String>` they are
/// given; it is left empty on failure.
pub struct FtpBridge {
    executor: SessionExecutor,
}

impl Default for FtpBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl FtpBridge {
    /// Real FTP transports, profiles from the default locations.
    pub fn new() -> Self {
        Self::with_store(ProfileStore::open_default())
    }

    pub fn with_store(store: ProfileStore) -> Self {
        Self {
            executor: SessionExecutor::with_ftp(Arc::new(store)),
        }
    }

    pub fn with_parts(factory: Arc<dyn TransportFactory>, store: Arc<ProfileStore>) -> Self {
        Self {
            executor: SessionExecutor::new(factory, store),
        }
    }

    pub fn executor(&self) -> &SessionExecutor {
        &self.executor
    }

    pub fn profiles(&self) -> &ProfileStore {
        self.executor.profiles()
    }

    // ── Profiles ────────────────────────────────────────────────────────────

    /// Write the current profiles to the per-user application data folder.
    pub fn set_save_location(&self, location: &str) -> String {
        guarded("set_save_location", || {
            if !location.eq_ignore_ascii_case(APPLICATION_LOCATION) {
                return failure("Invalid location specified. Use 'Application'.");
            }
            match self.profiles().persist() {
                Persistence::Written(_) => {
                    success("Profiles will be saved to application data folder.")
                }
                Persistence::InMemoryOnly(e) => failure(format_args!(
                    "Profiles could not be written to the application data folder: {}",
                    e
                )),
            }
        })
    }

    pub fn save_profile(
        &self,
        profile_name: &str,
        host: &str,
        username: &str,
        password: &str,
        use_ssl: bool,
    ) -> String {
        guarded("save_profile", || {
            let profile = ConnectionProfile::new(profile_name, host, username, password, use_ssl);
            match self.profiles().save(profile) {
                Ok(persistence) => persisted(
                    persistence,
                    format_args!("Profile '{}' saved", profile_name),
                ),
                Err(e) => failure(e),
            }
        })
    }

    pub fn delete_profile(&self, profile_name: &str) -> String {
        guarded("delete_profile", || match self.profiles().delete(profile_name) {
            Ok(persistence) => persisted(
                persistence,
                format_args!("Profile '{}' deleted", profile_name),
            ),
            Err(e) => failure(e),
        })
    }

    pub fn list_profiles(&self, profile_names: &mut Vec<String>) -> String {
        profile_names.clear();
        guarded("list_profiles", || {
            profile_names.extend(self.profiles().names());
            success("Profiles retrieved.")
        })
    }

    // ── Connection control ──────────────────────────────────────────────────

    pub fn enable_ssl(&mut self, use_ssl: bool) -> String {
        self.executor.enable_ssl(use_ssl);
        success("SSL configuration updated.")
    }

    /// Connect using the TLS preference set by [`enable_ssl`](Self::enable_ssl).
    pub fn connect(&mut self, host: &str, username: &str, password: &str) -> String {
        guarded("connect", || {
            report(
                self.executor
                    .connect_with_default_ssl(host, username, password),
                "Connected to FTP server.",
            )
        })
    }

    pub fn connect_with_ssl(
        &mut self,
        host: &str,
        username: &str,
        password: &str,
        use_ssl: bool,
    ) -> String {
        guarded("connect", || {
            let params = ConnectionParams::new(host, username, password, use_ssl);
            report(self.executor.connect(params), "Connected to FTP server.")
        })
    }

    pub fn connect_with_profile(&mut self, profile_name: &str) -> String {
        guarded("connect_with_profile", || {
            report(
                self.executor.connect_with_profile(profile_name),
                "Connected to FTP server.",
            )
        })
    }

    pub fn disconnect(&mut self) -> String {
        guarded("disconnect", || {
            self.executor.disconnect();
            success("Disconnected.")
        })
    }

    /// Close the session and wipe its cached credentials.
    pub fn dispose(&mut self) {
        info!("Disposing FTP bridge.");
        self.disconnect();
    }

    // ── Upload ──────────────────────────────────────────────────────────────

    /// Upload over a new connection built from the current session's parameters.
    pub fn upload_file(&self, local_path: &str, remote_path: &str) -> String {
        guarded("upload_file", || {
            report(
                self.executor.upload_file(Path::new(local_path), remote_path),
                "File uploaded.",
            )
        })
    }

    pub fn upload_file_to(
        &self,
        local_path: &str,
        remote_path: &str,
        host: &str,
        username: &str,
        password: &str,
        use_ssl: bool,
    ) -> String {
        guarded("upload_file", || {
            let params = ConnectionParams::new(host, username, password, use_ssl);
            report(
                self.executor
                    .upload_file_with(&params, Path::new(local_path), remote_path),
                "File uploaded.",
            )
        })
    }

    pub fn upload_file_with_profile(
        &self,
        local_path: &str,
        remote_path: &str,
        profile_name: &str,
    ) -> String {
        guarded("upload_file_with_profile", || {
            report(
                self.executor.upload_file_with_profile(
                    profile_name,
                    Path::new(local_path),
                    remote_path,
                ),
                "File uploaded.",
            )
        })
    }

    // ── Download ────────────────────────────────────────────────────────────

    pub fn download_file(&self, remote_path: &str, local_path: &str) -> String {
        guarded("download_file", || {
            report(
                self.executor
                    .download_file(remote_path, Path::new(local_path)),
                "File downloaded.",
            )
        })
    }

    pub fn download_file_from(
        &self,
        remote_path: &str,
        local_path: &str,
        host: &str,
        username: &str,
        password: &str,
        use_ssl: bool,
    ) -> String {
        guarded("download_file", || {
            let params = ConnectionParams::new(host, username, password, use_ssl);
            report(
                self.executor
                    .download_file_with(&params, remote_path, Path::new(local_path)),
                "File downloaded.",
            )
        })
    }

    pub fn download_file_with_profile(
        &self,
        remote_path: &str,
        local_path: &str,
        profile_name: &str,
    ) -> String {
        guarded("download_file_with_profile", || {
            report(
                self.executor.download_file_with_profile(
                    profile_name,
                    remote_path,
                    Path::new(local_path),
                ),
                "File downloaded.",
            )
        })
    }

    // ── Listing ─────────────────────────────────────────────────────────────

    pub fn list_directory(&self, remote_path: &str, files: &mut Vec<String>) -> String {
        files.clear();
        guarded("list_directory", || {
            listed(self.executor.list_directory(remote_path), files)
        })
    }

    pub fn list_directory_on(
        &self,
        remote_path: &str,
        files: &mut Vec<String>,
        host: &str,
        username: &str,
        password: &str,
        use_ssl: bool,
    ) -> String {
        files.clear();
        guarded("list_directory", || {
            let params = ConnectionParams::new(host, username, password, use_ssl);
            listed(self.executor.list_directory_with(&params, remote_path), files)
        })
    }

    pub fn list_directory_with_profile(
        &self,
        remote_path: &str,
        files: &mut Vec<String>,
        profile_name: &str,
    ) -> String {
        files.clear();
        guarded("list_directory_with_profile", || {
            listed(
                self.executor
                    .list_directory_with_profile(profile_name, remote_path),
                files,
            )
        })
    }

    // ── Legacy aliases ──────────────────────────────────────────────────────
    // Kept for callers written against the old lower-case method names.

    pub fn uploadfile(&self, local_path: &str, remote_path: &str) -> String {
        self.upload_file(local_path, remote_path)
    }

    pub fn downloadfile(&self, remote_path: &str, local_path: &str) -> String {
        self.download_file(remote_path, local_path)
    }

    pub fn istdirectory(&self, remote_path: &str, files: &mut Vec<String>) -> String {
        self.list_directory(remote_path, files)
    }
}

impl Drop for FtpBridge {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Success text for a profile change, telling the caller whether it reached disk.
fn persisted(persistence: Persistence, what: std::fmt::Arguments<'_>) -> String {
    match persistence {
        Persistence::Written(_) => success(format_args!("{}.", what)),
        Persistence::InMemoryOnly(e) => success(format_args!(
            "{} in memory only; it could not be written to disk ({}).",
            what, e
        )),
    }
}

fn listed<E: std::fmt::Display>(
    result: Result<Vec<String>, E>,
    files: &mut Vec<String>,
) -> String {
    match result {
        Ok(names) => {
            *files = names;
            success("Directory listed.")
        }
        Err(e) => failure(e),
    }
}

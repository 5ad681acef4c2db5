use log::{debug, info};
use std::path::Path;
use std::sync::Arc;

use crate::connections::ftp::FtpConnectionFactory;
use crate::connections::params::ConnectionParams;
use crate::connections::transport::TransportFactory;
use crate::core::errors::SessionError;
use crate::core::session::Session;
use crate::core::transfer_runner::TransferRunner;
use crate::storage::store::ProfileStore;

/// Runs FTP actions against either explicit parameters, a named profile, or
/// the current session.
///
/// The current session is an explicit `Option<Session>` that only `&mut self`
/// methods change. Stateful transfers read its parameters and open a fresh
/// transport per call; the transport opened by [`connect`](Self::connect)
/// stays idle until [`disconnect`](Self::disconnect).
pub struct SessionExecutor {
    runner: TransferRunner,
    session: Option<Session>,
    default_ssl: bool,
}

impl SessionExecutor {
    pub fn new(factory: Arc<dyn TransportFactory>, profiles: Arc<ProfileStore>) -> Self {
        Self {
            runner: TransferRunner::new(factory, profiles),
            session: None,
            default_ssl: false,
        }
    }

    /// An executor backed by real FTP connections.
    pub fn with_ftp(profiles: Arc<ProfileStore>) -> Self {
        Self::new(Arc::new(FtpConnectionFactory), profiles)
    }

    /// The stateless half, for sharing across threads.
    pub fn runner(&self) -> &TransferRunner {
        &self.runner
    }

    pub fn profiles(&self) -> &Arc<ProfileStore> {
        self.runner.profiles()
    }

    /// TLS preference used by [`connect_with_default_ssl`](Self::connect_with_default_ssl).
    /// An already open session is not affected.
    pub fn enable_ssl(&mut self, use_ssl: bool) {
        debug!("Default TLS preference set to {}", use_ssl);
        self.default_ssl = use_ssl;
    }

    pub fn default_ssl(&self) -> bool {
        self.default_ssl
    }

    pub fn session_params(&self) -> Option<&ConnectionParams> {
        self.session.as_ref().map(Session::params)
    }

    pub fn is_connected(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_connected)
    }

    /// Open a transport and keep it, together with `params`, as the current
    /// session. Any previous session is closed first; on failure no session
    /// remains.
    pub fn connect(&mut self, params: ConnectionParams) -> Result<(), SessionError> {
        self.disconnect();
        let lease = self.runner.open(&params)?;
        self.default_ssl = params.use_ssl;
        self.session = Some(Session::new(params, lease));
        Ok(())
    }

    pub fn connect_with_default_ssl(
        &mut self,
        host: &str,
        username: &str,
        password: &str,
    ) -> Result<(), SessionError> {
        let params = ConnectionParams::new(host, username, password, self.default_ssl);
        self.connect(params)
    }

    /// Resolve `profile_name` and connect with it. Nothing is opened when the
    /// profile does not exist.
    pub fn connect_with_profile(&mut self, profile_name: &str) -> Result<(), SessionError> {
        let params = self.runner.resolve(profile_name)?;
        info!("Connecting with profile '{}'.", profile_name);
        self.connect(params)
    }

    /// Close the current session, if any. Calling it again is a no-op.
    pub fn disconnect(&mut self) {
        match self.session.take() {
            Some(session) => session.end(),
            None => debug!("Disconnect requested without an open session."),
        }
    }

    fn cached_params(&self) -> Result<ConnectionParams, SessionError> {
        self.session_params()
            .cloned()
            .ok_or(SessionError::NoActiveSession)
    }

    /// Upload over a new connection built from the session parameters.
    pub fn upload_file(&self, local: &Path, remote: &str) -> Result<u64, SessionError> {
        let params = self.cached_params()?;
        self.runner.upload_file(&params, local, remote)
    }

    pub fn download_file(&self, remote: &str, local: &Path) -> Result<u64, SessionError> {
        let params = self.cached_params()?;
        self.runner.download_file(&params, remote, local)
    }

    pub fn list_directory(&self, remote: &str) -> Result<Vec<String>, SessionError> {
        let params = self.cached_params()?;
        self.runner.list_directory(&params, remote)
    }

    pub fn upload_file_with(
        &self,
        params: &ConnectionParams,
        local: &Path,
        remote: &str,
    ) -> Result<u64, SessionError> {
        self.runner.upload_file(params, local, remote)
    }

    pub fn download_file_with(
        &self,
        params: &ConnectionParams,
        remote: &str,
        local: &Path,
    ) -> Result<u64, SessionError> {
        self.runner.download_file(params, remote, local)
    }

    pub fn list_directory_with(
        &self,
        params: &ConnectionParams,
        remote: &str,
    ) -> Result<Vec<String>, SessionError> {
        self.runner.list_directory(params, remote)
    }

    pub fn upload_file_with_profile(
        &self,
        profile_name: &str,
        local: &Path,
        remote: &str,
    ) -> Result<u64, SessionError> {
        self.runner.upload_file_with_profile(profile_name, local, remote)
    }

    pub fn download_file_with_profile(
        &self,
        profile_name: &str,
        remote: &str,
        local: &Path,
    ) -> Result<u64, SessionError> {
        self.runner
            .download_file_with_profile(profile_name, remote, local)
    }

    pub fn list_directory_with_profile(
        &self,
        profile_name: &str,
        remote: &str,
    ) -> Result<Vec<String>, SessionError> {
        self.runner.list_directory_with_profile(profile_name, remote)
    }
}

impl Drop for SessionExecutor {
    fn drop(&mut self) {
        self.disconnect();
    }
}

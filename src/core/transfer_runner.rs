use log::{debug, info};
use std::path::Path;
use std::sync::Arc;

use crate::connections::errors::ConnectionError;
use crate::connections::params::ConnectionParams;
use crate::connections::transport::{Transport, TransportFactory};
use crate::core::errors::SessionError;
use crate::core::session::Lease;
use crate::storage::store::ProfileStore;

/// Performs self-contained, one-connection-per-call actions.
///
/// Every call opens its own transport, performs exactly one action and tears
/// the transport down before returning. Nothing here touches a cached
/// session, so a `TransferRunner` can be cloned and used from several threads
/// at once.
#[derive(Clone)]
pub struct TransferRunner {
    factory: Arc<dyn TransportFactory>,
    profiles: Arc<ProfileStore>,
}

impl TransferRunner {
    pub fn new(factory: Arc<dyn TransportFactory>, profiles: Arc<ProfileStore>) -> Self {
        Self { factory, profiles }
    }

    pub fn profiles(&self) -> &Arc<ProfileStore> {
        &self.profiles
    }

    /// Look a profile up and turn it into connection parameters.
    pub fn resolve(&self, profile_name: &str) -> Result<ConnectionParams, SessionError> {
        self.profiles
            .get(profile_name)
            .map(|profile| profile.params())
            .ok_or_else(|| SessionError::ProfileNotFound(profile_name.to_string()))
    }

    /// Open and connect a transport that outlives this call.
    pub fn open(&self, params: &ConnectionParams) -> Result<Lease, SessionError> {
        Ok(Lease::open(self.factory.as_ref(), params)?)
    }

    /// Connect, run `action`, disconnect.
    pub fn run<T>(
        &self,
        params: &ConnectionParams,
        action: impl FnOnce(&mut (dyn Transport + Send)) -> Result<T, ConnectionError>,
    ) -> Result<T, SessionError> {
        let mut lease = self.open(params)?;
        let result = lease.run(action);
        lease.close();
        Ok(result?)
    }

    pub fn upload_file(
        &self,
        params: &ConnectionParams,
        local: &Path,
        remote: &str,
    ) -> Result<u64, SessionError> {
        let bytes = self.run(params, |transport| transport.upload_file(local, remote))?;
        info!("Uploaded {:?} to {}{} ({} bytes).", local, params.host, remote, bytes);
        Ok(bytes)
    }

    pub fn download_file(
        &self,
        params: &ConnectionParams,
        remote: &str,
        local: &Path,
    ) -> Result<u64, SessionError> {
        let bytes = self.run(params, |transport| transport.download_file(remote, local))?;
        info!("Downloaded {}{} to {:?} ({} bytes).", params.host, remote, local, bytes);
        Ok(bytes)
    }

    pub fn list_directory(
        &self,
        params: &ConnectionParams,
        remote: &str,
    ) -> Result<Vec<String>, SessionError> {
        let names = self.run(params, |transport| transport.list_names(remote))?;
        debug!("{} entries under {}{}", names.len(), params.host, remote);
        Ok(names)
    }

    pub fn upload_file_with_profile(
        &self,
        profile_name: &str,
        local: &Path,
        remote: &str,
    ) -> Result<u64, SessionError> {
        let params = self.resolve(profile_name)?;
        self.upload_file(&params, local, remote)
    }

    pub fn download_file_with_profile(
        &self,
        profile_name: &str,
        remote: &str,
        local: &Path,
    ) -> Result<u64, SessionError> {
        let params = self.resolve(profile_name)?;
        self.download_file(&params, remote, local)
    }

    pub fn list_directory_with_profile(
        &self,
        profile_name: &str,
        remote: &str,
    ) -> Result<Vec<String>, SessionError> {
        let params = self.resolve(profile_name)?;
        self.list_directory(&params, remote)
    }
}

use std::path::Path;

use super::errors::ConnectionError;
use super::params::ConnectionParams;

/// A trait representing one file-transfer connection (FTP, FTPS, or a test double).
///
/// A transport is created *not yet connected*. The executor optionally asks it
/// to enable transport security, calls `connect`, performs exactly one action
/// and always calls `disconnect` before dropping it.
pub trait Transport {
    /// Request (or drop) transport security for the next `connect`.
    ///
    /// Returns `Ok(false)` when this transport has no TLS capability at all;
    /// callers treat that as "not upgraded" rather than as a failure.
    fn set_transport_security(&mut self, enabled: bool) -> Result<bool, ConnectionError>;

    fn connect(&mut self) -> Result<(), ConnectionError>;
    fn disconnect(&mut self) -> Result<(), ConnectionError>;
    fn is_connected(&self) -> bool;

    /// Upload `local` to `remote`, returning the number of bytes sent.
    fn upload_file(&mut self, local: &Path, remote: &str) -> Result<u64, ConnectionError>;
    /// Download `remote` into `local`, returning the number of bytes written.
    fn download_file(&mut self, remote: &str, local: &Path) -> Result<u64, ConnectionError>;
    fn list_names(&mut self, remote: &str) -> Result<Vec<String>, ConnectionError>;
}

/// Builds transports for a set of connection parameters.
///
/// Creation happens before anything touches the network; a factory error
/// means there is no transport object to tear down.
pub trait TransportFactory: Send + Sync {
    fn create(&self, params: &ConnectionParams)
        -> Result<Box<dyn Transport + Send>, ConnectionError>;
}

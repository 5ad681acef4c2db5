use log::{debug, info, warn};

use crate::connections::errors::ConnectionError;
use crate::connections::params::ConnectionParams;
use crate::connections::transport::{Transport, TransportFactory};

/// A connected transport that is torn down when dropped.
///
/// `disconnect` runs exactly once and the transport is released right after,
/// whether the lease ends through [`close`](Lease::close), an early `?`
/// return, or unwinding.
pub struct Lease {
    transport: Option<Box<dyn Transport + Send>>,
    host: String,
}

impl Lease {
    /// Create a transport, apply the TLS request and connect.
    ///
    /// If the factory fails there is nothing to tear down. Any later failure
    /// drops the half-open lease, which disconnects it.
    pub fn open(
        factory: &dyn TransportFactory,
        params: &ConnectionParams,
    ) -> Result<Self, ConnectionError> {
        let transport = factory.create(params)?;
        let mut lease = Lease {
            transport: Some(transport),
            host: params.host.clone(),
        };

        if params.use_ssl {
            lease.enable_tls()?;
        }
        lease.run(|transport| transport.connect())?;
        debug!("Transport to {} connected.", lease.host);
        Ok(lease)
    }

    fn enable_tls(&mut self) -> Result<(), ConnectionError> {
        let supported = self.run(|transport| transport.set_transport_security(true))?;
        if !supported {
            warn!(
                "Transport for {} has no TLS support; continuing without it.",
                self.host
            );
        }
        Ok(())
    }

    /// Hand the transport to one action.
    pub fn run<T>(
        &mut self,
        action: impl FnOnce(&mut (dyn Transport + Send)) -> Result<T, ConnectionError>,
    ) -> Result<T, ConnectionError> {
        let transport = self
            .transport
            .as_deref_mut()
            .ok_or(ConnectionError::NotConnected)?;
        action(transport)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn is_connected(&self) -> bool {
        self.transport.as_ref().is_some_and(|t| t.is_connected())
    }

    /// Disconnect and release now.
    pub fn close(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            // A failed disconnect must not replace the operation's own result.
            if let Err(e) = transport.disconnect() {
                warn!("Disconnect from {} failed: {}", self.host, e);
            }
            drop(transport);
            debug!("Transport to {} released.", self.host);
        }
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// The current stateful session: the parameters later stateful calls reuse,
/// plus the transport opened by `connect`.
pub struct Session {
    params: ConnectionParams,
    lease: Lease,
}

impl Session {
    pub fn new(params: ConnectionParams, lease: Lease) -> Self {
        info!(
            "Session opened to {} as '{}'.",
            params.host, params.username
        );
        Self { params, lease }
    }

    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    pub fn is_connected(&self) -> bool {
        self.lease.is_connected()
    }

    /// Tear the transport down. The parameters are wiped when `self` drops.
    pub fn end(self) {
        info!("Session to {} closed.", self.lease.host());
        self.lease.close();
    }
}

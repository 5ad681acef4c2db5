//! A deterministic **in‑process stand‑in** for any type that implements
//! `ftp_bridge::connections::transport::Transport`.
//!
//! *  **From the test’s perspective**
//!    * Build a `FakeTransportFactory` (optionally with a `Behaviour` that makes
//!      one step fail), hand a clone of the `Arc` to the code under test.
//!    * Inspect every call the code made via `factory.events()`.
//!
//! *  **Scope**: integration tests exercise the *real*
//!    lifecycle (TLS request, connect, action, teardown) without opening a
//!    TCP socket to an FTP server.

use ftp_bridge::connections::{ConnectionError, ConnectionParams, Transport, TransportFactory};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One observable call on a fake transport. `id` identifies the transport
/// object, so independent connections can be told apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Created { id: usize, host: String },
    TlsEnabled { id: usize },
    Connected { id: usize, host: String, username: String, password: String },
    Uploaded { id: usize, local: PathBuf, remote: String },
    Downloaded { id: usize, remote: String, local: PathBuf },
    Listed { id: usize, remote: String },
    Disconnected { id: usize },
    Released { id: usize },
}

impl TransportEvent {
    pub fn id(&self) -> usize {
        match self {
            TransportEvent::Created { id, .. }
            | TransportEvent::TlsEnabled { id }
            | TransportEvent::Connected { id, .. }
            | TransportEvent::Uploaded { id, .. }
            | TransportEvent::Downloaded { id, .. }
            | TransportEvent::Listed { id, .. }
            | TransportEvent::Disconnected { id }
            | TransportEvent::Released { id } => *id,
        }
    }
}

/// Which steps of the fake misbehave.
#[derive(Debug, Clone)]
pub struct Behaviour {
    pub tls_capable: bool,
    pub fail_create: bool,
    pub fail_tls: bool,
    pub fail_connect: bool,
    pub fail_action: bool,
    pub fail_disconnect: bool,
    pub panic_on_action: bool,
    pub listing: Vec<String>,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            tls_capable: true,
            fail_create: false,
            fail_tls: false,
            fail_connect: false,
            fail_action: false,
            fail_disconnect: false,
            panic_on_action: false,
            listing: vec!["readme.txt".into(), "pub".into()],
        }
    }
}

pub struct FakeTransportFactory {
    behaviour: Behaviour,
    events: Arc<Mutex<Vec<TransportEvent>>>,
    next_id: AtomicUsize,
}

impl FakeTransportFactory {
    pub fn new() -> Arc<Self> {
        Self::with_behaviour(Behaviour::default())
    }

    pub fn with_behaviour(behaviour: Behaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            events: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicUsize::new(1),
        })
    }

    /// Everything recorded so far, in call order.
    pub fn events(&self) -> Vec<TransportEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Events of a single transport object.
    pub fn events_of(&self, id: usize) -> Vec<TransportEvent> {
        self.events().into_iter().filter(|e| e.id() == id).collect()
    }

    pub fn count(&self, matches: impl Fn(&TransportEvent) -> bool) -> usize {
        self.events().iter().filter(|e| matches(e)).count()
    }

    pub fn created(&self) -> usize {
        self.count(|e| matches!(e, TransportEvent::Created { .. }))
    }

    pub fn disconnects(&self) -> usize {
        self.count(|e| matches!(e, TransportEvent::Disconnected { .. }))
    }

    pub fn releases(&self) -> usize {
        self.count(|e| matches!(e, TransportEvent::Released { .. }))
    }
}

impl TransportFactory for FakeTransportFactory {
    fn create(
        &self,
        params: &ConnectionParams,
    ) -> Result<Box<dyn Transport + Send>, ConnectionError> {
        if self.behaviour.fail_create {
            return Err(ConnectionError::InvalidHost(params.host.clone()));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.events.lock().unwrap().push(TransportEvent::Created {
            id,
            host: params.host.clone(),
        });
        Ok(Box::new(FakeTransport {
            id,
            params: params.clone(),
            connected: false,
            behaviour: self.behaviour.clone(),
            events: Arc::clone(&self.events),
        }))
    }
}

pub struct FakeTransport {
    id: usize,
    params: ConnectionParams,
    connected: bool,
    behaviour: Behaviour,
    events: Arc<Mutex<Vec<TransportEvent>>>,
}

impl FakeTransport {
    fn record(&self, event: TransportEvent) {
        self.events.lock().unwrap().push(event);
    }

    fn act(&self, event: TransportEvent) -> Result<(), ConnectionError> {
        if !self.connected {
            return Err(ConnectionError::NotConnected);
        }
        if self.behaviour.panic_on_action {
            panic!("fake transport {} blew up", self.id);
        }
        if self.behaviour.fail_action {
            return Err(ConnectionError::FtpError("550 Permission denied".into()));
        }
        self.record(event);
        Ok(())
    }
}

impl Transport for FakeTransport {
    fn set_transport_security(&mut self, enabled: bool) -> Result<bool, ConnectionError> {
        if self.behaviour.fail_tls {
            return Err(ConnectionError::TlsError("handshake refused".into()));
        }
        if !self.behaviour.tls_capable {
            return Ok(false);
        }
        if enabled {
            self.record(TransportEvent::TlsEnabled { id: self.id });
        }
        Ok(true)
    }

    fn connect(&mut self) -> Result<(), ConnectionError> {
        if self.behaviour.fail_connect {
            return Err(ConnectionError::FtpError("530 Login incorrect.".into()));
        }
        self.connected = true;
        self.record(TransportEvent::Connected {
            id: self.id,
            host: self.params.host.clone(),
            username: self.params.username.clone(),
            password: self.params.password.clone(),
        });
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), ConnectionError> {
        self.record(TransportEvent::Disconnected { id: self.id });
        self.connected = false;
        if self.behaviour.fail_disconnect {
            return Err(ConnectionError::FtpError("421 Service not available".into()));
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn upload_file(&mut self, local: &Path, remote: &str) -> Result<u64, ConnectionError> {
        self.act(TransportEvent::Uploaded {
            id: self.id,
            local: local.to_path_buf(),
            remote: remote.to_string(),
        })?;
        Ok(0)
    }

    fn download_file(&mut self, remote: &str, local: &Path) -> Result<u64, ConnectionError> {
        self.act(TransportEvent::Downloaded {
            id: self.id,
            remote: remote.to_string(),
            local: local.to_path_buf(),
        })?;
        let contents = format!("contents of {}", remote);
        std::fs::write(local, &contents)?;
        Ok(contents.len() as u64)
    }

    fn list_names(&mut self, remote: &str) -> Result<Vec<String>, ConnectionError> {
        self.act(TransportEvent::Listed {
            id: self.id,
            remote: remote.to_string(),
        })?;
        Ok(self.behaviour.listing.clone())
    }
}

impl Drop for FakeTransport {
    fn drop(&mut self) {
        // `lock()` can only fail if a test thread panicked mid-push; skip then.
        if let Ok(mut events) = self.events.lock() {
            events.push(TransportEvent::Released { id: self.id });
        }
    }
}

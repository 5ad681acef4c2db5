use log::{debug, info, warn};
use std::fs::{self, File};
use std::io;
use std::net::ToSocketAddrs;
use std::path::Path;
use std::time::Duration;
use suppaftp::types::FileType;
use suppaftp::FtpError;

use crate::connections::errors::ConnectionError;
use crate::connections::params::ConnectionParams;
use crate::connections::transport::{Transport, TransportFactory};

pub const DEFAULT_FTP_PORT: u16 = 21;
/// Applies to the TCP connect and to every read and write on the control channel.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[cfg(feature = "tls")]
type FtpStream = suppaftp::NativeTlsFtpStream;
#[cfg(not(feature = "tls"))]
type FtpStream = suppaftp::FtpStream;

/// A blocking FTP/FTPS connection using the suppaftp library.
///
/// FTPS is explicit: the control connection is opened in clear text, upgraded
/// with `AUTH TLS`, and only then are the credentials sent.
pub struct FtpConnection {
    pub host: String,
    pub port: u16,
    params: ConnectionParams,
    use_tls: bool,
    timeout: Duration,
    inner: Option<FtpStream>,
}

impl FtpConnection {
    pub fn new(params: ConnectionParams) -> Result<Self, ConnectionError> {
        let (host, port) = split_host_port(&params.host)?;
        Ok(FtpConnection {
            host,
            port,
            params,
            use_tls: false,
            timeout: DEFAULT_TIMEOUT,
            inner: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Try every resolved address in turn, then put timeouts on the socket.
    fn open_control_channel(&self) -> Result<FtpStream, ConnectionError> {
        let mut last_error = None;
        for address in (self.host.as_str(), self.port).to_socket_addrs()? {
            match FtpStream::connect_timeout(address, self.timeout) {
                Ok(stream) => {
                    let socket = stream.get_ref();
                    socket.set_read_timeout(Some(self.timeout))?;
                    socket.set_write_timeout(Some(self.timeout))?;
                    return Ok(stream);
                }
                Err(e) => {
                    debug!("Connecting to {} failed: {}", address, e);
                    last_error = Some(e);
                }
            }
        }
        Err(match last_error {
            Some(e) => e.into(),
            None => ConnectionError::InvalidHost(self.host.clone()),
        })
    }

    fn stream(&mut self) -> Result<&mut FtpStream, ConnectionError> {
        self.inner.as_mut().ok_or(ConnectionError::NotConnected)
    }

    #[cfg(feature = "tls")]
    fn secure(&self, stream: FtpStream) -> Result<FtpStream, ConnectionError> {
        use suppaftp::native_tls::TlsConnector;
        use suppaftp::NativeTlsConnector;

        let connector = NativeTlsConnector::from(TlsConnector::new()?);
        let stream = stream
            .into_secure(connector, &self.host)
            .map_err(|e| ConnectionError::TlsError(e.to_string()))?;
        info!("Control channel to {} upgraded to TLS.", self.host);
        Ok(stream)
    }

    #[cfg(not(feature = "tls"))]
    fn secure(&self, stream: FtpStream) -> Result<FtpStream, ConnectionError> {
        Ok(stream)
    }
}

impl Transport for FtpConnection {
    #[cfg(feature = "tls")]
    fn set_transport_security(&mut self, enabled: bool) -> Result<bool, ConnectionError> {
        self.use_tls = enabled;
        Ok(true)
    }

    #[cfg(not(feature = "tls"))]
    fn set_transport_security(&mut self, _enabled: bool) -> Result<bool, ConnectionError> {
        Ok(false)
    }

    fn connect(&mut self) -> Result<(), ConnectionError> {
        info!("Connecting to FTP server at {}:{}", self.host, self.port);

        let mut stream = self.open_control_channel()?;
        if self.use_tls {
            stream = self.secure(stream)?;
        }
        stream
            .login(&self.params.username, &self.params.password)
            .map_err(|e| ConnectionError::FtpError(format!("Authentication error: {}", e)))?;
        stream.transfer_type(FileType::Binary)?;

        self.inner = Some(stream);
        info!("FTP session established as '{}'.", self.params.username);
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), ConnectionError> {
        if let Some(mut stream) = self.inner.take() {
            // The socket is closed when `stream` drops, even if QUIT fails.
            if let Err(e) = stream.quit() {
                warn!("QUIT to {} failed: {}", self.host, e);
                return Err(e.into());
            }
            info!("FTP session to {} closed.", self.host);
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.inner.is_some()
    }

    fn upload_file(&mut self, local: &Path, remote: &str) -> Result<u64, ConnectionError> {
        let mut file = File::open(local)?;
        let size = file.metadata()?.len();
        self.stream()?.put_file(remote, &mut file)?;
        debug!("Uploaded {} bytes from {:?} to {}", size, local, remote);
        Ok(size)
    }

    fn download_file(&mut self, remote: &str, local: &Path) -> Result<u64, ConnectionError> {
        let stream = self.stream()?;
        let mut file = File::create(local)?;
        let copied = stream.retr(remote, |reader| {
            io::copy(reader, &mut file).map_err(FtpError::ConnectionError)
        });
        let size = match copied {
            Ok(size) => size,
            Err(e) => {
                drop(file);
                // Leave no partial file behind.
                if let Err(remove) = fs::remove_file(local) {
                    warn!("Could not remove partial download {:?}: {}", local, remove);
                }
                return Err(e.into());
            }
        };
        debug!("Downloaded {} bytes from {} to {:?}", size, remote, local);
        Ok(size)
    }

    fn list_names(&mut self, remote: &str) -> Result<Vec<String>, ConnectionError> {
        let path = if remote.is_empty() { None } else { Some(remote) };
        let names = self.stream()?.nlst(path)?;
        debug!("Listed {} entries in '{}'", names.len(), remote);
        Ok(names)
    }
}

/// Creates one `FtpConnection` per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct FtpConnectionFactory;

impl TransportFactory for FtpConnectionFactory {
    fn create(
        &self,
        params: &ConnectionParams,
    ) -> Result<Box<dyn Transport + Send>, ConnectionError> {
        Ok(Box::new(FtpConnection::new(params.clone())?))
    }
}

/// Split `host`, `host:port`, `[v6]` or `[v6]:port` into its parts.
pub fn split_host_port(raw: &str) -> Result<(String, u16), ConnectionError> {
    let raw = raw.trim();
    let invalid = || ConnectionError::InvalidHost(raw.to_string());
    if raw.is_empty() {
        return Err(invalid());
    }

    if let Some(rest) = raw.strip_prefix('[') {
        let (host, tail) = rest.split_once(']').ok_or_else(invalid)?;
        let port = match tail.strip_prefix(':') {
            Some(port) => port.parse().map_err(|_| invalid())?,
            None if tail.is_empty() => DEFAULT_FTP_PORT,
            None => return Err(invalid()),
        };
        return Ok((host.to_string(), port));
    }

    match raw.rsplit_once(':') {
        // A bare IPv6 address has more than one colon and no port.
        Some((host, _)) if host.contains(':') => Ok((raw.to_string(), DEFAULT_FTP_PORT)),
        Some((host, port)) if !host.is_empty() => {
            let port = port.parse().map_err(|_| invalid())?;
            Ok((host.to_string(), port))
        }
        Some(_) => Err(invalid()),
        None => Ok((raw.to_string(), DEFAULT_FTP_PORT)),
    }
}

//! TLS server transport with length-prefix framing.
//!
//! Accepts one active peer connection at a time. The accept/handshake
//! cycle runs on a background tokio task armed by `start()`; a successful
//! handshake promotes the connection to the single active slot and
//! immediately re-arms accept, so the server is always ready for the
//! next peer. `send_bytes`/`recv_bytes` operate on the active slot under
//! a mutex and are safe to call from any task.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error, info, warn};
use rustls::ServerConfig;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio_rustls::server::TlsStream;
use tokio_rustls::TlsAcceptor;

use crate::comms::frame::{self, DEFAULT_MAX_FRAME_LEN, LEN_PREFIX_SIZE};
use crate::comms::transport::{Transport, TransportError};

/// The single promoted (connected + handshaked) peer connection.
type ActiveSlot = Arc<Mutex<Option<TlsStream<TcpStream>>>>;

/// TLS implementation of [`Transport`].
///
/// Owns the listening socket, the TLS server configuration, and the
/// active connection. Certificate and key are loaded lazily in `start()`
/// so construction is infallible.
pub struct TlsTransport {
    host: String,
    port: u16,
    cert_file: PathBuf,
    key_file: PathBuf,
    max_frame_len: u32,

    running: AtomicBool,
    active: ActiveSlot,
    accept_task: Mutex<Option<JoinHandle<()>>>,
    shutdown_tx: watch::Sender<bool>,
    local_addr: std::sync::Mutex<Option<SocketAddr>>,
}

impl TlsTransport {
    /// Creates a new, not-yet-started TLS transport.
    ///
    /// # Arguments
    ///
    /// * `host` - Bind address (e.g. "0.0.0.0").
    /// * `port` - TCP port to listen on; 0 picks an ephemeral port.
    /// * `cert_file` - Path to the PEM-encoded server certificate chain.
    /// * `key_file` - Path to the PEM-encoded private key.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        cert_file: impl Into<PathBuf>,
        key_file: impl Into<PathBuf>,
    ) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            host: host.into(),
            port,
            cert_file: cert_file.into(),
            key_file: key_file.into(),
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            running: AtomicBool::new(false),
            active: Arc::new(Mutex::new(None)),
            accept_task: Mutex::new(None),
            shutdown_tx,
            local_addr: std::sync::Mutex::new(None),
        }
    }

    /// Overrides the maximum accepted frame payload size.
    pub fn with_max_frame_len(mut self, max_frame_len: u32) -> Self {
        self.max_frame_len = max_frame_len;
        self
    }

    /// Returns the actually bound listen address once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.lock().unwrap()
    }

    /// Returns true while a handshaked peer connection is promoted.
    pub async fn has_active_connection(&self) -> bool {
        self.active.lock().await.is_some()
    }

    async fn bind_listener(&self) -> Result<TcpListener, TransportError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| TransportError::InvalidAddress(self.host.clone()))?;
        let addr = SocketAddr::new(ip, self.port);
        let socket = match addr {
            SocketAddr::V4(_) => TcpSocket::new_v4()?,
            SocketAddr::V6(_) => TcpSocket::new_v6()?,
        };
        socket.set_reuseaddr(true)?;
        socket.bind(addr)?;
        Ok(socket.listen(1024)?)
    }

    async fn start_inner(&self) -> Result<(), TransportError> {
        let config = load_server_config(&self.cert_file, &self.key_file)?;
        let acceptor = TlsAcceptor::from(Arc::new(config));

        let listener = self.bind_listener().await?;
        let local = listener.local_addr()?;
        *self.local_addr.lock().unwrap() = Some(local);
        info!("listening on {}", local);

        // Reset the shutdown signal in case of a start after stop.
        self.shutdown_tx.send_replace(false);
        let shutdown_rx = self.shutdown_tx.subscribe();

        let active = Arc::clone(&self.active);
        let handle = tokio::spawn(accept_loop(listener, acceptor, active, shutdown_rx));
        *self.accept_task.lock().await = Some(handle);
        Ok(())
    }
}

#[async_trait]
impl Transport for TlsTransport {
    async fn start(&self) -> Result<(), TransportError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Ok(()); // already started
        }
        let started = self.start_inner().await;
        if started.is_err() {
            // Failed startup must leave the transport restartable.
            self.running.store(false, Ordering::SeqCst);
        }
        started
    }

    async fn stop(&self) -> Result<(), TransportError> {
        if !self.running.swap(false, Ordering::SeqCst) {
            return Ok(()); // already stopped
        }

        // Signal the accept loop; the listener is dropped with the task.
        let _ = self.shutdown_tx.send(true);
        if let Some(handle) = self.accept_task.lock().await.take() {
            if let Err(err) = handle.await {
                warn!("accept task terminated abnormally: {}", err);
            }
        }

        if let Some(mut stream) = self.active.lock().await.take() {
            // Best effort close_notify; the peer may already be gone.
            let _ = stream.shutdown().await;
            info!("active connection closed");
        }
        *self.local_addr.lock().unwrap() = None;
        info!("transport stopped");
        Ok(())
    }

    async fn send_bytes(&self, data: &[u8]) -> Result<(), TransportError> {
        if data.len() > u32::MAX as usize {
            return Err(TransportError::OversizedFrame(u32::MAX));
        }

        let mut slot = self.active.lock().await;
        let stream = slot.as_mut().ok_or(TransportError::NoActiveConnection)?;

        // Header and payload leave in a single write.
        let mut frame_buf = Vec::with_capacity(LEN_PREFIX_SIZE + data.len());
        frame_buf.extend_from_slice(&frame::encode_len(data.len() as u32));
        frame_buf.extend_from_slice(data);

        let written = write_frame(stream, &frame_buf).await;
        if let Err(err) = written {
            // The connection is unusable; drop it so accept can promote
            // the next peer.
            slot.take();
            warn!("send failed, dropping active connection: {}", err);
            return Err(TransportError::Io(err));
        }
        Ok(())
    }

    async fn recv_bytes(&self) -> Result<Vec<u8>, TransportError> {
        let mut slot = self.active.lock().await;
        let stream = slot.as_mut().ok_or(TransportError::NoActiveConnection)?;

        let mut header = [0u8; LEN_PREFIX_SIZE];
        if let Err(err) = stream.read_exact(&mut header).await {
            slot.take();
            warn!("header read failed, dropping active connection: {}", err);
            return Err(TransportError::Io(err));
        }

        let len = frame::decode_len(header);
        if len == 0 {
            return Ok(Vec::new());
        }
        if len > self.max_frame_len {
            slot.take();
            warn!("peer announced an oversized frame ({} bytes), dropping connection", len);
            return Err(TransportError::OversizedFrame(len));
        }

        let mut payload = vec![0u8; len as usize];
        if let Err(err) = stream.read_exact(&mut payload).await {
            slot.take();
            warn!("payload read failed, dropping active connection: {}", err);
            return Err(TransportError::Io(err));
        }
        Ok(payload)
    }
}

async fn write_frame(
    stream: &mut TlsStream<TcpStream>,
    frame_buf: &[u8],
) -> std::io::Result<()> {
    stream.write_all(frame_buf).await?;
    stream.flush().await
}

/// Accept cycle: accept → TCP_NODELAY → TLS handshake → promote → re-arm.
///
/// Handshake failures are logged and non-fatal; the loop re-arms accept
/// without promoting anything. The loop terminates on the shutdown
/// signal or on a listener-level accept error.
async fn accept_loop(
    listener: TcpListener,
    acceptor: TlsAcceptor,
    active: ActiveSlot,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let accepted = tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
                continue;
            }
            accepted = listener.accept() => accepted,
        };

        let (stream, peer) = match accepted {
            Ok(pair) => pair,
            Err(err) => {
                error!("accept error: {}", err);
                break;
            }
        };
        info!("accepted connection from {}", peer);

        // Disable Nagle for low-latency traffic.
        if let Err(err) = stream.set_nodelay(true) {
            warn!("failed to set TCP_NODELAY on {}: {}", peer, err);
        }

        let handshake = tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
                continue;
            }
            handshake = acceptor.accept(stream) => handshake,
        };

        match handshake {
            Ok(tls) => {
                debug!("TLS handshake complete for {}", peer);
                let mut slot = active.lock().await;
                if slot.replace(tls).is_some() {
                    // Replacement policy: the newest handshaked peer wins.
                    warn!("replacing previous active connection with {}", peer);
                }
            }
            Err(err) => {
                warn!("TLS handshake failed for {}: {}", peer, err);
            }
        }
    }
    debug!("accept loop terminated");
}

fn load_server_config(cert_file: &Path, key_file: &Path) -> Result<ServerConfig, TransportError> {
    let cert_bytes = std::fs::read(cert_file)?;
    let certs = rustls_pemfile::certs(&mut cert_bytes.as_slice())
        .collect::<Result<Vec<_>, _>>()?;

    let key_bytes = std::fs::read(key_file)?;
    let key = rustls_pemfile::private_key(&mut key_bytes.as_slice())?.ok_or_else(|| {
        TransportError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "no private key found in key file",
        ))
    })?;

    Ok(ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn start_fails_cleanly_on_missing_certificate() {
        let transport = TlsTransport::new("127.0.0.1", 0, "/no/such/cert.pem", "/no/such/key.pem");
        assert!(transport.start().await.is_err());
        // A failed start leaves the transport stoppable and restartable.
        assert!(transport.stop().await.is_ok());
        assert!(transport.start().await.is_err());
    }

    #[tokio::test]
    async fn start_fails_on_unparseable_host() {
        let transport = TlsTransport::new("not-an-ip", 0, "/no/such/cert.pem", "/no/such/key.pem");
        let err = transport.start().await.unwrap_err();
        // Certificate loading fails first; host parsing is covered by
        // bind_listener directly.
        assert!(matches!(err, TransportError::Io(_)));

        let bind_err = transport.bind_listener().await.unwrap_err();
        assert!(matches!(bind_err, TransportError::InvalidAddress(_)));
    }
}

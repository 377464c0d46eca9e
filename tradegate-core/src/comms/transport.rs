//! Transport abstraction for the gateway's network boundary.
//!
//! Implementation details (TLS over TCP, in-process channels) are hidden
//! behind the `Transport` trait so the server layer stays
//! transport-agnostic.

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by transport operations.
///
/// Handshake failures never appear here: they are internal to the accept
/// cycle, logged, and answered by re-arming accept.
#[derive(Error, Debug)]
pub enum TransportError {
    /// `send`/`receive` was called while no peer is connected.
    #[error("no active connection")]
    NoActiveConnection,

    /// Read/write/socket failure on the active connection or listener.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A peer announced a frame larger than the configured ceiling.
    #[error("frame of {0} bytes exceeds the maximum frame size")]
    OversizedFrame(u32),

    /// The in-process channel backing a memory transport was dropped.
    #[error("memory channel closed")]
    ChannelClosed,

    /// TLS certificate or key material was rejected.
    #[error("TLS configuration error: {0}")]
    Tls(#[from] rustls::Error),

    /// The configured bind host could not be parsed.
    #[error("invalid bind address: {0}")]
    InvalidAddress(String),
}

/// A duplex, length-framed byte transport.
///
/// `send_bytes` and `recv_bytes` are safe to call from any task once
/// `start` has returned; implementations guard the underlying connection
/// with a mutex.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Start the transport (e.g. bind, listen and begin accepting).
    /// Idempotent: a second call while running is a no-op.
    async fn start(&self) -> Result<(), TransportError>;

    /// Stop the transport and release all resources. Idempotent.
    async fn stop(&self) -> Result<(), TransportError>;

    /// Send one frame containing `data` as its payload.
    async fn send_bytes(&self, data: &[u8]) -> Result<(), TransportError>;

    /// Receive exactly one frame and return its payload. A zero-length
    /// frame yields an empty buffer, not an error.
    async fn recv_bytes(&self) -> Result<Vec<u8>, TransportError>;
}

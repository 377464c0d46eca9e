//! In-process duplex transport for testing/threading.
//!
//! Implements [`Transport`] over Tokio MPSC channels. Frames never touch
//! a socket, so there is no length prefix on this path; a message on the
//! channel is one frame's payload.

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use crate::comms::transport::{Transport, TransportError};

/// One end of an in-process duplex channel pair.
pub struct MemoryTransport {
    sender: mpsc::Sender<Vec<u8>>,
    receiver: Mutex<mpsc::Receiver<Vec<u8>>>,
}

impl MemoryTransport {
    /// Creates two connected transport ends.
    ///
    /// Whatever one end sends, the other receives, in order.
    pub fn pair(capacity: usize) -> (Self, Self) {
        let (tx_a, rx_a) = mpsc::channel(capacity);
        let (tx_b, rx_b) = mpsc::channel(capacity);
        (
            Self {
                sender: tx_a,
                receiver: Mutex::new(rx_b),
            },
            Self {
                sender: tx_b,
                receiver: Mutex::new(rx_a),
            },
        )
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn start(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn stop(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn send_bytes(&self, data: &[u8]) -> Result<(), TransportError> {
        self.sender
            .send(data.to_vec())
            .await
            .map_err(|_| TransportError::ChannelClosed)
    }

    async fn recv_bytes(&self) -> Result<Vec<u8>, TransportError> {
        self.receiver
            .lock()
            .await
            .recv()
            .await
            .ok_or(TransportError::ChannelClosed)
    }
}

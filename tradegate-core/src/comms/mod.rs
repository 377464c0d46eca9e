//! Communication layer: frame codec and transport implementations.

pub mod frame;
pub mod transport;
pub mod transports;

pub use transport::{Transport, TransportError};
pub use transports::memory::MemoryTransport;
pub use transports::tls::TlsTransport;

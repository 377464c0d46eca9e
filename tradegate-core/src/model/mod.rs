//! Wire-level data models shared between the transport and server layers.

pub mod report;
pub mod request;
pub mod response;

use thiserror::Error;

pub use report::ReportRequest;
pub use request::{Request, RequestType};
pub use response::Response;

/// Errors raised while decoding or encoding model types.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The numeric tag does not map to any known `RequestType`.
    #[error("unknown request type tag: {0}")]
    UnknownRequestType(u32),

    /// Serialization or deserialization failed.
    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),
}

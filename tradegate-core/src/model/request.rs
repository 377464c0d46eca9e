//! Client request model.
//!
//! A `Request` pairs a numeric operation tag with an opaque binary payload.
//! The transport never inspects either; only the server layer gives the
//! payload meaning.

use serde::{Deserialize, Serialize};

use crate::model::ModelError;

/// Identifies the operation a client is asking the gateway to perform.
///
/// The on-wire representation is the raw `u32` tag, so unknown tags survive
/// decoding and are rejected by the registry rather than the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum RequestType {
    /// Fetch current or historical market data.
    GetMarketData = 0,
    /// Run a financial calculation (e.g. P&L, VaR).
    Calculate = 1,
    /// Transform or filter trading data.
    Manipulate = 2,
    /// Generate a structured report (e.g. end-of-day).
    GenerateReport = 3,
}

impl RequestType {
    /// Returns the numeric wire tag for this request type.
    pub fn tag(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for RequestType {
    type Error = ModelError;

    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(RequestType::GetMarketData),
            1 => Ok(RequestType::Calculate),
            2 => Ok(RequestType::Manipulate),
            3 => Ok(RequestType::GenerateReport),
            other => Err(ModelError::UnknownRequestType(other)),
        }
    }
}

/// A decoded client request. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Raw operation tag. Kept as `u32` so requests with unregistered tags
    /// can still be represented and dispatched to the error path.
    tag: u32,
    /// Operation-specific binary payload.
    payload: Vec<u8>,
}

impl Request {
    /// Creates a new request for a known request type.
    ///
    /// # Arguments
    ///
    /// * `request_type` - The operation being requested.
    /// * `payload` - Operation-specific parameters as opaque bytes.
    ///
    /// # Returns
    ///
    /// A new `Request`.
    pub fn new(request_type: RequestType, payload: Vec<u8>) -> Self {
        Self {
            tag: request_type.tag(),
            payload,
        }
    }

    /// Creates a request from a raw tag, which may not map to any
    /// registered request type.
    pub fn from_raw(tag: u32, payload: Vec<u8>) -> Self {
        Self { tag, payload }
    }

    /// Returns the raw operation tag.
    pub fn get_tag(&self) -> u32 {
        self.tag
    }

    /// Returns the typed request kind, if the tag is known.
    pub fn get_type(&self) -> Result<RequestType, ModelError> {
        RequestType::try_from(self.tag)
    }

    /// Returns the binary payload.
    pub fn get_payload(&self) -> &[u8] {
        &self.payload
    }

    /// Consumes the request and returns its payload.
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Serializes the request for transmission.
    pub fn encode(&self) -> Result<Vec<u8>, ModelError> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserializes a request received from the wire.
    pub fn decode(bytes: &[u8]) -> Result<Self, ModelError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

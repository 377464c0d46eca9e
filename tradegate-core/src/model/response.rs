//! Server response model.

use serde::{Deserialize, Serialize};

use crate::model::ModelError;

/// The gateway's answer to a client request.
///
/// Always fully constructed: the dispatch facade guarantees every inbound
/// request yields exactly one `Response`, success or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Whether the operation completed successfully.
    success: bool,
    /// Human-readable status or error message.
    message: String,
    /// Binary payload containing the operation result data.
    data: Vec<u8>,
}

impl Response {
    /// Creates a successful response.
    ///
    /// # Arguments
    ///
    /// * `message` - Status message for the client.
    /// * `data` - Operation result payload.
    pub fn ok(message: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }

    /// Creates a failure response with no data payload.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn get_message(&self) -> &str {
        &self.message
    }

    pub fn get_data(&self) -> &[u8] {
        &self.data
    }

    /// Serializes the response for transmission.
    pub fn encode(&self) -> Result<Vec<u8>, ModelError> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserializes a response received from the wire.
    pub fn decode(bytes: &[u8]) -> Result<Self, ModelError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_carries_no_data() {
        let response = Response::failure("nope");
        assert!(!response.is_success());
        assert_eq!(response.get_message(), "nope");
        assert!(response.get_data().is_empty());
    }

    #[test]
    fn encode_decode_round_trip() {
        let response = Response::ok("ok", b"hello".to_vec());
        let decoded = Response::decode(&response.encode().unwrap()).unwrap();
        assert_eq!(decoded, response);
    }
}

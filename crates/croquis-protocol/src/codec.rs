//! JSON codec for wire messages.
//!
//! Messages travel as JSON text frames. Encoding and decoding are thin
//! wrappers over `serde_json` that fold failures into [`ProtocolError`],
//! so callers never see a bare `serde_json::Error`.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Serializes a message into a JSON text frame.
///
/// # Errors
/// Returns [`ProtocolError::Encode`] if serialization fails.
pub fn encode<T: Serialize>(value: &T) -> Result<String, ProtocolError> {
    serde_json::to_string(value).map_err(ProtocolError::Encode)
}

/// Parses a JSON text frame into a message.
///
/// # Errors
/// Returns [`ProtocolError::Decode`] if the frame is not valid JSON or
/// does not match the expected shape (missing fields, wrong types).
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ProtocolError> {
    serde_json::from_str(text).map_err(ProtocolError::Decode)
}

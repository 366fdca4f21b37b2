//! Error types for the protocol layer.
//!
//! When you see a [`ProtocolError`], the problem is in serialization,
//! deserialization, or payload validation, not in networking or room
//! state.

/// Errors that can occur while encoding, decoding, or validating
/// wire payloads.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serializing an outbound message failed.
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// An inbound frame was not a well-formed message.
    ///
    /// Common causes: malformed JSON, a missing required field, or a
    /// field of the wrong type.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A `draw_image` payload was not decodable base64.
    #[error("invalid image payload: {0}")]
    InvalidImage(base64::DecodeError),
}

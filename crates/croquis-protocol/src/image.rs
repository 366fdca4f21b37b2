//! Validation for `draw_image` payloads.
//!
//! The drawer can push a full-canvas snapshot to the room as base64 text
//! (standard alphabet, padded). The payload is checked by decoding it
//! once up front; anything the decoder rejects never reaches a broadcast.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::ProtocolError;

/// Checks that `data` is well-formed base64 and returns the decoded size
/// in bytes.
///
/// The decoded bytes are discarded: members receive the original text
/// verbatim, so forwarding stays a single string clone. The size is
/// returned for logging.
///
/// # Errors
/// Returns [`ProtocolError::InvalidImage`] when `data` is not decodable
/// (stray characters, bad padding, a `data:` URL prefix left in place).
pub fn validate_image(data: &str) -> Result<usize, ProtocolError> {
    let bytes = STANDARD
        .decode(data)
        .map_err(ProtocolError::InvalidImage)?;
    Ok(bytes.len())
}

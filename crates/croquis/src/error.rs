//! Unified error type for the croquis server.

use croquis_protocol::ProtocolError;
use croquis_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum CroquisError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid image).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// An I/O error from the static asset listener.
    #[error("asset server error: {0}")]
    Assets(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_tungstenite::tungstenite;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::SendFailed(
            tungstenite::Error::ConnectionClosed,
        );
        let croquis_err: CroquisError = err.into();
        assert!(matches!(croquis_err, CroquisError::Transport(_)));
    }

    #[test]
    fn test_from_protocol_error() {
        let bad = serde_json::from_str::<serde_json::Value>("not json")
            .unwrap_err();
        let croquis_err: CroquisError = ProtocolError::Decode(bad).into();
        assert!(matches!(croquis_err, CroquisError::Protocol(_)));
        assert!(croquis_err.to_string().contains("decode failed"));
    }

    #[test]
    fn test_from_io_error() {
        let err = std::io::Error::other("bind refused");
        let croquis_err: CroquisError = err.into();
        assert!(matches!(croquis_err, CroquisError::Assets(_)));
        assert!(croquis_err.to_string().contains("bind refused"));
    }
}

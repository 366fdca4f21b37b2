/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Binding the listener or accepting a TCP connection failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),

    /// The WebSocket upgrade handshake failed.
    #[error("handshake failed: {0}")]
    HandshakeFailed(#[source] tokio_tungstenite::tungstenite::Error),

    /// Sending a frame failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] tokio_tungstenite::tungstenite::Error),

    /// Receiving a frame failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] tokio_tungstenite::tungstenite::Error),
}

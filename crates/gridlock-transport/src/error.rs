/// Errors that can occur in the transport layer.
///
/// A clean close is not an error — [`Connection::recv`](crate::Connection::recv)
/// signals it with `Ok(None)`. These variants cover the I/O failures
/// underneath: the socket died mid-operation or could not be set up.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Sending a frame failed; the peer is effectively gone.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving a frame failed mid-stream (reset, protocol violation).
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Binding the listener, accepting a socket, or completing the
    /// WebSocket handshake failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),
}

//! Unified error type for the Gridlock server.

use gridlock_protocol::ProtocolError;
use gridlock_room::RoomError;
use gridlock_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `gridlock` meta-crate, you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant auto-generates `From` impls, so the `?`
/// operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum GridlockError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (not found, full, membership).
    #[error(transparent)]
    Room(#[from] RoomError),
}

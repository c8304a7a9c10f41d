//! Error types for the protocol layer.
//!
//! Each crate in Gridlock defines its own error enum. This keeps errors
//! specific and meaningful — when you see a `ProtocolError`, you know the
//! problem is in serialization/deserialization, not in networking or room
//! management.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, an unknown `type` discriminator,
    /// missing required fields, or wrong data types. The sender gets a
    /// rejection message; the connection stays open.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}

//! Wire protocol for Gridlock.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`Mark`], [`Board`]) —
//!   the message structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw frames) and the session
//! handler (room membership). It doesn't know about connections or rooms —
//! it only knows how to serialize and deserialize messages.
//!
//! ```text
//! Transport (frames) → Protocol (ClientMessage/ServerMessage) → Session
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{Board, ClientMessage, Mark, ServerMessage};

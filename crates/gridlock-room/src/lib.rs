//! Room lifecycle and game authority for Gridlock.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns the
//! authoritative [`MatchState`] and the outboxes of its 1–2 participants.
//! All precondition checks, mutations, and broadcasts for one room are
//! serialized through the actor's mailbox, so distinct rooms never
//! contend with each other.
//!
//! # Key types
//!
//! - [`RoomRegistry`] — maps room codes to live rooms; owns code generation
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`RoomCode`] — 5-character human-typeable code
//! - [`MatchState`] — board, turn owner, terminal outcome
//! - [`RoomError`] / [`MoveError`] — lifecycle vs game-rule rejections

mod code;
mod error;
mod match_state;
mod registry;
mod room;

pub use code::RoomCode;
pub use error::{MoveError, RoomError};
pub use match_state::{
    MatchState, StateSnapshot, WINNING_TRIPLES, winning_line,
};
pub use registry::RoomRegistry;
pub use room::{ParticipantSender, RoomHandle};

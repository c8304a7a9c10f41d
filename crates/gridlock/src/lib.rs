//! # Gridlock
//!
//! Authoritative multiplayer session server for turn-based grid games.
//!
//! Two remote participants are paired into a room identified by a short
//! human-typeable code; the server owns the board, enforces whose turn it
//! is, validates and applies moves, detects terminal outcomes, and
//! broadcasts the resulting state to every participant — no client is
//! trusted to self-report game state. A single participant can instead
//! play the locally computed opponent from `gridlock-solver`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gridlock::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), GridlockError> {
//!     let server = GridlockServerBuilder::new()
//!         .bind("0.0.0.0:3000")
//!         .build()
//!         .await?;
//!     server.run().await
//! }
//! ```

mod error;
mod handler;
mod server;

pub use error::GridlockError;
pub use server::{GridlockServer, GridlockServerBuilder};

/// Commonly used types, re-exported for one-line imports.
pub mod prelude {
    pub use crate::{GridlockError, GridlockServer, GridlockServerBuilder};
    pub use gridlock_protocol::{
        Board, ClientMessage, Codec, JsonCodec, Mark, ServerMessage,
    };
    pub use gridlock_room::{MoveError, RoomCode, RoomError, RoomRegistry};
}

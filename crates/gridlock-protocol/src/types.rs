//! Core protocol types for Gridlock's wire format.
//!
//! This module defines every structure that travels "on the wire" — the
//! JSON records that get serialized, sent over the transport, and
//! deserialized on the other side.
//!
//! The wire format is the contract with the browser client, so the serde
//! attributes here are load-bearing: message discriminators are
//! `snake_case` in a `type` field, field names are `camelCase`, and the
//! board is always a 9-element row-major array of `"X" | "O" | null`
//! (index 0 = top-left).

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Marks and the board
// ---------------------------------------------------------------------------

/// One of the two fixed symbols a participant plays as.
///
/// The first participant in a room always holds [`Mark::X`], the second
/// always [`Mark::O`]. Serializes as the bare string `"X"` / `"O"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn other(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::O => write!(f, "O"),
        }
    }
}

/// The 9 cells of a board in row-major order; `None` is an empty cell.
///
/// Serializes as a flat JSON array: `[null, "X", null, ...]`.
pub type Board = [Option<Mark>; 9];

// ---------------------------------------------------------------------------
// Client → server messages
// ---------------------------------------------------------------------------

/// Messages a client may send.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON — instead of
/// `{ "JoinRoom": { ... } }` the wire carries
/// `{ "type": "join_room", "roomCode": "K3M9P" }`, which is what the
/// browser client speaks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum ClientMessage {
    /// "Open a new room and seat me as the first mark."
    CreateRoom,

    /// "Seat me in the room with this code."
    ///
    /// The code is carried as a raw string and normalized (uppercased,
    /// validated) by the room layer — clients may type lowercase.
    JoinRoom { room_code: String },

    /// "Place my mark at this cell."
    ///
    /// Carried as `i64` so out-of-range values survive decoding and get
    /// a specific rejection from the turn-authority engine instead of a
    /// generic protocol error.
    Move { index: i64 },

    /// "Start this room's match over."
    Reset,
}

// ---------------------------------------------------------------------------
// Server → client messages
// ---------------------------------------------------------------------------

/// Messages the server sends.
///
/// `State` is the single canonical state-propagation shape: it is reused
/// for accepted moves and resets, and `Start` is its projection at match
/// start. Every client view is derivable from the last `State` alone —
/// there is no client-side diffing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum ServerMessage {
    /// "Your room is open; share the code with your opponent."
    RoomCreated { room_code: String, symbol: Mark },

    /// "You are seated; the match is about to start."
    RoomJoined { room_code: String, symbol: Mark },

    /// "Both seats are filled — play begins."
    Start { board: Board, current_turn: Mark },

    /// Full authoritative snapshot after every accepted mutation.
    ///
    /// `current_turn` is meaningful only while the match is live;
    /// `winner`/`line` are set together when a triple is completed;
    /// `draw` is set when the board filled with no winner.
    State {
        board: Board,
        current_turn: Mark,
        winner: Option<Mark>,
        line: Option<[usize; 3]>,
        draw: bool,
    },

    /// A rejection, delivered only to the requester.
    Error { message: String },

    /// "Your opponent disconnected; the room is gone."
    OpponentLeft,
}

// =========================================================================
// Tests
// =========================================================================

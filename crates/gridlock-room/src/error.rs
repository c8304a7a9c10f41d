//! Error types for the room layer.
//!
//! Two distinct taxonomies, matching how rejections are delivered:
//! [`RoomError`] covers room lifecycle (create/join/membership), while
//! [`MoveError`] covers game-rule violations caught by the turn-authority
//! engine. Both kinds go only to the requester and never mutate state.
//!
//! The `Display` strings double as the wire-level `error.message` text,
//! so they are phrased for the player, not the operator.

/// Room-lifecycle rejections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// No live room has this code (including codes that fail to parse —
    /// a malformed code can't name any room).
    #[error("Room not found.")]
    NotFound,

    /// Both seats are taken.
    #[error("Room is full.")]
    Full,

    /// The connection is already seated in a live room.
    #[error("Already in a room.")]
    AlreadyInRoom,

    /// The connection is not seated in any live room.
    #[error("Not in a room.")]
    NotInRoom,
}

/// Game-rule rejections from the turn-authority engine, in precondition
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// The match already has a winner or is drawn.
    #[error("Game is over.")]
    GameOver,

    /// The requester's mark is not the current turn owner.
    #[error("Not your turn.")]
    NotYourTurn,

    /// The cell index is outside `[0, 8]`.
    #[error("Invalid move.")]
    InvalidMove,

    /// The targeted cell is already occupied.
    #[error("Cell already taken.")]
    CellTaken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_is_wire_text() {
        // These strings ARE the protocol's error messages; changing one
        // changes what players see.
        assert_eq!(RoomError::NotFound.to_string(), "Room not found.");
        assert_eq!(RoomError::Full.to_string(), "Room is full.");
        assert_eq!(RoomError::AlreadyInRoom.to_string(), "Already in a room.");
        assert_eq!(RoomError::NotInRoom.to_string(), "Not in a room.");
        assert_eq!(MoveError::GameOver.to_string(), "Game is over.");
        assert_eq!(MoveError::NotYourTurn.to_string(), "Not your turn.");
        assert_eq!(MoveError::InvalidMove.to_string(), "Invalid move.");
        assert_eq!(MoveError::CellTaken.to_string(), "Cell already taken.");
    }
}

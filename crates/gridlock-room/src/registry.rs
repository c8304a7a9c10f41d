//! Room registry: maps codes to live rooms and owns code generation.
//!
//! The registry is plain data behind the server's mutex — its methods are
//! synchronous map operations, so the lock around it is held only for the
//! duration of an insert/lookup/delete, never across room replies or
//! network I/O. Joining, moving, and resetting all happen on a cloned
//! [`RoomHandle`] after the lock is released.

use std::collections::HashMap;

use crate::room::spawn_room;
use crate::{ParticipantSender, RoomCode, RoomHandle};

/// Process-wide mapping from room code to live room.
///
/// Invariants: a code maps to at most one live room; codes are never
/// reused while their room lives, but recirculate freely after removal.
/// Entries are lost on process exit — rooms are not persistent.
pub struct RoomRegistry {
    rooms: HashMap<RoomCode, RoomHandle>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
        }
    }

    /// Creates a room with `owner` seated as the first mark and returns
    /// its handle.
    ///
    /// The code is drawn uniformly from the 32-symbol alphabet and
    /// redrawn until it is absent from the registry. At ~1/32⁵ collision
    /// probability per draw the retry loop is unbounded but practically
    /// O(1).
    pub fn create_room(&mut self, owner: ParticipantSender) -> RoomHandle {
        let code = self.vacant_code();
        let handle = spawn_room(code.clone(), owner);
        self.rooms.insert(code, handle.clone());
        tracing::info!(
            code = %handle.code(),
            rooms = self.rooms.len(),
            "room created"
        );
        handle
    }

    fn vacant_code(&self) -> RoomCode {
        let mut rng = rand::rng();
        loop {
            let code = RoomCode::random(&mut rng);
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }

    /// Looks up the live room registered under `code`.
    pub fn lookup(&self, code: &RoomCode) -> Option<RoomHandle> {
        self.rooms.get(code).cloned()
    }

    /// Deletes `handle`'s registration, releasing its code.
    ///
    /// The entry is compared by room identity, not code alone: when both
    /// participants of a dead room race through cleanup, the loser must
    /// not tear down an unrelated room that recirculated the code in
    /// between.
    pub fn remove(&mut self, handle: &RoomHandle) -> Option<RoomHandle> {
        let code = handle.code();
        if self
            .rooms
            .get(code)
            .is_some_and(|entry| entry.same_room(handle))
        {
            let removed = self.rooms.remove(code);
            tracing::info!(
                %code,
                rooms = self.rooms.len(),
                "room destroyed"
            );
            removed
        } else {
            None
        }
    }

    /// Returns the number of live rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Returns `true` if no rooms are live.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================

//! Room codes: short human-typeable identifiers for live rooms.

use std::fmt;

use rand::Rng;

use crate::RoomError;

/// The 32-symbol code alphabet. Visually confusable glyphs (`I`, `O`,
/// `0`, `1`) are excluded so codes survive being read aloud or scribbled
/// on paper.
pub(crate) const CODE_ALPHABET: &[u8; 32] =
    b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Code length. 32^5 ≈ 33.5M combinations — collisions among live rooms
/// are rare enough that regenerate-on-collision is practically O(1).
pub(crate) const CODE_LEN: usize = 5;

/// A validated, normalized (uppercase) room code.
///
/// Codes are compared case-insensitively: [`RoomCode::parse`] uppercases
/// its input, so `"k3m9p"` and `"K3M9P"` name the same room.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomCode(String);

impl RoomCode {
    /// Parses and normalizes client-supplied input.
    ///
    /// # Errors
    /// Returns [`RoomError::NotFound`] for input of the wrong length or
    /// containing symbols outside the alphabet — such a code cannot name
    /// any live room, which is exactly what the requester is told.
    pub fn parse(input: &str) -> Result<Self, RoomError> {
        let normalized = input.trim().to_ascii_uppercase();
        if normalized.len() != CODE_LEN
            || !normalized.bytes().all(|b| CODE_ALPHABET.contains(&b))
        {
            return Err(RoomError::NotFound);
        }
        Ok(Self(normalized))
    }

    /// Draws a candidate code uniformly from the alphabet.
    ///
    /// Uniqueness among live rooms is the registry's job, not this
    /// function's.
    pub(crate) fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..CODE_LEN)
            .map(|_| {
                CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())]
                    as char
            })
            .collect();
        Self(code)
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

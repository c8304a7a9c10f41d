//! The authoritative match record and turn-authority engine.
//!
//! [`MatchState`] is mutated only through [`MatchState::apply_move`] and
//! [`MatchState::reset`]. After every mutation exactly one of these holds:
//! live with no terminal condition, finished with a detected winner, or
//! finished with a full board and no winner (draw).

use gridlock_protocol::{Board, Mark};

use crate::MoveError;

/// The 8 fixed winning triples: 3 rows, 3 columns, 2 diagonals.
///
/// Win detection scans these exhaustively in this order; the first match
/// wins. A single move can complete at most one triple, so the order is
/// only observable for externally-injected boards (tests).
pub const WINNING_TRIPLES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Returns the winning mark and its triple, scanning the fixed triples
/// in order.
pub fn winning_line(board: &Board) -> Option<(Mark, [usize; 3])> {
    for triple in WINNING_TRIPLES {
        let [a, b, c] = triple;
        if let Some(mark) = board[a] {
            if board[b] == Some(mark) && board[c] == Some(mark) {
                return Some((mark, triple));
            }
        }
    }
    None
}

/// The canonical state shape broadcast after every accepted mutation.
///
/// One snapshot fully determines a client's view — the same shape serves
/// moves, match start, and reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateSnapshot {
    /// Row-major board contents.
    pub board: Board,
    /// Whose turn it is. Meaningful only while the match is live.
    pub current_turn: Mark,
    /// The winning mark, once a triple is completed.
    pub winner: Option<Mark>,
    /// The completed triple's indices, set together with `winner`.
    pub line: Option<[usize; 3]>,
    /// True when the board filled with no winner.
    pub draw: bool,
}

/// The authoritative game record for one room.
#[derive(Debug, Clone)]
pub struct MatchState {
    board: Board,
    turn: Mark,
    active: bool,
    winner: Option<Mark>,
    line: Option<[usize; 3]>,
}

impl MatchState {
    /// A fresh match: empty board, first mark to move, live.
    pub fn new() -> Self {
        Self {
            board: [None; 9],
            turn: Mark::X,
            active: true,
            winner: None,
            line: None,
        }
    }

    /// Re-initializes in place. The room and its participants are
    /// untouched; callers broadcast the resulting snapshot exactly like
    /// a normal state update so both sides stay synchronized.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Returns the board contents.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the mark whose turn it is.
    pub fn turn(&self) -> Mark {
        self.turn
    }

    /// Returns `false` once the match has a winner or is drawn.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Builds the canonical broadcast snapshot of the current state.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            board: self.board,
            current_turn: self.turn,
            winner: self.winner,
            line: self.line,
            draw: !self.active && self.winner.is_none(),
        }
    }

    /// Validates and applies one move for `mark` at `index`.
    ///
    /// Preconditions are checked in a fixed order, each with its own
    /// rejection; a rejection mutates nothing. On acceptance the mark is
    /// written, termination is evaluated over [`WINNING_TRIPLES`], and
    /// either the match ends or the turn flips.
    ///
    /// # Errors
    /// - [`MoveError::GameOver`] — the match is no longer live
    /// - [`MoveError::NotYourTurn`] — `mark` is not the turn owner
    /// - [`MoveError::InvalidMove`] — `index` outside `[0, 8]`
    /// - [`MoveError::CellTaken`] — the cell is occupied
    pub fn apply_move(
        &mut self,
        mark: Mark,
        index: i64,
    ) -> Result<StateSnapshot, MoveError> {
        if !self.active {
            return Err(MoveError::GameOver);
        }
        if mark != self.turn {
            return Err(MoveError::NotYourTurn);
        }
        let cell = usize::try_from(index)
            .ok()
            .filter(|i| *i < self.board.len())
            .ok_or(MoveError::InvalidMove)?;
        if self.board[cell].is_some() {
            return Err(MoveError::CellTaken);
        }

        self.board[cell] = Some(mark);
        if let Some((winner, line)) = winning_line(&self.board) {
            self.winner = Some(winner);
            self.line = Some(line);
            self.active = false;
        } else if self.board.iter().all(Option::is_some) {
            self.active = false;
        } else {
            self.turn = self.turn.other();
        }
        Ok(self.snapshot())
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Plays a scripted alternating sequence, panicking on any rejection.
    fn play_out(state: &mut MatchState, moves: &[i64]) {
        for &index in moves {
            let mark = state.turn();
            state
                .apply_move(mark, index)
                .unwrap_or_else(|e| panic!("move at {index} rejected: {e}"));
        }
    }

    /// Builds a board directly from a compact pattern, 'X'/'O'/'.' per cell.
    fn board_from(pattern: &str) -> Board {
        let mut board: Board = [None; 9];
        for (i, ch) in pattern.chars().enumerate() {
            board[i] = match ch {
                'X' => Some(Mark::X),
                'O' => Some(Mark::O),
                _ => None,
            };
        }
        board
    }

    // =====================================================================
    // Initialization and reset
    // =====================================================================

    #[test]
    fn test_new_match_is_empty_live_and_x_to_move() {
        let state = MatchState::new();
        assert!(state.board().iter().all(Option::is_none));
        assert_eq!(state.turn(), Mark::X);
        assert!(state.is_active());

        let snapshot = state.snapshot();
        assert_eq!(snapshot.winner, None);
        assert_eq!(snapshot.line, None);
        assert!(!snapshot.draw);
    }

    #[test]
    fn test_reset_is_equivalent_to_fresh_state() {
        let mut state = MatchState::new();
        play_out(&mut state, &[4, 0, 8]);
        state.reset();
        assert_eq!(state.snapshot(), MatchState::new().snapshot());
    }

    #[test]
    fn test_reset_revives_a_finished_match() {
        let mut state = MatchState::new();
        play_out(&mut state, &[0, 3, 1, 4, 2]); // X wins top row
        assert!(!state.is_active());

        state.reset();
        assert!(state.is_active());
        assert!(state.apply_move(Mark::X, 4).is_ok());
    }

    // =====================================================================
    // Turn alternation
    // =====================================================================

    #[test]
    fn test_turn_flips_after_legal_move() {
        let mut state = MatchState::new();
        let snapshot = state.apply_move(Mark::X, 4).unwrap();
        assert_eq!(snapshot.current_turn, Mark::O);
        assert_eq!(state.turn(), Mark::O);

        let snapshot = state.apply_move(Mark::O, 0).unwrap();
        assert_eq!(snapshot.current_turn, Mark::X);
    }

    #[test]
    fn test_turn_does_not_flip_on_terminal_move() {
        let mut state = MatchState::new();
        play_out(&mut state, &[0, 3, 1, 4, 2]); // X completes [0,1,2]
        // The match is inactive; the turn value is unspecified to
        // callers and no further move may observe it.
        assert!(!state.is_active());
        assert_eq!(state.apply_move(Mark::O, 5), Err(MoveError::GameOver));
    }

    // =====================================================================
    // Rejections, in precondition order — each mutates nothing
    // =====================================================================

    #[test]
    fn test_rejects_move_when_game_over() {
        let mut state = MatchState::new();
        play_out(&mut state, &[0, 3, 1, 4, 2]);
        let before = state.snapshot();

        assert_eq!(state.apply_move(Mark::O, 8), Err(MoveError::GameOver));
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn test_rejects_move_out_of_turn() {
        let mut state = MatchState::new();
        let before = state.snapshot();

        assert_eq!(state.apply_move(Mark::O, 0), Err(MoveError::NotYourTurn));
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let mut state = MatchState::new();
        let before = state.snapshot();

        assert_eq!(state.apply_move(Mark::X, 9), Err(MoveError::InvalidMove));
        assert_eq!(state.apply_move(Mark::X, -1), Err(MoveError::InvalidMove));
        assert_eq!(
            state.apply_move(Mark::X, i64::MAX),
            Err(MoveError::InvalidMove)
        );
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn test_rejects_occupied_cell() {
        let mut state = MatchState::new();
        state.apply_move(Mark::X, 4).unwrap();
        let before = state.snapshot();

        assert_eq!(state.apply_move(Mark::O, 4), Err(MoveError::CellTaken));
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn test_game_over_outranks_other_rejections() {
        // Precondition order: an inactive match answers GameOver even for
        // a move that would also be out of turn and out of range.
        let mut state = MatchState::new();
        play_out(&mut state, &[0, 3, 1, 4, 2]);
        assert_eq!(state.apply_move(Mark::O, 99), Err(MoveError::GameOver));
    }

    // =====================================================================
    // Win detection
    // =====================================================================

    #[test]
    fn test_win_detection_covers_all_eight_triples() {
        for triple in WINNING_TRIPLES {
            let mut board: Board = [None; 9];
            for i in triple {
                board[i] = Some(Mark::X);
            }
            assert_eq!(
                winning_line(&board),
                Some((Mark::X, triple)),
                "triple {triple:?} not detected"
            );
        }
    }

    #[test]
    fn test_winning_line_reports_first_triple_in_scan_order() {
        // Only reachable by injection: two triples completed at once.
        // The fixed scan order makes the report deterministic.
        let board = board_from("XXXXXX...");
        assert_eq!(winning_line(&board), Some((Mark::X, [0, 1, 2])));
    }

    #[test]
    fn test_winning_line_ignores_empty_triples() {
        assert_eq!(winning_line(&[None; 9]), None);
        let board = board_from("XX.OO....");
        assert_eq!(winning_line(&board), None);
    }

    #[test]
    fn test_winning_move_ends_match_with_line() {
        let mut state = MatchState::new();
        // X: 0, 4 — O: 1, 2 — X: 8 completes the [0,4,8] diagonal.
        play_out(&mut state, &[0, 1, 4, 2]);
        let snapshot = state.apply_move(Mark::X, 8).unwrap();

        assert_eq!(snapshot.winner, Some(Mark::X));
        assert_eq!(snapshot.line, Some([0, 4, 8]));
        assert!(!snapshot.draw);
        assert!(!state.is_active());
    }

    #[test]
    fn test_o_can_win_too() {
        let mut state = MatchState::new();
        // X: 4, 5, 8 — O: 0, 3, 6 completes the left column.
        play_out(&mut state, &[4, 0, 5, 3]);
        state.apply_move(Mark::X, 8).unwrap();
        let snapshot = state.apply_move(Mark::O, 6).unwrap();

        assert_eq!(snapshot.winner, Some(Mark::O));
        assert_eq!(snapshot.line, Some([0, 3, 6]));
    }

    // =====================================================================
    // Draw
    // =====================================================================

    #[test]
    fn test_full_board_without_winner_is_draw() {
        let mut state = MatchState::new();
        // Produces X O X / X O O / O X X — no triple completed.
        play_out(&mut state, &[0, 1, 2, 4, 3, 5, 7, 6]);
        let snapshot = state.apply_move(Mark::X, 8).unwrap();

        assert!(snapshot.draw);
        assert_eq!(snapshot.winner, None);
        assert_eq!(snapshot.line, None);
        assert!(!state.is_active());
        assert_eq!(snapshot.board, board_from("XOXXOOOXX"));
    }

    #[test]
    fn test_win_on_final_cell_is_not_a_draw() {
        let mut state = MatchState::new();
        // X fills the last cell and completes [2,5,8] simultaneously.
        // X: 0, 4, 2, 5 — O: 1, 3, 6, 7.
        play_out(&mut state, &[0, 1, 4, 3, 2, 6, 5, 7]);
        let snapshot = state.apply_move(Mark::X, 8).unwrap();

        assert_eq!(snapshot.winner, Some(Mark::X));
        assert_eq!(snapshot.line, Some([2, 5, 8]));
        assert!(!snapshot.draw);
    }
}

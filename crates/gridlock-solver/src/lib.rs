//! Exhaustive-search automated opponent for single-player matches.
//!
//! The board has at most 9 cells, so the full game tree (bounded by 9!)
//! is cheap to enumerate — no pruning or heuristic evaluation is needed.
//! Completed positions score +1 when the solver's mark has won, −1 when
//! the opponent has, 0 for a draw; interior values back up by maximizing
//! on the solver's plies and minimizing on the opponent's.
//!
//! The solver is pure and synchronous: callers hand it a board and get an
//! index back, which keeps it equally usable from a server task or a
//! local single-player loop.

use gridlock_protocol::{Board, Mark};
use gridlock_room::winning_line;

/// Returns the optimal cell for `solver` to play on `board`.
///
/// Among empty cells in scan order, the first one achieving the optimal
/// backed-up score is chosen (ties break toward the lowest index, which
/// makes the opponent deterministic). Returns `None` when the position is
/// already terminal — won or full.
pub fn best_move(board: &Board, solver: Mark) -> Option<usize> {
    if winning_line(board).is_some() {
        return None;
    }

    let mut best: Option<(usize, i32)> = None;
    for index in empty_cells(board) {
        let mut next = *board;
        next[index] = Some(solver);
        let score = backed_up_score(&next, solver, solver.other());
        // Strictly-greater keeps the earliest cell on ties.
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((index, score));
        }
    }
    best.map(|(index, _)| index)
}

/// Depth-first value of `board` with `to_move` next to play.
fn backed_up_score(board: &Board, solver: Mark, to_move: Mark) -> i32 {
    if let Some((winner, _)) = winning_line(board) {
        return if winner == solver { 1 } else { -1 };
    }
    if board.iter().all(Option::is_some) {
        return 0;
    }

    let maximizing = to_move == solver;
    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for index in empty_cells(board) {
        let mut next = *board;
        next[index] = Some(to_move);
        let score = backed_up_score(&next, solver, to_move.other());
        best = if maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }
    best
}

fn empty_cells(board: &Board) -> impl Iterator<Item = usize> + '_ {
    board
        .iter()
        .enumerate()
        .filter(|(_, cell)| cell.is_none())
        .map(|(index, _)| index)
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a board from a compact pattern, 'X'/'O'/'.' per cell.
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

    #[test]
    fn test_takes_an_immediate_win() {
        // O completes the top row rather than doing anything else.
        let board = board_from("OO.XX....");
        assert_eq!(best_move(&board, Mark::O), Some(2));
    }

    #[test]
    fn test_blocks_an_immediate_loss() {
        // X threatens [0,1,2]; O must play 2.
        let board = board_from("XX...O...");
        assert_eq!(best_move(&board, Mark::O), Some(2));
    }

    #[test]
    fn test_prefers_winning_over_blocking() {
        // Both sides have two in a row; taking the win at 5 outranks
        // blocking X at 2.
        let board = board_from("XX.OO....");
        assert_eq!(best_move(&board, Mark::O), Some(5));
    }

    #[test]
    fn test_answers_corner_opening_with_center() {
        // After X takes a corner, the center is the only reply that
        // avoids a losing position. Everything else scores worse, so
        // exhaustive search must pick 4.
        let board = board_from("X........");
        assert_eq!(best_move(&board, Mark::O), Some(4));
    }

    #[test]
    fn test_first_move_tie_breaks_to_lowest_index() {
        // On an empty board every opening for the first player scores a
        // draw under perfect play, so the scan-order tie-break lands on
        // cell 0.
        assert_eq!(best_move(&[None; 9], Mark::X), Some(0));
    }

    #[test]
    fn test_terminal_positions_have_no_move() {
        // Already won:
        let board = board_from("XXXOO....");
        assert_eq!(best_move(&board, Mark::O), None);
        // Full board:
        let board = board_from("XOXXOOOXX");
        assert_eq!(best_move(&board, Mark::X), None);
    }

    #[test]
    fn test_self_play_always_draws() {
        // Two perfect players never produce a winner. This exercises the
        // whole tree from the empty board.
        let mut board: Board = [None; 9];
        let mut to_move = Mark::X;
        while let Some(index) = best_move(&board, to_move) {
            assert!(board[index].is_none(), "solver chose an occupied cell");
            board[index] = Some(to_move);
            to_move = to_move.other();
        }
        assert_eq!(winning_line(&board), None);
        assert!(board.iter().all(Option::is_some));
    }

    #[test]
    fn test_never_loses_against_every_first_move() {
        // Whatever X opens with, a perfect O never ends up losing.
        for opening in 0..9 {
            let mut board: Board = [None; 9];
            board[opening] = Some(Mark::X);
            let mut to_move = Mark::O;
            while let Some(index) = best_move(&board, to_move) {
                board[index] = Some(to_move);
                to_move = to_move.other();
            }
            match winning_line(&board) {
                None | Some((Mark::O, _)) => {}
                Some((Mark::X, line)) => {
                    panic!("O lost to opening {opening} via {line:?}")
                }
            }
        }
    }
}

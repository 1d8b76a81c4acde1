//! Minimax with alpha-beta pruning over a private scratch board.

use crate::games::tictactoe::{Board, Cell, Mark, Outcome, Position};
use std::ops::{Deref, DerefMut};
use tracing::{instrument, trace};

/// Score of a position won by the searching mark. Losses score the negation.
///
/// Scores are not discounted by depth, so a slow forced win ranks the same
/// as an immediate one.
pub const WIN_SCORE: i32 = 10;

/// Value of a searched node and the move that achieves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Minimax value from the searching mark's point of view.
    pub score: i32,
    /// Chosen move; `None` at terminal nodes.
    pub position: Option<Position>,
}

/// A mark placed on a borrowed board for the lifetime of the guard.
///
/// Dropping the guard clears the cell again, so every exit path of the
/// search leaves the board as it found it.
struct Placement<'a> {
    board: &'a mut Board,
    position: Position,
}

impl<'a> Placement<'a> {
    fn new(board: &'a mut Board, position: Position, mark: Mark) -> Self {
        board.set(position, Cell::Occupied(mark));
        Self { board, position }
    }
}

impl Deref for Placement<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for Placement<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for Placement<'_> {
    fn drop(&mut self) {
        self.board.revert_move(self.position);
    }
}

/// Searches `board` with `to_move` about to play, scoring for `ai`.
///
/// Moves are tried in [`Position::SEARCH_ORDER`]; among equal scores the
/// first one tried wins. The board is restored before returning.
pub fn search(board: &mut Board, ai: Mark, to_move: Mark, mut alpha: i32, mut beta: i32) -> SearchResult {
    match board.evaluate() {
        Outcome::Win { mark, .. } => {
            let score = if mark == ai { WIN_SCORE } else { -WIN_SCORE };
            return SearchResult {
                score,
                position: None,
            };
        }
        Outcome::Draw => {
            return SearchResult {
                score: 0,
                position: None,
            };
        }
        Outcome::Ongoing => {}
    }

    let maximizing = to_move == ai;
    let mut best = SearchResult {
        score: if maximizing { i32::MIN } else { i32::MAX },
        position: None,
    };

    for pos in Position::SEARCH_ORDER {
        if !board.is_empty(pos) {
            continue;
        }

        let score = {
            let mut scratch = Placement::new(board, pos, to_move);
            search(&mut scratch, ai, to_move.opponent(), alpha, beta).score
        };

        let improves = if maximizing {
            score > best.score
        } else {
            score < best.score
        };
        if best.position.is_none() || improves {
            best = SearchResult {
                score,
                position: Some(pos),
            };
        }

        if maximizing {
            alpha = alpha.max(score);
        } else {
            beta = beta.min(score);
        }
        if beta <= alpha {
            break;
        }
    }

    best
}

/// Perfect-play move for `ai`, which must be the mark to move.
///
/// Returns `None` when the game is already decided.
#[instrument(skip(board), fields(board = %board.display()))]
pub fn best_move(board: &Board, ai: Mark) -> Option<Position> {
    let mut scratch = *board;
    let result = search(&mut scratch, ai, ai, i32::MIN, i32::MAX);
    debug_assert_eq!(scratch, *board, "search must restore its scratch board");
    trace!(score = result.score, position = ?result.position, "Search finished");
    result.position
}

//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`]. Rules are kept apart from board storage
//! so the session, the search engine and the invariants share one definition.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{WIN_LINES, WinLine, check_winner};

use super::{Board, Outcome};

/// Evaluates a board: a win on the first completed line in table order,
/// otherwise a draw when full, otherwise ongoing.
pub fn evaluate(board: &Board) -> Outcome {
    if let Some((mark, line)) = check_winner(board) {
        return Outcome::Win { mark, line };
    }
    if is_full(board) {
        Outcome::Draw
    } else {
        Outcome::Ongoing
    }
}

//! Replay invariant: the played moves rebuild the current board.

use super::super::{Board, Cell};
use super::{Invariant, Recorded};

/// Invariant: replaying `played` from an empty board yields the current board.
///
/// Every replayed move must also land on an empty cell, so a cell is never
/// overwritten by history.
pub struct ReplayConsistentInvariant;

impl<S: Recorded> Invariant<S> for ReplayConsistentInvariant {
    fn holds(state: &S) -> bool {
        let mut reconstructed = Board::new();

        for mv in state.history().played() {
            if !reconstructed.is_empty(mv.position) {
                return false;
            }
            reconstructed.set(mv.position, Cell::Occupied(mv.mark));
        }

        reconstructed == *state.board()
    }

    fn description() -> &'static str {
        "Replaying the played moves reconstructs the board"
    }
}

//! Move history with undo/redo stacks and rewind ("time travel").

use super::action::{Move, MoveError};
use super::types::{Board, Cell};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Played moves plus a LIFO stack of moves that can be redone.
///
/// Replaying `played` from an empty board always reconstructs the
/// current board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    played: Vec<Move>,
    undone: Vec<Move>,
}

impl History {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves in the order they were played.
    pub fn played(&self) -> &[Move] {
        &self.played
    }

    /// Redo stack; the last element is redone first.
    pub fn undone(&self) -> &[Move] {
        &self.undone
    }

    /// The move [`History::redo`] would reinstate.
    pub fn peek_redo(&self) -> Option<&Move> {
        self.undone.last()
    }

    /// Most recently played move.
    pub fn last(&self) -> Option<&Move> {
        self.played.last()
    }

    /// Appends a fresh move. Any fresh move forfeits the redo branch.
    #[instrument(skip(self))]
    pub fn record(&mut self, mv: Move) {
        self.played.push(mv);
        if !self.undone.is_empty() {
            debug!(discarded = self.undone.len(), "Clearing redo stack");
            self.undone.clear();
        }
    }

    /// Moves the last played move onto the redo stack.
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> Option<Move> {
        let mv = self.played.pop()?;
        self.undone.push(mv);
        Some(mv)
    }

    /// Reinstates the top of the redo stack without disturbing the rest of it.
    #[instrument(skip(self))]
    pub fn redo(&mut self) -> Option<Move> {
        let mv = self.undone.pop()?;
        self.played.push(mv);
        Some(mv)
    }

    /// Keeps `played[..=index]` and turns the rest into the redo stack,
    /// most recent first. Index `-1` rewinds to the empty board.
    ///
    /// Returns the reconstructed board.
    ///
    /// # Errors
    ///
    /// [`MoveError::RewindOutOfRange`] when `index` is outside `[-1, len - 1]`.
    #[instrument(skip(self))]
    pub fn rewind_to(&mut self, index: isize) -> Result<Board, MoveError> {
        let len = self.played.len();
        if index < -1 || index >= len as isize {
            return Err(MoveError::RewindOutOfRange { index, len });
        }
        let keep = (index + 1) as usize;
        let mut suffix = self.played.split_off(keep);
        suffix.reverse();
        self.undone = suffix;
        debug!(kept = keep, redoable = self.undone.len(), "Rewound history");
        Ok(self.replay())
    }

    /// Rebuilds the board by replaying `played` from empty.
    pub fn replay(&self) -> Board {
        let mut board = Board::new();
        for mv in &self.played {
            board.set(mv.position, Cell::Occupied(mv.mark));
        }
        board
    }

    /// Forgets everything.
    pub fn clear(&mut self) {
        self.played.clear();
        self.undone.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::{Mark, Position};

    fn five_moves() -> History {
        let mut history = History::new();
        for (i, idx) in [4usize, 0, 2, 6, 3].iter().enumerate() {
            let mark = if i % 2 == 0 { Mark::X } else { Mark::O };
            let pos = Position::from_index(*idx).unwrap();
            history.record(Move::new(pos, mark));
        }
        history
    }

    #[test]
    fn test_undo_on_empty_is_soft() {
        let mut history = History::new();
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn test_redo_keeps_remaining_stack() {
        let mut history = five_moves();
        history.undo();
        history.undo();
        history.undo();
        assert_eq!(history.undone().len(), 3);

        let redone = history.redo().unwrap();
        assert_eq!(redone.position, Position::TopRight);
        assert_eq!(history.undone().len(), 2);
        assert_eq!(history.played().len(), 3);
    }

    #[test]
    fn test_fresh_move_clears_redo() {
        let mut history = five_moves();
        history.undo();
        history.undo();
        history.record(Move::new(Position::BottomRight, Mark::O));
        assert!(history.undone().is_empty());
        assert_eq!(history.played().len(), 4);
    }

    #[test]
    fn test_rewind_splits_history() {
        let mut history = five_moves();
        let board = history.rewind_to(1).unwrap();
        assert_eq!(history.played().len(), 2);
        assert_eq!(history.undone().len(), 3);
        // Oldest truncated move is redone first.
        assert_eq!(history.peek_redo().unwrap().position, Position::TopRight);
        assert_eq!(board, history.replay());
        assert_eq!(board.count(Mark::X), 1);
        assert_eq!(board.count(Mark::O), 1);
    }

    #[test]
    fn test_rewind_to_empty_board() {
        let mut history = five_moves();
        let board = history.rewind_to(-1).unwrap();
        assert_eq!(board, Board::new());
        assert!(history.played().is_empty());
        assert_eq!(history.undone().len(), 5);
    }

    #[test]
    fn test_rewind_out_of_range() {
        let mut history = five_moves();
        let before = history.clone();
        assert_eq!(
            history.rewind_to(5),
            Err(MoveError::RewindOutOfRange { index: 5, len: 5 })
        );
        assert_eq!(
            history.rewind_to(-2),
            Err(MoveError::RewindOutOfRange { index: -2, len: 5 })
        );
        assert_eq!(history, before);
    }
}

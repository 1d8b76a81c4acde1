//! First-class action types for tic-tac-toe.
//!
//! Moves are domain events, not side effects. They can be recorded,
//! replayed, relayed to a peer and undone.

use super::{Mark, Position};
use serde::{Deserialize, Serialize};

/// A move in tic-tac-toe: a mark placed at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct Move {
    /// The position where the mark is placed.
    pub position: Position,
    /// The mark placed.
    pub mark: Mark,
}

impl Move {
    /// Returns the position of this move.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns the mark of this move.
    pub fn mark(&self) -> Mark {
        self.mark
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.mark, self.position.label())
    }
}

/// Why a requested transition was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// Index is not a board position.
    #[display("Position {} is out of range (must be 0-8)", _0)]
    OutOfRange(usize),

    /// The cell at the position is already occupied.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(Position),

    /// The game is already over.
    #[display("Game is already over")]
    GameOver,

    /// The requester may not move now.
    #[display("{} may not move while {} is to move", mark, to_move)]
    WrongTurn {
        /// Mark that asked to move.
        mark: Mark,
        /// Mark whose turn it is.
        to_move: Mark,
    },

    /// Nothing has been played.
    #[display("Nothing to undo")]
    NothingToUndo,

    /// The redo stack is empty.
    #[display("Nothing to redo")]
    NothingToRedo,

    /// Rewind target outside `[-1, len - 1]`.
    #[display("Cannot rewind to move {} of {}", index, len)]
    RewindOutOfRange {
        /// Requested index.
        index: isize,
        /// Number of played moves.
        len: usize,
    },
}

impl std::error::Error for MoveError {}

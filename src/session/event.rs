//! Outbound events and session snapshots.

use super::command::{Mode, Origin};
use crate::ai::Difficulty;
use crate::games::tictactoe::{Board, Mark, Move, Outcome, WinLine};
use crate::scores::Scores;
use serde::{Deserialize, Serialize};

/// Read-only view of a session for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Current board.
    pub board: Board,
    /// Mark to move next.
    pub to_move: Mark,
    /// Game outcome so far.
    pub outcome: Outcome,
    /// Moves in play order.
    pub played: Vec<Move>,
    /// Number of moves that can be redone.
    pub redo_depth: usize,
    /// Score counters.
    pub scores: Scores,
    /// Active mode.
    pub mode: Mode,
    /// Active AI tier.
    pub difficulty: Difficulty,
    /// Structural generation counter.
    pub generation: u64,
    /// The computer owns the current turn.
    pub ai_to_play: bool,
}

/// Something that happened to the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Emitted last after every accepted transition.
    StateChanged(SessionSnapshot),
    /// A fresh move was placed.
    MoveAccepted {
        /// The move.
        mv: Move,
        /// Requester.
        origin: Origin,
    },
    /// The last move was taken back.
    UndoApplied {
        /// The move taken back.
        mv: Move,
        /// Requester.
        origin: Origin,
    },
    /// An undone move was reinstated.
    RedoApplied {
        /// The move reinstated.
        mv: Move,
        /// Requester.
        origin: Origin,
    },
    /// A new game started.
    Reset {
        /// Requester.
        origin: Origin,
    },
    /// History was rewound to just after move `index`.
    Rewound {
        /// Last kept move (`-1` = none).
        index: isize,
    },
    /// Mode switched; the board was cleared.
    ModeChanged {
        /// New mode.
        mode: Mode,
    },
    /// `mark` completed `line`.
    Win {
        /// Winner.
        mark: Mark,
        /// Completed line.
        line: WinLine,
    },
    /// Board filled without a winner.
    Draw,
}

//! Tic-tac-toe: board model, rules, move history and invariants.

mod action;
mod history;
pub mod invariants;
mod position;
pub mod rules;
mod types;

pub use action::{Move, MoveError};
pub use history::History;
pub use invariants::{
    BalancedMarksInvariant, Invariant, InvariantSet, InvariantViolation, Recorded,
    ReplayConsistentInvariant, TicTacToeInvariants,
};
pub use position::Position;
pub use rules::{WIN_LINES, WinLine};
pub use types::{Board, Cell, Mark, Outcome};

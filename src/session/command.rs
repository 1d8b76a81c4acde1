//! Inbound requests and the modes that govern them.

use crate::ai::{AiReply, Difficulty};
use crate::games::tictactoe::Mark;
use serde::{Deserialize, Serialize};

/// Where a request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Origin {
    /// This side: keyboard, local AI.
    Local,
    /// The connected peer. Trusted to have checked its own turn.
    Remote,
}

/// Who controls which mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Two humans on one device.
    #[default]
    HumanVsHuman,
    /// The computer plays `ai`.
    HumanVsAi {
        /// Mark controlled by the computer.
        ai: Mark,
    },
    /// Networked play; this side is bound to `me` for the whole session.
    Online {
        /// Mark bound to this side.
        me: Mark,
    },
}

impl Mode {
    /// Mark played by the computer, if any.
    pub fn ai_mark(&self) -> Option<Mark> {
        match self {
            Mode::HumanVsAi { ai } => Some(*ai),
            _ => None,
        }
    }

    /// Mark bound to this side in online play.
    pub fn online_mark(&self) -> Option<Mark> {
        match self {
            Mode::Online { me } => Some(*me),
            _ => None,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::HumanVsHuman => write!(f, "Human vs human"),
            Mode::HumanVsAi { ai } => write!(f, "Human vs AI ({} is AI)", ai),
            Mode::Online { me } => write!(f, "Online (you are {})", me),
        }
    }
}

/// A request processed by [`GameSession::dispatch`](super::GameSession::dispatch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Place `mark` at board index `position`.
    Move {
        /// Board index; anything outside 0-8 is rejected.
        position: usize,
        /// Mark to place.
        mark: Mark,
        /// Requester.
        origin: Origin,
    },
    /// Take back the last move.
    Undo {
        /// Requester.
        origin: Origin,
    },
    /// Reinstate the last undone move.
    Redo {
        /// Requester.
        origin: Origin,
    },
    /// Jump back to just after move `index` (`-1` = empty board).
    RewindTo {
        /// Index into the played moves.
        index: isize,
    },
    /// Start over.
    NewGame {
        /// Requester.
        origin: Origin,
    },
    /// Change the AI tier.
    SetDifficulty(Difficulty),
    /// Enter online play bound to this mark.
    BindOnlineMark(Mark),
    /// Change mode; starts a new game.
    SetMode(Mode),
    /// Zero the score counters.
    ResetScores,
    /// Result of an AI search.
    AiReply(AiReply),
}

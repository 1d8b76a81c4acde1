//! Wire messages exchanged with a remote peer.
//!
//! One JSON object per line, tagged by `type`:
//! `{"type":"move","position":4,"mark":"X"}`, `{"type":"undo"}`,
//! `{"type":"redo"}`, `{"type":"reset"}`, `{"type":"assign","me":"O","you":"X"}`.
//! Delivery and ordering are the transport's business.

use crate::games::tictactoe::Mark;
use crate::session::{Command, Origin, SessionEvent};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A message on the peer link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WireMessage {
    /// A move made by the sender.
    Move {
        /// Board index 0-8.
        position: usize,
        /// Mark placed.
        mark: Mark,
    },
    /// Sender took back the last move.
    Undo,
    /// Sender reinstated an undone move.
    Redo,
    /// Sender started a new game.
    Reset,
    /// Mark assignment from the host: `me` is the receiver's mark.
    Assign {
        /// Receiver's mark.
        me: Mark,
        /// Sender's mark.
        you: Mark,
    },
}

impl WireMessage {
    /// Maps an inbound message to a remote-origin command.
    pub fn into_command(self) -> Command {
        let origin = Origin::Remote;
        match self {
            WireMessage::Move { position, mark } => Command::Move {
                position,
                mark,
                origin,
            },
            WireMessage::Undo => Command::Undo { origin },
            WireMessage::Redo => Command::Redo { origin },
            WireMessage::Reset => Command::NewGame { origin },
            WireMessage::Assign { me, .. } => Command::BindOnlineMark(me),
        }
    }

    /// Message to relay for a session event, if any.
    ///
    /// Only locally originated moves, undos, redos and resets are relayed;
    /// echoing remote ones would bounce them back to their sender.
    pub fn from_event(event: &SessionEvent) -> Option<Self> {
        match event {
            SessionEvent::MoveAccepted {
                mv,
                origin: Origin::Local,
            } => Some(WireMessage::Move {
                position: mv.position.to_index(),
                mark: mv.mark,
            }),
            SessionEvent::UndoApplied {
                origin: Origin::Local,
                ..
            } => Some(WireMessage::Undo),
            SessionEvent::RedoApplied {
                origin: Origin::Local,
                ..
            } => Some(WireMessage::Redo),
            SessionEvent::Reset {
                origin: Origin::Local,
            } => Some(WireMessage::Reset),
            _ => None,
        }
    }

    /// Serializes to a single JSON line (without the newline).
    #[instrument]
    pub fn encode(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses one JSON line.
    #[instrument]
    pub fn decode(line: &str) -> Result<Self, WireError> {
        Ok(serde_json::from_str(line.trim())?)
    }
}

/// Malformed or unencodable wire message.
#[derive(Debug, Clone, Display, Error)]
#[display("Wire error: {} at {}:{}", message, file, line)]
pub struct WireError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl WireError {
    /// Creates a new wire error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<serde_json::Error> for WireError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("JSON error: {}", err))
    }
}

//! tictactoe_pro library - tic-tac-toe engine, AI and session
//!
//! # Architecture
//!
//! - **Games**: board model, win/draw rules, move history with undo/redo/rewind
//! - **AI**: minimax with alpha-beta pruning behind Easy/Medium/Hard tiers
//! - **Session**: the game state machine; commands in, events out
//! - **Wire/Transport**: line-delimited JSON relay to a LAN peer
//! - **Console**: terminal front end driving a session
//!
//! # Example
//!
//! ```
//! use tictactoe_pro::{Command, GameSession, Mark, Origin, Outcome};
//!
//! let mut session = GameSession::local();
//! for (position, mark) in [(0, Mark::X), (3, Mark::O), (1, Mark::X), (4, Mark::O), (2, Mark::X)] {
//!     assert!(session.dispatch(Command::Move { position, mark, origin: Origin::Local }));
//! }
//! assert_eq!(session.outcome().winner(), Some(Mark::X));
//! assert!(matches!(session.outcome(), Outcome::Win { .. }));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod ai;
pub mod config;
pub mod console;
pub mod games;
pub mod scores;
pub mod session;
pub mod transport;
pub mod wire;

// Crate-level exports - AI
pub use ai::{AiReply, AiRequest, Difficulty, pick_move};

// Crate-level exports - Configuration
pub use config::{ConfigError, PlayMode, Settings};

// Crate-level exports - Scores
pub use scores::{MemoryScores, ScoreFile, ScoreKeeper, Scores, StoreError};

// Crate-level exports - Session
pub use session::{Command, GameSession, Mode, Origin, SessionEvent, SessionSnapshot};

// Crate-level exports - Networking
pub use transport::{PeerLink, PeerListener, TransportError};
pub use wire::{WireError, WireMessage};

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::{
    Board, Cell, History, Mark, Move, MoveError, Outcome, Position, WIN_LINES, WinLine,
};

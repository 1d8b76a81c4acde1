//! Computer opponent.
//!
//! Three tiers choose moves per call:
//! - **Easy**: uniform random among empty cells
//! - **Medium**: the Hard move 60% of the time, otherwise random
//! - **Hard**: perfect play via [`minimax::search`]
//!
//! The session never runs the search itself. It hands out an [`AiRequest`]
//! stamped with its generation, and the driver feeds the resulting
//! [`AiReply`] back; replies for a superseded generation are dropped.

pub mod minimax;

pub use minimax::{SearchResult, WIN_SCORE, best_move, search};

use crate::games::tictactoe::{Board, Mark, Move, Position};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Probability that the Medium tier plays the Hard move.
pub const MEDIUM_BEST_MOVE_PROBABILITY: f64 = 0.6;

/// AI difficulty tier.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Random moves.
    Easy,
    /// Mostly perfect, sometimes random.
    Medium,
    /// Perfect play.
    #[default]
    Hard,
}

/// Chooses a move for `ai` on `board` at the given tier.
///
/// Returns `None` when the game is decided or the board is full.
#[instrument(skip(board, rng))]
pub fn pick_move<R: Rng + ?Sized>(
    board: &Board,
    ai: Mark,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<Position> {
    if board.evaluate().is_terminal() {
        return None;
    }
    let empty = board.empty_positions();

    let choice = match difficulty {
        Difficulty::Easy => empty.choose(rng).copied(),
        Difficulty::Medium => {
            if rng.gen_bool(MEDIUM_BEST_MOVE_PROBABILITY) {
                best_move(board, ai)
            } else {
                empty.choose(rng).copied()
            }
        }
        Difficulty::Hard => best_move(board, ai),
    };

    debug!(position = ?choice, "AI picked move");
    choice
}

/// A pending AI turn handed out by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_new::new)]
pub struct AiRequest {
    /// Session generation the request was issued for.
    pub generation: u64,
    /// Copy of the board at issue time.
    pub board: Board,
    /// Mark the AI plays.
    pub mark: Mark,
    /// Tier in force when the request was issued.
    pub difficulty: Difficulty,
}

/// The AI's answer to an [`AiRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_new::new)]
pub struct AiReply {
    /// Generation copied from the request.
    pub generation: u64,
    /// Chosen move, if any move was possible.
    pub mv: Option<Move>,
}

impl AiRequest {
    /// Computes the reply synchronously.
    #[instrument(skip(self, rng), fields(generation = self.generation, mark = %self.mark))]
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> AiReply {
        let mv = pick_move(&self.board, self.mark, self.difficulty, rng)
            .map(|position| Move::new(position, self.mark));
        AiReply::new(self.generation, mv)
    }

    /// Waits out the cosmetic `delay`, then searches on a blocking worker.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub async fn resolve_after(self, delay: Duration) -> AiReply {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let generation = self.generation;
        tokio::task::spawn_blocking(move || self.resolve(&mut rand::thread_rng()))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "AI worker failed");
                AiReply::new(generation, None)
            })
    }
}

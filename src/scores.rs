//! Score keeping collaborator.
//!
//! The session reports wins and draws to an injected [`ScoreKeeper`]; it
//! never owns persistence itself.

use crate::games::tictactoe::Mark;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Win/draw counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    /// Games won by X.
    pub x: u32,
    /// Games won by O.
    pub o: u32,
    /// Drawn games.
    pub draws: u32,
}

impl Scores {
    /// Number of finished games.
    pub fn total(&self) -> u32 {
        self.x + self.o + self.draws
    }

    /// Wins for `mark`.
    pub fn wins(&self, mark: Mark) -> u32 {
        match mark {
            Mark::X => self.x,
            Mark::O => self.o,
        }
    }

    /// Percentage of finished games won by `mark`, rounded; 0 with no games.
    pub fn win_rate(&self, mark: Mark) -> u32 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        ((f64::from(self.wins(mark)) / f64::from(total)) * 100.0).round() as u32
    }
}

/// Receives game results from the session.
pub trait ScoreKeeper: std::fmt::Debug {
    /// Counts a win for `mark`.
    fn record_win(&mut self, mark: Mark) -> Result<(), StoreError>;

    /// Counts a draw.
    fn record_draw(&mut self) -> Result<(), StoreError>;

    /// Zeroes all counters.
    fn reset(&mut self) -> Result<(), StoreError>;

    /// Current counters.
    fn scores(&self) -> Scores;
}

/// Counters that live as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryScores {
    scores: Scores,
}

impl MemoryScores {
    /// Starts from zero.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreKeeper for MemoryScores {
    fn record_win(&mut self, mark: Mark) -> Result<(), StoreError> {
        match mark {
            Mark::X => self.scores.x += 1,
            Mark::O => self.scores.o += 1,
        }
        Ok(())
    }

    fn record_draw(&mut self) -> Result<(), StoreError> {
        self.scores.draws += 1;
        Ok(())
    }

    fn reset(&mut self) -> Result<(), StoreError> {
        self.scores = Scores::default();
        Ok(())
    }

    fn scores(&self) -> Scores {
        self.scores
    }
}

/// Counters persisted as JSON, rewritten after every change.
#[derive(Debug, Clone)]
pub struct ScoreFile {
    path: PathBuf,
    scores: Scores,
}

impl ScoreFile {
    /// Opens the score file at `path`, starting from zero if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let scores = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| StoreError::new(format!("Failed to read score file: {}", e)))?;
            serde_json::from_str(&content)
                .map_err(|e| StoreError::new(format!("Failed to parse score file: {}", e)))?
        } else {
            debug!("Score file missing, starting from zero");
            Scores::default()
        };
        info!(x = scores.x, o = scores.o, draws = scores.draws, "Scores loaded");
        Ok(Self { path, scores })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn persist(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.scores)
            .map_err(|e| StoreError::new(format!("Failed to encode scores: {}", e)))?;
        std::fs::write(&self.path, json)
            .map_err(|e| StoreError::new(format!("Failed to write score file: {}", e)))?;
        debug!("Scores written");
        Ok(())
    }
}

impl ScoreKeeper for ScoreFile {
    fn record_win(&mut self, mark: Mark) -> Result<(), StoreError> {
        match mark {
            Mark::X => self.scores.x += 1,
            Mark::O => self.scores.o += 1,
        }
        self.persist()
    }

    fn record_draw(&mut self) -> Result<(), StoreError> {
        self.scores.draws += 1;
        self.persist()
    }

    fn reset(&mut self) -> Result<(), StoreError> {
        self.scores = Scores::default();
        self.persist()
    }

    fn scores(&self) -> Scores {
        self.scores
    }
}

/// Score persistence error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Score store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_rate_rounds() {
        let scores = Scores { x: 2, o: 0, draws: 1 };
        assert_eq!(scores.win_rate(Mark::X), 67);
        assert_eq!(scores.win_rate(Mark::O), 0);
        assert_eq!(Scores::default().win_rate(Mark::X), 0);
    }

    #[test]
    fn test_memory_scores_count() {
        let mut keeper = MemoryScores::new();
        keeper.record_win(Mark::O).unwrap();
        keeper.record_draw().unwrap();
        keeper.record_draw().unwrap();
        assert_eq!(keeper.scores(), Scores { x: 0, o: 1, draws: 2 });
        keeper.reset().unwrap();
        assert_eq!(keeper.scores().total(), 0);
    }
}

//! Persisted preferences.

use crate::ai::Difficulty;
use crate::games::tictactoe::Mark;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// How the local player wants to play.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PlayMode {
    /// Two humans sharing one terminal.
    #[default]
    Human,
    /// Human against the computer.
    Ai,
    /// Against a remote peer.
    Online,
}

/// User preferences, stored as TOML.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Settings {
    /// Preferred play mode.
    #[serde(default)]
    mode: PlayMode,

    /// AI tier.
    #[serde(default)]
    difficulty: Difficulty,

    /// Mark the computer plays in AI mode.
    #[serde(default = "default_ai_mark")]
    ai_mark: Mark,

    /// Cosmetic pause before the AI answers, in milliseconds.
    #[serde(default = "default_ai_delay_ms")]
    ai_delay_ms: u64,

    /// JSON file for persisted scores; scores stay in memory when unset.
    #[serde(default)]
    scores_path: Option<PathBuf>,

    /// TCP port used when hosting an online game.
    #[serde(default = "default_port")]
    port: u16,
}

fn default_ai_mark() -> Mark {
    Mark::O
}

fn default_ai_delay_ms() -> u64 {
    260
}

fn default_port() -> u16 {
    4560
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: PlayMode::default(),
            difficulty: Difficulty::default(),
            ai_mark: default_ai_mark(),
            ai_delay_ms: default_ai_delay_ms(),
            scores_path: None,
            port: default_port(),
        }
    }
}

impl Settings {
    /// Loads settings from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading settings from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let settings: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(mode = %settings.mode, difficulty = %settings.difficulty, "Settings loaded");
        Ok(settings)
    }

    /// Loads settings, falling back to defaults when the file does not exist.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("No settings file, using defaults");
            Ok(Self::default())
        }
    }

    /// Writes settings as TOML.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::new(format!("Failed to encode config: {}", e)))?;
        std::fs::write(path.as_ref(), content)
            .map_err(|e| ConfigError::new(format!("Failed to write config file: {}", e)))?;
        info!("Settings saved");
        Ok(())
    }

    /// Sets the play mode.
    pub fn set_mode(&mut self, mode: PlayMode) {
        self.mode = mode;
    }

    /// Sets the AI tier.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// Sets the mark the computer plays.
    pub fn set_ai_mark(&mut self, mark: Mark) {
        self.ai_mark = mark;
    }

    /// Sets the score file.
    pub fn set_scores_path(&mut self, path: Option<PathBuf>) {
        self.scores_path = path;
    }

    /// Sets the hosting port.
    pub fn set_port(&mut self, port: u16) {
        self.port = port;
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

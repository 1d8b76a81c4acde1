//! Command-line interface for tictactoe_pro.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tictactoe_pro::{Difficulty, Mark, PlayMode};

/// Tic-tac-toe with undo/redo, time travel, a minimax opponent and LAN play
#[derive(Parser, Debug)]
#[command(name = "tictactoe_pro")]
#[command(about = "Tic-tac-toe in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Settings file (TOML); defaults are used if it does not exist
    #[arg(long, global = true, default_value = "tictactoe.toml")]
    pub config: PathBuf,

    /// Persist scores to this JSON file (overrides the settings file)
    #[arg(long, global = true)]
    pub scores: Option<PathBuf>,

    /// Subcommand to run (defaults to `play`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play on this terminal
    Play {
        /// human or ai (online play uses `host`/`join`)
        #[arg(long)]
        mode: Option<PlayMode>,

        /// easy, medium or hard
        #[arg(short, long)]
        difficulty: Option<Difficulty>,

        /// Mark played by the computer
        #[arg(long)]
        ai_mark: Option<Mark>,

        /// Save the effective settings back to the settings file
        #[arg(long)]
        save: bool,
    },

    /// Host an online game and wait for one opponent
    Host {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Join an online game
    Join {
        /// Host address, e.g. 192.168.1.20:4560
        addr: String,
    },

    /// Let the computer play itself and print the tally
    Selfplay {
        /// Number of games
        #[arg(short, long, default_value = "100")]
        games: u32,

        /// Tier playing X
        #[arg(long, default_value = "hard")]
        x_level: Difficulty,

        /// Tier playing O
        #[arg(long, default_value = "hard")]
        o_level: Difficulty,
    },
}

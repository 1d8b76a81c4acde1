//! tictactoe_pro - terminal tic-tac-toe
//!
//! Local two-player, human-vs-AI and LAN play on one binary.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::time::Duration;
use tictactoe_pro::{
    GameSession, MemoryScores, PeerLink, PlayMode, ScoreFile, ScoreKeeper, Settings, console,
};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // stdout belongs to the board; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::load_or_default(&cli.config)?;
    if let Some(path) = cli.scores.clone() {
        settings.set_scores_path(Some(path));
    }

    let command = cli.command.unwrap_or(Command::Play {
        mode: None,
        difficulty: None,
        ai_mark: None,
        save: false,
    });

    match command {
        Command::Play {
            mode,
            difficulty,
            ai_mark,
            save,
        } => {
            if let Some(mode) = mode {
                settings.set_mode(mode);
            }
            if let Some(difficulty) = difficulty {
                settings.set_difficulty(difficulty);
            }
            if let Some(mark) = ai_mark {
                settings.set_ai_mark(mark);
            }
            if save {
                settings.save(&cli.config)?;
            }
            run_play(settings).await
        }
        Command::Host { port } => {
            let port = port.unwrap_or(*settings.port());
            run_host(settings, port).await
        }
        Command::Join { addr } => run_join(settings, &addr).await,
        Command::Selfplay {
            games,
            x_level,
            o_level,
        } => {
            let scores = console::self_play(games, x_level, o_level, &mut rand::thread_rng());
            println!(
                "{} games, X ({}) won {}, O ({}) won {}, {} draws",
                scores.total(),
                x_level,
                scores.x,
                o_level,
                scores.o,
                scores.draws
            );
            Ok(())
        }
    }
}

/// Opens the configured score store.
fn open_scores(settings: &Settings) -> Result<Box<dyn ScoreKeeper + Send>> {
    Ok(match settings.scores_path() {
        Some(path) => Box::new(ScoreFile::open(path)?),
        None => Box::new(MemoryScores::new()),
    })
}

/// Play on this terminal
#[instrument(skip_all)]
async fn run_play(settings: Settings) -> Result<()> {
    if *settings.mode() == PlayMode::Online {
        warn!("Online mode needs `host` or `join`; starting a local game");
        println!("Use `host` or `join` for online play. Starting a local game.");
    }
    let session = GameSession::from_settings(&settings, open_scores(&settings)?);
    let delay = Duration::from_millis(*settings.ai_delay_ms());
    console::run_local(session, delay).await
}

/// Host an online game
#[instrument(skip(settings))]
async fn run_host(settings: Settings, port: u16) -> Result<()> {
    println!("Waiting for an opponent on port {}...", port);
    let (link, me) = PeerLink::host(port).await?;
    info!(peer = %link.peer(), %me, "Opponent joined");
    let session = GameSession::from_settings(&settings, open_scores(&settings)?);
    console::run_online(session, link, me).await
}

/// Join an online game
#[instrument(skip(settings))]
async fn run_join(settings: Settings, addr: &str) -> Result<()> {
    println!("Connecting to {}...", addr);
    let (link, me) = PeerLink::join(addr).await?;
    let session = GameSession::from_settings(&settings, open_scores(&settings)?);
    console::run_online(session, link, me).await
}

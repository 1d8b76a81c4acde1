//! Tests for settings files and persisted scores.

use std::fs;
use tempfile::TempDir;

use tictactoe_pro::{
    Command, Difficulty, GameSession, Mark, Mode, Origin, PlayMode, ScoreFile, ScoreKeeper,
    Scores, Settings,
};

#[test]
fn test_missing_settings_fall_back_to_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let settings = Settings::load_or_default(dir.path().join("absent.toml")).expect("Load failed");
    assert_eq!(settings, Settings::default());
    assert_eq!(*settings.difficulty(), Difficulty::Hard);
    assert_eq!(*settings.ai_mark(), Mark::O);
    assert_eq!(*settings.ai_delay_ms(), 260);
    assert_eq!(*settings.port(), 4560);
    assert!(settings.scores_path().is_none());

    assert!(Settings::from_file(dir.path().join("absent.toml")).is_err());
}

#[test]
fn test_partial_settings_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("settings.toml");
    fs::write(&path, "mode = \"ai\"\ndifficulty = \"medium\"\nai_mark = \"X\"\n").expect("Write failed");

    let settings = Settings::from_file(&path).expect("Load failed");
    assert_eq!(*settings.mode(), PlayMode::Ai);
    assert_eq!(*settings.difficulty(), Difficulty::Medium);
    assert_eq!(*settings.ai_mark(), Mark::X);
    assert_eq!(*settings.port(), 4560);
}

#[test]
fn test_invalid_settings_file_is_an_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("settings.toml");
    fs::write(&path, "difficulty = \"impossible\"").expect("Write failed");

    let err = Settings::from_file(&path).unwrap_err();
    assert!(err.message.contains("parse"), "{err}");
}

#[test]
fn test_settings_save_and_reload() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("settings.toml");

    let mut settings = Settings::default();
    settings.set_mode(PlayMode::Online);
    settings.set_difficulty(Difficulty::Easy);
    settings.set_port(9000);
    settings.set_scores_path(Some(dir.path().join("scores.json")));
    settings.save(&path).expect("Save failed");

    assert_eq!(Settings::from_file(&path).expect("Reload failed"), settings);
}

#[test]
fn test_session_from_settings_picks_mode() {
    let mut settings = Settings::default();
    settings.set_mode(PlayMode::Ai);
    settings.set_ai_mark(Mark::X);
    let session = GameSession::from_settings(&settings, Box::new(tictactoe_pro::MemoryScores::new()));
    assert_eq!(session.mode(), Mode::HumanVsAi { ai: Mark::X });
    assert!(session.has_pending_ai());
}

#[test]
fn test_score_file_persists_across_opens() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("scores.json");

    let mut scores = ScoreFile::open(&path).expect("Open failed");
    assert_eq!(scores.scores(), Scores::default());
    scores.record_win(Mark::X).expect("Record failed");
    scores.record_draw().expect("Record failed");
    assert!(path.exists());

    let reopened = ScoreFile::open(&path).expect("Reopen failed");
    assert_eq!(reopened.scores(), Scores { x: 1, o: 0, draws: 1 });
}

#[test]
fn test_corrupt_score_file_is_an_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("scores.json");
    fs::write(&path, "{ nope").expect("Write failed");
    assert!(ScoreFile::open(&path).is_err());
}

#[test]
fn test_session_writes_results_to_score_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("scores.json");

    let keeper = ScoreFile::open(&path).expect("Open failed");
    let mut session = GameSession::new(Mode::HumanVsHuman, Difficulty::Hard, Box::new(keeper));
    for (position, mark) in [(0, Mark::X), (3, Mark::O), (1, Mark::X), (4, Mark::O), (2, Mark::X)] {
        assert!(session.dispatch(Command::Move {
            position,
            mark,
            origin: Origin::Local
        }));
    }
    assert_eq!(ScoreFile::open(&path).expect("Reopen failed").scores().x, 1);

    assert!(session.dispatch(Command::ResetScores));
    assert_eq!(ScoreFile::open(&path).expect("Reopen failed").scores(), Scores::default());
}

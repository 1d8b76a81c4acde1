//! Plain-text rendering of session snapshots.

use crate::games::tictactoe::{Mark, Outcome};
use crate::session::{Mode, SessionSnapshot};
use std::fmt::Write;
use std::time::Duration;

/// Full screen: board, status, move count and clock, scores and move list.
pub fn screen(snapshot: &SessionSnapshot, elapsed: Duration) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}\n", snapshot.board.display());
    let _ = writeln!(out, "{}", status(snapshot));
    let _ = writeln!(out, "{}", stats(snapshot, elapsed));
    let _ = writeln!(out, "{}", scores(snapshot));
    out.push_str(&history(snapshot));
    out
}

/// One-line status: result, or who moves next.
pub fn status(snapshot: &SessionSnapshot) -> String {
    match snapshot.outcome {
        Outcome::Win { mark, line } => {
            let cells: Vec<String> = line
                .positions()
                .iter()
                .map(|p| (p.to_index() + 1).to_string())
                .collect();
            format!("{} wins! ({})", mark, cells.join("-"))
        }
        Outcome::Draw => "Draw.".to_string(),
        Outcome::Ongoing => {
            let to_move = snapshot.to_move;
            match snapshot.mode {
                Mode::HumanVsHuman => format!("{} to move", to_move),
                Mode::HumanVsAi { ai } if ai == to_move && snapshot.ai_to_play => {
                    format!("{} (AI, {}) is thinking...", to_move, snapshot.difficulty)
                }
                Mode::HumanVsAi { .. } => format!("{} to move (you)", to_move),
                Mode::Online { me } if me == to_move => format!("Your turn ({})", me),
                Mode::Online { .. } => format!("Waiting for {}...", to_move),
            }
        }
    }
}

/// Moves on the board and time since the game started, as `m:ss`.
pub fn stats(snapshot: &SessionSnapshot, elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!(
        "Moves: {}  Time: {}:{:02}",
        snapshot.played.len(),
        secs / 60,
        secs % 60
    )
}

/// Score line with win rates.
pub fn scores(snapshot: &SessionSnapshot) -> String {
    let s = &snapshot.scores;
    format!(
        "Score  X: {} ({}%)  O: {} ({}%)  Draws: {}",
        s.x,
        s.win_rate(Mark::X),
        s.o,
        s.win_rate(Mark::O),
        s.draws
    )
}

/// Numbered move list, one move per line.
pub fn history(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();
    for (i, mv) in snapshot.played.iter().enumerate() {
        let _ = writeln!(out, "{:>2}. {}", i + 1, mv);
    }
    if snapshot.redo_depth > 0 {
        let _ = writeln!(out, "    ({} to redo)", snapshot.redo_depth);
    }
    out
}

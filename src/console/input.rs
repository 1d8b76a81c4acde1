//! Parsing of typed console lines.

use crate::ai::Difficulty;
use crate::games::tictactoe::Mark;
use crate::session::{Command, Origin};
use derive_more::Display;

/// Help text listing the accepted lines.
pub const HELP: &str = "\
Commands:
  1-9        place your mark on that cell
  u          undo the last move
  r          redo an undone move
  j <n>      jump to move n (j 0 = empty board)
  n          new game
  d <tier>   set AI difficulty (easy, medium, hard)
  s          reset scores
  h          show this help
  q          quit";

/// What a typed line asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// A session command.
    Command(Command),
    /// Print the help text.
    Help,
    /// Leave the game.
    Quit,
}

/// Why a typed line was not understood.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum InputError {
    /// Nothing typed.
    #[display("Type a command, or h for help")]
    Empty,
    /// Cell number outside 1-9.
    #[display("No cell {}; use 1-9", _0)]
    BadCell(String),
    /// Jump target missing or not a number.
    #[display("Jump needs a move number, e.g. j 3")]
    BadJump,
    /// Unknown tier name.
    #[display("Unknown difficulty {:?}; use easy, medium or hard", _0)]
    BadTier(String),
    /// Anything else.
    #[display("Unknown command {:?}, type h for help", _0)]
    Unknown(String),
}

impl std::error::Error for InputError {}

/// Parses one line typed by the local player, who places `mark`.
pub fn parse(line: &str, mark: Mark) -> Result<Input, InputError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(InputError::Empty);
    };
    let arg = words.next();
    let origin = Origin::Local;

    let input = match head.to_ascii_lowercase().as_str() {
        "u" | "undo" => Input::Command(Command::Undo { origin }),
        "r" | "redo" => Input::Command(Command::Redo { origin }),
        "n" | "new" => Input::Command(Command::NewGame { origin }),
        "s" | "scores" => Input::Command(Command::ResetScores),
        "h" | "help" | "?" => Input::Help,
        "q" | "quit" | "exit" => Input::Quit,
        "j" | "jump" => {
            // Move n is played[n - 1]; j 0 lands on -1, the empty board.
            let index = arg
                .and_then(|a| a.parse::<usize>().ok())
                .and_then(|n| isize::try_from(n).ok())
                .and_then(|n| n.checked_sub(1))
                .ok_or(InputError::BadJump)?;
            Input::Command(Command::RewindTo { index })
        }
        "d" | "difficulty" => {
            let tier = arg.unwrap_or_default();
            let difficulty: Difficulty = tier
                .parse()
                .map_err(|_| InputError::BadTier(tier.to_string()))?;
            Input::Command(Command::SetDifficulty(difficulty))
        }
        cell if cell.chars().all(|c| c.is_ascii_digit()) => {
            let position = match cell.parse::<usize>() {
                Ok(n @ 1..=9) => n - 1,
                _ => return Err(InputError::BadCell(cell.to_string())),
            };
            Input::Command(Command::Move {
                position,
                mark,
                origin,
            })
        }
        other => return Err(InputError::Unknown(other.to_string())),
    };
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_are_one_based() {
        assert_eq!(
            parse("1", Mark::X),
            Ok(Input::Command(Command::Move {
                position: 0,
                mark: Mark::X,
                origin: Origin::Local
            }))
        );
        assert_eq!(
            parse(" 9 ", Mark::O),
            Ok(Input::Command(Command::Move {
                position: 8,
                mark: Mark::O,
                origin: Origin::Local
            }))
        );
        assert_eq!(parse("0", Mark::X), Err(InputError::BadCell("0".into())));
        assert_eq!(parse("10", Mark::X), Err(InputError::BadCell("10".into())));
    }

    #[test]
    fn test_jump_maps_to_history_index() {
        assert_eq!(
            parse("j 0", Mark::X),
            Ok(Input::Command(Command::RewindTo { index: -1 }))
        );
        assert_eq!(
            parse("jump 3", Mark::X),
            Ok(Input::Command(Command::RewindTo { index: 2 }))
        );
        assert_eq!(parse("j", Mark::X), Err(InputError::BadJump));
        assert_eq!(parse("j x", Mark::X), Err(InputError::BadJump));
        assert_eq!(parse("j 9223372036854775808", Mark::X), Err(InputError::BadJump));
        assert_eq!(parse("j -1", Mark::X), Err(InputError::BadJump));
    }

    #[test]
    fn test_difficulty_names() {
        assert_eq!(
            parse("d easy", Mark::X),
            Ok(Input::Command(Command::SetDifficulty(Difficulty::Easy)))
        );
        assert_eq!(
            parse("D HARD", Mark::X),
            Ok(Input::Command(Command::SetDifficulty(Difficulty::Hard)))
        );
        assert_eq!(parse("d", Mark::X), Err(InputError::BadTier(String::new())));
    }

    #[test]
    fn test_single_letter_commands() {
        let origin = Origin::Local;
        assert_eq!(parse("u", Mark::X), Ok(Input::Command(Command::Undo { origin })));
        assert_eq!(parse("R", Mark::X), Ok(Input::Command(Command::Redo { origin })));
        assert_eq!(parse("n", Mark::X), Ok(Input::Command(Command::NewGame { origin })));
        assert_eq!(parse("s", Mark::X), Ok(Input::Command(Command::ResetScores)));
        assert_eq!(parse("h", Mark::X), Ok(Input::Help));
        assert_eq!(parse("q", Mark::X), Ok(Input::Quit));
    }

    #[test]
    fn test_rejects_noise() {
        assert_eq!(parse("   ", Mark::X), Err(InputError::Empty));
        assert_eq!(parse("fly", Mark::X), Err(InputError::Unknown("fly".into())));
    }
}

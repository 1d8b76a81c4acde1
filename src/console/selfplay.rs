//! Computer-vs-computer matches.

use crate::ai::{Difficulty, pick_move};
use crate::games::tictactoe::Mark;
use crate::scores::{MemoryScores, Scores};
use crate::session::{Command, GameSession, Mode, Origin};
use rand::Rng;
use tracing::{debug, info, instrument};

/// Plays `games` games between two AI tiers and returns the tally.
///
/// Both sides go through the session's normal move path, so every game
/// follows the same rules and scoring as interactive play.
#[instrument(skip(rng))]
pub fn self_play<R: Rng + ?Sized>(
    games: u32,
    x_level: Difficulty,
    o_level: Difficulty,
    rng: &mut R,
) -> Scores {
    let mut session = GameSession::new(
        Mode::HumanVsHuman,
        Difficulty::default(),
        Box::new(MemoryScores::new()),
    );

    for game in 0..games {
        session.new_game(Origin::Local);
        while !session.outcome().is_terminal() {
            let mark = session.to_move();
            let level = match mark {
                Mark::X => x_level,
                Mark::O => o_level,
            };
            let Some(position) = pick_move(session.board(), mark, level, rng) else {
                break;
            };
            session.dispatch(Command::Move {
                position: position.to_index(),
                mark,
                origin: Origin::Local,
            });
        }
        debug!(game, outcome = %session.outcome(), "Self-play game finished");
    }

    let scores = session.scores();
    info!(x = scores.x, o = scores.o, draws = scores.draws, "Self-play finished");
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_hard_mirror_always_draws() {
        let mut rng = StdRng::seed_from_u64(11);
        let scores = self_play(3, Difficulty::Hard, Difficulty::Hard, &mut rng);
        assert_eq!(scores, Scores { x: 0, o: 0, draws: 3 });
    }

    #[test]
    fn test_hard_never_loses_to_easy() {
        let mut rng = StdRng::seed_from_u64(5);
        let scores = self_play(20, Difficulty::Easy, Difficulty::Hard, &mut rng);
        assert_eq!(scores.total(), 20);
        assert_eq!(scores.x, 0);
    }
}

//! Tests for the computer opponent.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tictactoe_pro::ai::{WIN_SCORE, best_move, search};
use tictactoe_pro::{Board, Difficulty, Mark, Outcome, Position, pick_move};

fn board_from(marks: &str) -> Board {
    let mut board = Board::new();
    for (i, c) in marks.chars().enumerate() {
        match c {
            'X' => board.apply_move(i, Mark::X).unwrap(),
            'O' => board.apply_move(i, Mark::O).unwrap(),
            _ => continue,
        };
    }
    board
}

/// Walks every line of play the opponent can choose, with the AI answering
/// each time, and fails if the opponent ever wins.
fn assert_never_loses(board: Board, ai: Mark, to_move: Mark, games: &mut usize) {
    match board.evaluate() {
        Outcome::Win { mark, .. } => {
            assert_eq!(mark, ai, "AI lost:\n{}", board.display());
            *games += 1;
        }
        Outcome::Draw => *games += 1,
        Outcome::Ongoing if to_move == ai => {
            let pos = best_move(&board, ai).expect("AI has a move on an open board");
            let next = board.with_move(pos.to_index(), ai).unwrap();
            assert_never_loses(next, ai, ai.opponent(), games);
        }
        Outcome::Ongoing => {
            for pos in board.empty_positions() {
                let next = board.with_move(pos.to_index(), to_move).unwrap();
                assert_never_loses(next, ai, ai, games);
            }
        }
    }
}

#[test]
fn test_hard_never_loses_moving_first() {
    let mut games = 0;
    assert_never_loses(Board::new(), Mark::X, Mark::X, &mut games);
    assert!(games > 0);
}

#[test]
fn test_hard_never_loses_moving_second() {
    let mut games = 0;
    assert_never_loses(Board::new(), Mark::O, Mark::X, &mut games);
    assert!(games > 0);
}

#[test]
fn test_hard_mirror_match_is_a_draw() {
    let mut board = Board::new();
    let mut to_move = Mark::X;
    while !board.evaluate().is_terminal() {
        let pos = best_move(&board, to_move).unwrap();
        board.apply_move(pos.to_index(), to_move).unwrap();
        to_move = to_move.opponent();
    }
    assert_eq!(board.evaluate(), Outcome::Draw);
}

#[test]
fn test_hard_completes_open_line() {
    // A A . / B B . / . . .
    assert_eq!(best_move(&board_from("XX.OO...."), Mark::X), Some(Position::TopRight));
    assert_eq!(best_move(&board_from("OO.XX...."), Mark::O), Some(Position::TopRight));
    assert_eq!(
        best_move(&board_from("XX.OO...."), Mark::X).map(Position::to_index),
        Some(2)
    );
}

#[test]
fn test_tie_break_prefers_search_order() {
    let boards = ["", "X", "....X", "X...O", "..X.O...."];
    for marks in boards {
        let board = board_from(marks);
        let ai = if board.count(Mark::X) > board.count(Mark::O) {
            Mark::O
        } else {
            Mark::X
        };

        // Exact value of every candidate.
        let scored: Vec<(Position, i32)> = Position::SEARCH_ORDER
            .into_iter()
            .filter(|p| board.is_empty(*p))
            .map(|p| {
                let mut child = board.with_move(p.to_index(), ai).unwrap();
                let score = search(&mut child, ai, ai.opponent(), i32::MIN, i32::MAX).score;
                (p, score)
            })
            .collect();
        let best_score = scored.iter().map(|(_, s)| *s).max().unwrap();
        let expected = scored.iter().find(|(_, s)| *s == best_score).map(|(p, _)| *p);

        let first = best_move(&board, ai);
        let second = best_move(&board, ai);
        assert_eq!(first, expected, "board {marks:?}");
        assert_eq!(first, second, "board {marks:?}");
    }
}

#[test]
fn test_search_restores_scratch_board() {
    let original = board_from("X...O...X");
    let mut scratch = original;
    let result = search(&mut scratch, Mark::O, Mark::O, i32::MIN, i32::MAX);
    assert_eq!(scratch, original);
    assert!(result.position.is_some());
    assert!(result.score.abs() <= WIN_SCORE);
}

#[test]
fn test_best_move_does_not_touch_callers_board() {
    let board = board_from("X...O....");
    let copy = board;
    let _ = best_move(&board, Mark::X);
    assert_eq!(board, copy);
}

#[test]
fn test_every_tier_plays_a_legal_move() {
    let mut rng = StdRng::seed_from_u64(2024);
    let board = board_from("XO.OX....");
    for tier in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
        for _ in 0..20 {
            let pos = pick_move(&board, Mark::X, tier, &mut rng).unwrap();
            assert!(board.is_empty(pos), "{tier} picked occupied {pos}");
        }
    }
}

#[test]
fn test_hard_tier_matches_best_move() {
    let mut rng = StdRng::seed_from_u64(0);
    let board = board_from("XX.OO....");
    assert_eq!(
        pick_move(&board, Mark::O, Difficulty::Hard, &mut rng),
        best_move(&board, Mark::O)
    );
    assert_eq!(
        pick_move(&board, Mark::O, Difficulty::Hard, &mut rng),
        Some(Position::TopRight)
    );
}

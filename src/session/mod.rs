//! Game session state machine.
//!
//! A [`GameSession`] owns the board, the history and the turn. Every request
//! runs to completion (apply, record, evaluate, emit) before the next one is
//! looked at; there is never more than one writer. Rejected requests leave
//! the session untouched and emit nothing.

mod command;
mod event;

pub use command::{Command, Mode, Origin};
pub use event::{SessionEvent, SessionSnapshot};

use crate::ai::{AiReply, AiRequest, Difficulty};
use crate::config::{PlayMode, Settings};
use crate::games::tictactoe::{
    Board, History, InvariantSet, Mark, Move, MoveError, Outcome, Position, Recorded,
    TicTacToeInvariants,
};
use crate::scores::{MemoryScores, ScoreKeeper, Scores};
use rand::Rng;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// One game between two marks, plus the collaborators it reports to.
#[derive(Debug)]
pub struct GameSession {
    board: Board,
    to_move: Mark,
    outcome: Outcome,
    history: History,
    mode: Mode,
    difficulty: Difficulty,
    generation: u64,
    pending_ai: Option<AiRequest>,
    ai_in_flight: Option<u64>,
    scores: Box<dyn ScoreKeeper + Send>,
    subscribers: Vec<mpsc::UnboundedSender<SessionEvent>>,
}

impl GameSession {
    /// Creates a session and starts its first game.
    ///
    /// If the computer plays the starting mark, its first move is pending
    /// right away.
    #[instrument(skip(scores))]
    pub fn new(mode: Mode, difficulty: Difficulty, scores: Box<dyn ScoreKeeper + Send>) -> Self {
        info!(%mode, %difficulty, "Creating game session");
        let mut session = Self {
            board: Board::new(),
            to_move: Mark::STARTING,
            outcome: Outcome::Ongoing,
            history: History::new(),
            mode,
            difficulty,
            generation: 0,
            pending_ai: None,
            ai_in_flight: None,
            scores,
            subscribers: Vec::new(),
        };
        session.schedule_ai();
        session
    }

    /// Two humans, Hard tier, in-memory scores.
    pub fn local() -> Self {
        Self::new(
            Mode::HumanVsHuman,
            Difficulty::default(),
            Box::new(MemoryScores::new()),
        )
    }

    /// Builds a session from persisted preferences.
    ///
    /// Online play starts as a local game until a mark is bound.
    pub fn from_settings(settings: &Settings, scores: Box<dyn ScoreKeeper + Send>) -> Self {
        let mode = match settings.mode() {
            PlayMode::Ai => Mode::HumanVsAi {
                ai: *settings.ai_mark(),
            },
            PlayMode::Human | PlayMode::Online => Mode::HumanVsHuman,
        };
        Self::new(mode, *settings.difficulty(), scores)
    }

    /// Registers an event subscriber.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mark to move next.
    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    /// Outcome so far.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Played moves and the redo stack.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Active mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Active AI tier.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Counter bumped by every structural reset; AI replies carry it back.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current score counters.
    pub fn scores(&self) -> Scores {
        self.scores.scores()
    }

    /// Whether an AI turn is waiting to be taken.
    pub fn has_pending_ai(&self) -> bool {
        self.pending_ai.is_some()
    }

    /// Whether the computer owns the current turn: queued or handed out.
    pub fn ai_to_play(&self) -> bool {
        self.pending_ai.is_some() || self.ai_in_flight == Some(self.generation)
    }

    /// Mark the player at this device places next.
    ///
    /// Online that is the bound mark. Against the computer it is the human's
    /// mark, unless an undo or rewind handed the turn to the computer's mark
    /// without queuing a search; then the player moves for it.
    pub fn local_mark(&self) -> Mark {
        match self.mode {
            Mode::Online { me } => me,
            Mode::HumanVsAi { ai } if self.to_move == ai && self.ai_to_play() => ai.opponent(),
            Mode::HumanVsAi { .. } | Mode::HumanVsHuman => self.to_move,
        }
    }

    /// Captures the state for rendering.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            board: self.board,
            to_move: self.to_move,
            outcome: self.outcome,
            played: self.history.played().to_vec(),
            redo_depth: self.history.undone().len(),
            scores: self.scores.scores(),
            mode: self.mode,
            difficulty: self.difficulty,
            generation: self.generation,
            ai_to_play: self.ai_to_play(),
        }
    }

    /// Processes one command. Rejections are logged and reported as `false`.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn dispatch(&mut self, command: Command) -> bool {
        let result = match command {
            Command::Move {
                position,
                mark,
                origin,
            } => self.request_move(position, mark, origin).map(|_| ()),
            Command::Undo { origin } => self.request_undo(origin).map(|_| ()),
            Command::Redo { origin } => self.request_redo(origin).map(|_| ()),
            Command::RewindTo { index } => self.rewind_to(index),
            Command::NewGame { origin } => {
                self.new_game(origin);
                Ok(())
            }
            Command::SetDifficulty(difficulty) => {
                self.set_difficulty(difficulty);
                Ok(())
            }
            Command::BindOnlineMark(mark) => {
                self.bind_online_mark(mark);
                Ok(())
            }
            Command::SetMode(mode) => {
                self.set_mode(mode);
                Ok(())
            }
            Command::ResetScores => {
                self.reset_scores();
                Ok(())
            }
            Command::AiReply(reply) => return self.apply_ai_reply(reply),
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "Request rejected");
                false
            }
        }
    }

    /// Places `mark` at board index `position`.
    ///
    /// Local requests must match the turn (and, online, this side's bound
    /// mark); remote requests skip the turn check.
    ///
    /// # Errors
    ///
    /// [`MoveError::GameOver`], [`MoveError::OutOfRange`],
    /// [`MoveError::SquareOccupied`] or [`MoveError::WrongTurn`]; the session
    /// is unchanged.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn request_move(&mut self, position: usize, mark: Mark, origin: Origin) -> Result<Move, MoveError> {
        if self.outcome.is_terminal() {
            return Err(MoveError::GameOver);
        }
        let pos = Position::from_index(position).ok_or(MoveError::OutOfRange(position))?;
        if !self.board.is_empty(pos) {
            return Err(MoveError::SquareOccupied(pos));
        }
        self.check_move_authority(mark, origin)?;

        self.board.apply_move(position, mark)?;
        let mv = Move::new(pos, mark);
        self.history.record(mv);
        info!(%mv, %origin, "Move accepted");

        self.emit(SessionEvent::MoveAccepted { mv, origin });
        self.settle(mv);
        Ok(mv)
    }

    /// Takes back the last move; the turn returns to its mark.
    ///
    /// # Errors
    ///
    /// [`MoveError::WrongTurn`] when online and it is not this side's turn,
    /// [`MoveError::NothingToUndo`] on an empty history.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn request_undo(&mut self, origin: Origin) -> Result<Move, MoveError> {
        self.check_history_authority(origin)?;
        let mv = self.history.undo().ok_or(MoveError::NothingToUndo)?;

        self.board.revert_move(mv.position);
        self.to_move = mv.mark;
        self.outcome = Outcome::Ongoing;
        self.bump_generation();
        info!(%mv, %origin, "Move undone");

        self.emit(SessionEvent::UndoApplied { mv, origin });
        self.finish_transition();
        Ok(mv)
    }

    /// Reinstates the last undone move, keeping the rest of the redo stack.
    ///
    /// The move itself bypasses the turn check; it was legal when first made.
    ///
    /// # Errors
    ///
    /// [`MoveError::WrongTurn`] when online and it is not this side's turn,
    /// [`MoveError::GameOver`] on a finished game, [`MoveError::NothingToRedo`]
    /// on an empty redo stack.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn request_redo(&mut self, origin: Origin) -> Result<Move, MoveError> {
        self.check_history_authority(origin)?;
        if self.outcome.is_terminal() {
            return Err(MoveError::GameOver);
        }
        let mv = *self.history.peek_redo().ok_or(MoveError::NothingToRedo)?;
        if !self.board.is_empty(mv.position) {
            return Err(MoveError::SquareOccupied(mv.position));
        }

        self.history.redo();
        self.board.apply_move(mv.position.to_index(), mv.mark)?;
        self.bump_generation();
        info!(%mv, %origin, "Move redone");

        self.emit(SessionEvent::RedoApplied { mv, origin });
        self.settle(mv);
        Ok(mv)
    }

    /// Rewinds to just after move `index` (`-1` = empty board).
    ///
    /// The truncated moves become redoable and the game is always ongoing
    /// afterwards, even if the kept moves already contain a win.
    ///
    /// # Errors
    ///
    /// [`MoveError::RewindOutOfRange`] when `index` is outside `[-1, len - 1]`.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn rewind_to(&mut self, index: isize) -> Result<(), MoveError> {
        self.board = self.history.rewind_to(index)?;
        self.to_move = self
            .history
            .last()
            .map(|mv| mv.mark.opponent())
            .unwrap_or(Mark::STARTING);
        self.outcome = Outcome::Ongoing;
        self.bump_generation();
        info!(index, to_move = %self.to_move, "Rewound");

        self.emit(SessionEvent::Rewound { index });
        self.finish_transition();
        Ok(())
    }

    /// Starts a new game in the current mode.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn new_game(&mut self, origin: Origin) {
        self.clear_board();
        info!(%origin, "New game");
        self.emit(SessionEvent::Reset { origin });
        self.schedule_ai();
        self.finish_transition();
    }

    /// Changes the AI tier. A pending AI turn picks up the new tier.
    #[instrument(skip(self))]
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        if let Some(request) = self.pending_ai.as_mut() {
            request.difficulty = difficulty;
        }
        info!(%difficulty, "Difficulty changed");
        self.finish_transition();
    }

    /// Switches mode and starts a new game.
    #[instrument(skip(self))]
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.clear_board();
        info!(%mode, "Mode changed");
        self.emit(SessionEvent::ModeChanged { mode });
        self.schedule_ai();
        self.finish_transition();
    }

    /// Binds this side to `mark` for online play and starts a new game.
    ///
    /// Both peers reset on assignment, so no reset is relayed.
    #[instrument(skip(self))]
    pub fn bind_online_mark(&mut self, mark: Mark) {
        self.set_mode(Mode::Online { me: mark });
    }

    /// Zeroes the score counters.
    #[instrument(skip(self))]
    pub fn reset_scores(&mut self) {
        if let Err(e) = self.scores.reset() {
            warn!(error = %e, "Failed to reset scores");
        }
        self.finish_transition();
    }

    /// Hands out the pending AI turn, if any.
    pub fn take_ai_request(&mut self) -> Option<AiRequest> {
        let request = self.pending_ai.take()?;
        self.ai_in_flight = Some(request.generation);
        Some(request)
    }

    /// Applies an AI reply unless it is stale.
    ///
    /// Replies from an earlier generation, for a finished game, or for a
    /// move that is no longer the AI's to make are discarded.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn apply_ai_reply(&mut self, reply: AiReply) -> bool {
        if reply.generation != self.generation {
            debug!(reply_generation = reply.generation, "Discarding stale AI reply");
            return false;
        }
        self.ai_in_flight = None;
        let Some(mv) = reply.mv else {
            debug!("AI had no move");
            return false;
        };
        if self.mode.ai_mark() != Some(mv.mark) || self.to_move != mv.mark {
            debug!(%mv, "Discarding AI reply for a turn that moved on");
            return false;
        }
        match self.request_move(mv.position.to_index(), mv.mark, Origin::Local) {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "Discarding illegal AI reply");
                false
            }
        }
    }

    /// Takes the pending AI turn and plays it synchronously.
    pub fn play_ai_turn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        match self.take_ai_request() {
            Some(request) => {
                let reply = request.resolve(rng);
                self.apply_ai_reply(reply)
            }
            None => false,
        }
    }

    fn check_move_authority(&self, mark: Mark, origin: Origin) -> Result<(), MoveError> {
        if origin == Origin::Remote {
            return Ok(());
        }
        let allowed = match self.mode {
            Mode::Online { me } => mark == me && self.to_move == me,
            Mode::HumanVsHuman | Mode::HumanVsAi { .. } => mark == self.to_move,
        };
        if allowed {
            Ok(())
        } else {
            Err(MoveError::WrongTurn {
                mark,
                to_move: self.to_move,
            })
        }
    }

    fn check_history_authority(&self, origin: Origin) -> Result<(), MoveError> {
        match (self.mode, origin) {
            (Mode::Online { me }, Origin::Local) if self.to_move != me => Err(MoveError::WrongTurn {
                mark: me,
                to_move: self.to_move,
            }),
            _ => Ok(()),
        }
    }

    /// Evaluates after a placed move: score, flip the turn, maybe queue the AI.
    fn settle(&mut self, mv: Move) {
        self.pending_ai = None;
        self.ai_in_flight = None;
        self.outcome = self.board.evaluate();

        match self.outcome {
            Outcome::Win { mark, line } => {
                info!(%mark, "Game won");
                if let Err(e) = self.scores.record_win(mark) {
                    warn!(error = %e, "Failed to record win");
                }
                self.emit(SessionEvent::Win { mark, line });
            }
            Outcome::Draw => {
                info!("Game drawn");
                if let Err(e) = self.scores.record_draw() {
                    warn!(error = %e, "Failed to record draw");
                }
                self.emit(SessionEvent::Draw);
            }
            Outcome::Ongoing => {
                self.to_move = mv.mark.opponent();
                self.schedule_ai();
            }
        }

        self.finish_transition();
    }

    fn clear_board(&mut self) {
        self.board = Board::new();
        self.to_move = Mark::STARTING;
        self.outcome = Outcome::Ongoing;
        self.history.clear();
        self.bump_generation();
    }

    fn bump_generation(&mut self) {
        self.generation += 1;
        self.pending_ai = None;
        self.ai_in_flight = None;
    }

    fn schedule_ai(&mut self) {
        let Some(ai) = self.mode.ai_mark() else {
            return;
        };
        if self.outcome.is_terminal() || self.to_move != ai {
            return;
        }
        debug!(generation = self.generation, mark = %ai, "Scheduling AI move");
        self.pending_ai = Some(AiRequest::new(
            self.generation,
            self.board,
            ai,
            self.difficulty,
        ));
    }

    fn finish_transition(&mut self) {
        if cfg!(debug_assertions)
            && let Err(violations) = TicTacToeInvariants::check_all(&*self)
        {
            let descriptions: Vec<_> = violations.iter().map(|v| v.to_string()).collect();
            warn!(?descriptions, "Session invariants violated");
        }
        let snapshot = self.snapshot();
        self.emit(SessionEvent::StateChanged(snapshot));
    }

    fn emit(&mut self, event: SessionEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl Recorded for GameSession {
    fn board(&self) -> &Board {
        &self.board
    }

    fn history(&self) -> &History {
        &self.history
    }
}

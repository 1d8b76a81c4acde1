//! Terminal front end.
//!
//! The driver owns the [`GameSession`] and is its only writer. Typed lines,
//! AI replies and peer messages are turned into commands and dispatched one
//! at a time; the events each dispatch produced are then rendered and, for
//! online play, relayed to the peer.

mod input;
mod render;
mod selfplay;

pub use input::{HELP, Input, InputError, parse};
pub use render::{history, scores, screen, stats, status};
pub use selfplay::self_play;

use crate::ai::AiReply;
use crate::games::tictactoe::Mark;
use crate::session::{Command, GameSession, Mode, SessionEvent};
use crate::transport::{PeerLink, TransportError};
use crate::wire::WireMessage;
use anyhow::Result;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Whether the loop keeps going after a line.
enum Flow {
    Continue,
    Quit,
}

struct Driver {
    session: GameSession,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    ai_tx: mpsc::UnboundedSender<AiReply>,
    ai_rx: mpsc::UnboundedReceiver<AiReply>,
    ai_delay: Duration,
    peer: Option<PeerLink>,
    started: Instant,
}

impl Driver {
    fn new(mut session: GameSession, ai_delay: Duration, peer: Option<PeerLink>) -> Self {
        let events = session.subscribe();
        let (ai_tx, ai_rx) = mpsc::unbounded_channel();
        Self {
            session,
            events,
            ai_tx,
            ai_rx,
            ai_delay,
            peer,
            started: Instant::now(),
        }
    }

    fn handle_line(&mut self, line: &str) -> Flow {
        match parse(line, self.session.local_mark()) {
            Ok(Input::Quit) => return Flow::Quit,
            Ok(Input::Help) => println!("{}", HELP),
            Ok(Input::Command(command)) => {
                if !self.session.dispatch(command) {
                    println!("Not allowed right now.");
                }
            }
            Err(e) => println!("{}", e),
        }
        Flow::Continue
    }

    /// Hands a pending AI turn to a background task.
    fn spawn_ai(&mut self) {
        let Some(request) = self.session.take_ai_request() else {
            return;
        };
        let tx = self.ai_tx.clone();
        let delay = self.ai_delay;
        tokio::spawn(async move {
            let reply = request.resolve_after(delay).await;
            if tx.send(reply).is_err() {
                debug!("Console gone, dropping AI reply");
            }
        });
    }

    /// Renders and relays everything the last dispatch emitted.
    async fn flush(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match &event {
                SessionEvent::StateChanged(snapshot) => {
                    println!("\n{}", screen(snapshot, self.started.elapsed()))
                }
                SessionEvent::ModeChanged { mode } => {
                    self.started = Instant::now();
                    println!("\n{}", mode);
                }
                SessionEvent::Reset { .. } => self.started = Instant::now(),
                _ => {}
            }
            if let Some(message) = WireMessage::from_event(&event) {
                self.relay(&message).await;
            }
        }
        self.spawn_ai();
    }

    async fn relay(&mut self, message: &WireMessage) {
        let Some(peer) = self.peer.as_mut() else {
            return;
        };
        if let Err(e) = peer.send(message).await {
            warn!(error = %e, "Relay failed");
            self.peer_lost();
        }
    }

    /// Back to a local two-player game.
    fn peer_lost(&mut self) {
        if self.peer.take().is_some() {
            println!("\nOpponent disconnected.");
            self.session.dispatch(Command::SetMode(Mode::HumanVsHuman));
        }
    }

    fn on_peer_message(&mut self, message: Result<Option<WireMessage>, TransportError>) {
        match message {
            Ok(Some(message)) => {
                debug!(?message, "Peer message");
                if !self.session.dispatch(message.into_command()) {
                    warn!(?message, "Peer message rejected");
                }
            }
            Ok(None) => self.peer_lost(),
            Err(e) => {
                warn!(error = %e, "Peer link failed");
                self.peer_lost();
            }
        }
    }

    async fn run(mut self) -> Result<()> {
        println!("{}\n", HELP);
        println!("{}", self.session.mode());
        println!("{}", screen(&self.session.snapshot(), self.started.elapsed()));
        // Drop the initial snapshot already shown, keep any pending AI turn.
        while self.events.try_recv().is_ok() {}
        self.spawn_ai();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        info!("Input closed");
                        break;
                    };
                    if let Flow::Quit = self.handle_line(&line) {
                        break;
                    }
                }
                Some(reply) = self.ai_rx.recv() => {
                    self.session.dispatch(Command::AiReply(reply));
                }
                message = recv_peer(&mut self.peer) => {
                    self.on_peer_message(message);
                }
            }
            self.flush().await;
        }

        println!("Bye.");
        Ok(())
    }
}

async fn recv_peer(peer: &mut Option<PeerLink>) -> Result<Option<WireMessage>, TransportError> {
    match peer {
        Some(link) => link.recv().await,
        None => std::future::pending().await,
    }
}

/// Plays on this terminal until the player quits or input closes.
#[instrument(skip(session))]
pub async fn run_local(session: GameSession, ai_delay: Duration) -> Result<()> {
    Driver::new(session, ai_delay, None).run().await
}

/// Plays against a connected peer with this side bound to `me`.
///
/// If the peer goes away the game continues locally.
#[instrument(skip(session, link), fields(peer = %link.peer()))]
pub async fn run_online(mut session: GameSession, link: PeerLink, me: Mark) -> Result<()> {
    session.dispatch(Command::BindOnlineMark(me));
    info!(%me, "Online game started");
    Driver::new(session, Duration::ZERO, Some(link)).run().await
}

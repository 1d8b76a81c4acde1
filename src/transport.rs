//! Line-delimited JSON peer link over TCP.
//!
//! The host accepts a single peer, keeps `X` and assigns `O` to the joiner.
//! There is no ordering, acknowledgement or retry on top of TCP.

use crate::games::tictactoe::Mark;
use crate::wire::{WireError, WireMessage};
use derive_more::{Display, Error};
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tracing::{debug, info, instrument, warn};

/// Mark kept by the hosting side.
pub const HOST_MARK: Mark = Mark::X;

/// A listening host waiting for its peer.
#[derive(Debug)]
pub struct PeerListener {
    listener: TcpListener,
}

impl PeerListener {
    /// Binds the listening socket.
    #[instrument(skip(addr))]
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = ?listener.local_addr().ok(), "Hosting, waiting for a peer");
        Ok(Self { listener })
    }

    /// Address actually bound (useful with port 0).
    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts one peer and sends it its mark. Returns the link and this side's mark.
    #[instrument(skip(self))]
    pub async fn accept(self) -> Result<(PeerLink, Mark), TransportError> {
        let (stream, peer) = self.listener.accept().await?;
        info!(%peer, "Peer connected");
        let mut link = PeerLink::new(stream, peer);
        link.send(&WireMessage::Assign {
            me: HOST_MARK.opponent(),
            you: HOST_MARK,
        })
        .await?;
        Ok((link, HOST_MARK))
    }
}

/// An established connection to the peer.
#[derive(Debug)]
pub struct PeerLink {
    reader: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
    peer: SocketAddr,
}

impl PeerLink {
    fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        let (read, writer) = stream.into_split();
        Self {
            reader: BufReader::new(read).lines(),
            writer,
            peer,
        }
    }

    /// Hosts on `port` and waits for one peer.
    pub async fn host(port: u16) -> Result<(Self, Mark), TransportError> {
        PeerListener::bind(("0.0.0.0", port)).await?.accept().await
    }

    /// Connects to a host and waits for the mark assignment.
    #[instrument(skip(addr))]
    pub async fn join(addr: impl ToSocketAddrs) -> Result<(Self, Mark), TransportError> {
        let stream = TcpStream::connect(addr).await?;
        let peer = stream.peer_addr()?;
        info!(%peer, "Connected to host");
        let mut link = Self::new(stream, peer);

        match link.recv().await? {
            Some(WireMessage::Assign { me, .. }) => {
                info!(mark = %me, "Mark assigned");
                Ok((link, me))
            }
            Some(other) => Err(TransportError::new(format!(
                "Expected mark assignment, got {:?}",
                other
            ))),
            None => Err(TransportError::new("Host closed before assigning a mark")),
        }
    }

    /// Remote address.
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Sends one message.
    #[instrument(skip(self), fields(peer = %self.peer))]
    pub async fn send(&mut self, message: &WireMessage) -> Result<(), TransportError> {
        let mut line = message.encode()?;
        line.push('\n');
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await?;
        debug!(?message, "Sent");
        Ok(())
    }

    /// Receives the next well-formed message; `None` once the peer hangs up.
    ///
    /// Malformed lines are logged and skipped. Cancel safe.
    #[instrument(skip(self), fields(peer = %self.peer))]
    pub async fn recv(&mut self) -> Result<Option<WireMessage>, TransportError> {
        while let Some(line) = self.reader.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            match WireMessage::decode(&line) {
                Ok(message) => {
                    debug!(?message, "Received");
                    return Ok(Some(message));
                }
                Err(e) => warn!(error = %e, %line, "Skipping malformed message"),
            }
        }
        info!("Peer disconnected");
        Ok(None)
    }
}

/// Peer link failure.
#[derive(Debug, Clone, Display, Error)]
#[display("Transport error: {} at {}:{}", message, file, line)]
pub struct TransportError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl TransportError {
    /// Creates a new transport error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<std::io::Error> for TransportError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", err))
    }
}

impl From<WireError> for TransportError {
    #[track_caller]
    fn from(err: WireError) -> Self {
        Self::new(err.message)
    }
}

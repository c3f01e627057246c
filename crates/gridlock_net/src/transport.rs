//! Broadcast transports seen from a single peer.
//!
//! A transport sends [`Command`]s to every peer in the session, the sender
//! included, and reports what arrives as [`TransportEvent`]s on a channel.
//! Delivery is ordered; moves are applied when they come back, never when
//! they are sent.

use crate::error::TransportError;
use crate::protocol::{self, ClientMessage, Command, PeerId, PeerInfo, RoomId, ServerMessage};
use gridlock_tictactoe::{GameRules, Move, Player};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Events a transport delivers to the match controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A seat was granted.
    SessionReady {
        /// Room joined.
        room: RoomId,
        /// Player identity this peer controls.
        role: Player,
        /// Rules of the room; they replace any local rules.
        rules: GameRules,
        /// Members already seated.
        peers: Vec<PeerInfo>,
    },
    /// The requested room had no free seat.
    RoomFull {
        /// Room that was requested.
        room: RoomId,
    },
    /// Another peer took a seat.
    PeerJoined(PeerInfo),
    /// Another peer left.
    PeerLeft(PeerId),
    /// A move was broadcast (possibly by this peer).
    MoveReceived(Move),
    /// A restart was broadcast.
    RestartReceived,
    /// The connection is gone.
    Disconnected,
}

impl From<Command> for TransportEvent {
    fn from(command: Command) -> Self {
        match command {
            Command::MarkCell(mv) => TransportEvent::MoveReceived(mv),
            Command::Restart => TransportEvent::RestartReceived,
        }
    }
}

/// Sends commands to every peer of the session.
pub trait Transport {
    /// Broadcasts `command` to all peers, this one included.
    ///
    /// Never blocks.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the connection is gone.
    fn broadcast(&mut self, command: Command) -> Result<(), TransportError>;
}

/// Single-peer transport: every broadcast comes straight back.
///
/// Used for offline games, where one terminal plays both sides.
#[derive(Debug, Clone)]
pub struct LoopbackTransport {
    events: mpsc::UnboundedSender<TransportEvent>,
}

impl LoopbackTransport {
    /// Creates the transport and the receiver its events arrive on.
    #[instrument]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TransportEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (Self { events }, rx)
    }
}

impl Transport for LoopbackTransport {
    #[instrument(skip(self))]
    fn broadcast(&mut self, command: Command) -> Result<(), TransportError> {
        self.events
            .send(command.into())
            .map_err(|_| TransportError::new("Loopback receiver dropped"))
    }
}

/// TCP client of a [`RelayServer`](crate::RelayServer).
#[derive(Debug, Clone)]
pub struct RelayClient {
    outbound: mpsc::UnboundedSender<ClientMessage>,
}

impl RelayClient {
    /// Connects to the relay and asks for a seat.
    ///
    /// With `room = None` the relay picks any room with a free seat, or
    /// creates one. `rules` are used only if this peer opens the room;
    /// otherwise the room's rules come back in
    /// [`TransportEvent::SessionReady`]. The outcome arrives as
    /// `SessionReady` or [`TransportEvent::RoomFull`] on the returned
    /// receiver.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the connection cannot be opened.
    #[instrument(skip(addr))]
    pub async fn connect(
        addr: impl ToSocketAddrs,
        name: String,
        room: Option<RoomId>,
        rules: GameRules,
    ) -> Result<(Self, mpsc::UnboundedReceiver<TransportEvent>), TransportError> {
        let stream = TcpStream::connect(addr).await?;
        info!(peer_addr = ?stream.peer_addr().ok(), "Connected to relay");

        let (reader, mut writer) = stream.into_split();
        let (outbound, mut pending) = mpsc::unbounded_channel::<ClientMessage>();
        let (events, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(message) = pending.recv().await {
                let line = match protocol::encode(&message) {
                    Ok(line) => line,
                    Err(e) => {
                        warn!(error = %e, "Dropping unencodable message");
                        continue;
                    }
                };
                if let Err(e) = writer.write_all(line.as_bytes()).await {
                    warn!(error = %e, "Relay write failed");
                    break;
                }
            }
            debug!("Relay writer finished");
        });

        tokio::spawn(async move {
            let mut lines = BufReader::new(reader).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => match protocol::decode::<ServerMessage>(&line) {
                        Ok(message) => {
                            if let Some(event) = Self::translate(message) {
                                if events.send(event).is_err() {
                                    break;
                                }
                            }
                        }
                        Err(e) => warn!(error = %e, "Dropping malformed message from relay"),
                    },
                    Ok(None) => break,
                    Err(e) => {
                        warn!(error = %e, "Relay read failed");
                        break;
                    }
                }
            }
            info!("Relay connection closed");
            let _ = events.send(TransportEvent::Disconnected);
        });

        let client = Self { outbound };
        client.send(ClientMessage::Join { name, room, rules })?;
        Ok((client, rx))
    }

    /// Gives up the seat. The connection stays open.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the connection is gone.
    #[instrument(skip(self))]
    pub fn leave(&self) -> Result<(), TransportError> {
        self.send(ClientMessage::Leave)
    }

    fn send(&self, message: ClientMessage) -> Result<(), TransportError> {
        self.outbound
            .send(message)
            .map_err(|_| TransportError::new("Relay connection closed"))
    }

    fn translate(message: ServerMessage) -> Option<TransportEvent> {
        match message {
            ServerMessage::Joined {
                room,
                role,
                rules,
                peers,
                ..
            } => Some(TransportEvent::SessionReady {
                room,
                role,
                rules,
                peers,
            }),
            ServerMessage::RoomFull { room } => Some(TransportEvent::RoomFull { room }),
            ServerMessage::PeerJoined(peer) => Some(TransportEvent::PeerJoined(peer)),
            ServerMessage::PeerLeft { peer } => Some(TransportEvent::PeerLeft(peer)),
            ServerMessage::Command { from, command } => {
                debug!(from, ?command, "Command received");
                Some(command.into())
            }
            ServerMessage::Error { message } => {
                warn!(%message, "Relay rejected a message");
                None
            }
        }
    }
}

impl Transport for RelayClient {
    #[instrument(skip(self))]
    fn broadcast(&mut self, command: Command) -> Result<(), TransportError> {
        self.send(ClientMessage::Broadcast(command))
    }
}

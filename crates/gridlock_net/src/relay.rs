//! Room relay: seats two peers per room and fans out their commands.
//!
//! Each room runs as one task fed by an mpsc channel, so every command in a
//! room is delivered to all members in the same order. Commands of the
//! current game are buffered and replayed to anyone who takes a seat later.

use crate::error::TransportError;
use crate::protocol::{self, ClientMessage, Command, PeerId, PeerInfo, RoomId, ServerMessage};
use gridlock_tictactoe::{GameRules, Player};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Seats per room, in the order they are handed out.
const SEATS: [Player; 2] = [Player::One, Player::Two];

/// Work item for a room task.
#[derive(Debug)]
enum RoomEvent {
    Join {
        peer: PeerInfo,
        rules: GameRules,
        outbound: mpsc::UnboundedSender<ServerMessage>,
    },
    Broadcast {
        from: PeerId,
        command: Command,
    },
    Leave {
        peer: PeerId,
    },
}

/// Registry entry: seat bookkeeping plus the room task's inbox.
#[derive(Debug)]
struct RoomEntry {
    seats: [Option<PeerId>; 2],
    inbox: mpsc::UnboundedSender<RoomEvent>,
}

impl RoomEntry {
    fn free_seat(&self) -> Option<usize> {
        self.seats.iter().position(Option::is_none)
    }

    fn is_empty(&self) -> bool {
        self.seats.iter().all(Option::is_none)
    }
}

/// A granted seat.
#[derive(Debug, Clone)]
struct Seat {
    room: RoomId,
    role: Player,
    inbox: mpsc::UnboundedSender<RoomEvent>,
}

/// Why a join was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
enum JoinError {
    RoomFull(RoomId),
}

/// Room bookkeeping shared by all connections.
#[derive(Debug, Clone, Default)]
struct RoomRegistry {
    rooms: Arc<Mutex<HashMap<RoomId, RoomEntry>>>,
    next_room: Arc<AtomicU64>,
}

impl RoomRegistry {
    fn lock(&self) -> MutexGuard<'_, HashMap<RoomId, RoomEntry>> {
        // A panic while holding the lock leaves plain bookkeeping behind;
        // keep serving with it.
        self.rooms.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Seats `peer` in `room`, or in any room with a free seat, creating the
    /// room when needed. Player One goes to the first free seat.
    #[instrument(skip(self))]
    fn join(&self, peer: PeerId, room: Option<RoomId>) -> Result<Seat, JoinError> {
        let mut rooms = self.lock();

        let room_id = match room {
            Some(id) => id,
            None => rooms
                .iter()
                .filter(|(_, entry)| entry.free_seat().is_some())
                .map(|(id, _)| id.clone())
                .min()
                .unwrap_or_else(|| {
                    format!("room-{}", self.next_room.fetch_add(1, Ordering::Relaxed) + 1)
                }),
        };

        let entry = rooms.entry(room_id.clone()).or_insert_with(|| {
            info!(room = %room_id, "Creating room");
            let (inbox, events) = mpsc::unbounded_channel();
            tokio::spawn(Room::new(room_id.clone()).run(events));
            RoomEntry {
                seats: [None, None],
                inbox,
            }
        });

        let Some(index) = entry.free_seat() else {
            warn!(room = %room_id, "Room already has 2 players");
            return Err(JoinError::RoomFull(room_id));
        };

        entry.seats[index] = Some(peer);
        let role = SEATS[index];
        info!(room = %room_id, peer, %role, "Seat assigned");

        Ok(Seat {
            room: room_id,
            role,
            inbox: entry.inbox.clone(),
        })
    }

    /// Frees the seat held by `peer`; drops the room once nobody is left.
    #[instrument(skip(self))]
    fn leave(&self, peer: PeerId, room: &str) {
        let mut rooms = self.lock();
        let Some(entry) = rooms.get_mut(room) else {
            return;
        };

        for seat in entry.seats.iter_mut() {
            if *seat == Some(peer) {
                *seat = None;
            }
        }

        if entry.is_empty() {
            info!(room, "Removing empty room");
            rooms.remove(room);
        }
    }
}

/// A seated member, as tracked by the room task.
#[derive(Debug)]
struct Member {
    info: PeerInfo,
    outbound: mpsc::UnboundedSender<ServerMessage>,
}

/// State owned by one room task.
#[derive(Debug)]
struct Room {
    id: RoomId,
    /// Set by the first peer to join; every later joiner plays by them.
    rules: Option<GameRules>,
    members: Vec<Member>,
    /// Commands of the current game, oldest first.
    buffer: Vec<(PeerId, Command)>,
}

impl Room {
    fn new(id: RoomId) -> Self {
        Self {
            id,
            rules: None,
            members: Vec::new(),
            buffer: Vec::new(),
        }
    }

    #[instrument(skip_all, fields(room = %self.id))]
    async fn run(mut self, mut events: mpsc::UnboundedReceiver<RoomEvent>) {
        while let Some(event) = events.recv().await {
            match event {
                RoomEvent::Join {
                    peer,
                    rules,
                    outbound,
                } => self.join(peer, rules, outbound),
                RoomEvent::Broadcast { from, command } => self.broadcast(from, command),
                RoomEvent::Leave { peer } => self.leave(peer),
            }
        }
        debug!("Room task finished");
    }

    fn join(
        &mut self,
        peer: PeerInfo,
        proposed: GameRules,
        outbound: mpsc::UnboundedSender<ServerMessage>,
    ) {
        let rules = *self.rules.get_or_insert(proposed);
        if rules != proposed {
            debug!(peer = peer.id(), ?proposed, ?rules, "Joiner takes the room's rules");
        }

        let peers = self.members.iter().map(|m| m.info.clone()).collect();
        let _ = outbound.send(ServerMessage::Joined {
            room: self.id.clone(),
            peer: *peer.id(),
            role: *peer.role(),
            rules,
            peers,
        });

        debug!(peer = peer.id(), buffered = self.buffer.len(), "Replaying buffer");
        for (from, command) in &self.buffer {
            let _ = outbound.send(ServerMessage::Command {
                from: *from,
                command: *command,
            });
        }

        for member in &self.members {
            let _ = member.outbound.send(ServerMessage::PeerJoined(peer.clone()));
        }

        self.members.push(Member {
            info: peer,
            outbound,
        });
    }

    fn broadcast(&mut self, from: PeerId, command: Command) {
        if command == Command::Restart {
            self.buffer.clear();
        }
        self.buffer.push((from, command));

        debug!(from, ?command, members = self.members.len(), "Relaying command");
        for member in &self.members {
            let _ = member.outbound.send(ServerMessage::Command { from, command });
        }
    }

    fn leave(&mut self, peer: PeerId) {
        self.members.retain(|m| *m.info.id() != peer);
        for member in &self.members {
            let _ = member.outbound.send(ServerMessage::PeerLeft { peer });
        }
        info!(peer, remaining = self.members.len(), "Peer left room");
    }
}

/// TCP relay server.
#[derive(Debug, Clone, Default)]
pub struct RelayServer {
    registry: RoomRegistry,
    next_peer: Arc<AtomicU64>,
}

impl RelayServer {
    /// Creates a relay with no rooms.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts connections until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when accepting a connection fails.
    #[instrument(skip_all, fields(addr = ?listener.local_addr().ok()))]
    pub async fn serve(self, listener: TcpListener) -> Result<(), TransportError> {
        info!("Relay accepting connections");
        loop {
            let (stream, addr) = listener.accept().await?;
            let peer = self.next_peer.fetch_add(1, Ordering::Relaxed) + 1;
            info!(peer, %addr, "Peer connected");

            let registry = self.registry.clone();
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, peer, registry).await {
                    warn!(peer, error = %e, "Connection ended with error");
                }
            });
        }
    }
}

/// Drives one peer connection: reads client messages, writes server messages.
#[instrument(skip(stream, registry))]
async fn handle_connection(
    stream: TcpStream,
    peer: PeerId,
    registry: RoomRegistry,
) -> Result<(), TransportError> {
    let (reader, mut writer) = stream.into_split();
    let (outbound, mut pending) = mpsc::unbounded_channel::<ServerMessage>();

    let write_task = tokio::spawn(async move {
        while let Some(message) = pending.recv().await {
            let line = protocol::encode(&message)?;
            writer.write_all(line.as_bytes()).await?;
        }
        Ok::<_, TransportError>(())
    });

    let mut seat: Option<Seat> = None;
    let mut lines = BufReader::new(reader).lines();

    let result = loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break Ok(()),
            Err(e) => break Err(TransportError::from(e)),
        };

        let message = match protocol::decode::<ClientMessage>(&line) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Dropping malformed message");
                let _ = outbound.send(ServerMessage::Error {
                    message: e.message,
                });
                continue;
            }
        };

        match message {
            ClientMessage::Join { name, room, rules } => {
                if seat.is_some() {
                    let _ = outbound.send(ServerMessage::Error {
                        message: "Already seated".to_string(),
                    });
                    continue;
                }
                let rules = match rules.validated() {
                    Ok(rules) => rules,
                    Err(e) => {
                        warn!(error = %e, "Join with invalid rules");
                        let _ = outbound.send(ServerMessage::Error {
                            message: e.to_string(),
                        });
                        continue;
                    }
                };
                match registry.join(peer, room) {
                    Ok(granted) => {
                        let info = PeerInfo::new(peer, name, granted.role);
                        let _ = granted.inbox.send(RoomEvent::Join {
                            peer: info,
                            rules,
                            outbound: outbound.clone(),
                        });
                        seat = Some(granted);
                    }
                    Err(JoinError::RoomFull(room)) => {
                        let _ = outbound.send(ServerMessage::RoomFull { room });
                    }
                }
            }
            ClientMessage::Broadcast(command) => match &seat {
                Some(granted) => {
                    let _ = granted.inbox.send(RoomEvent::Broadcast {
                        from: peer,
                        command,
                    });
                }
                None => {
                    warn!("Broadcast before join");
                    let _ = outbound.send(ServerMessage::Error {
                        message: "Join a room before broadcasting".to_string(),
                    });
                }
            },
            ClientMessage::Leave => {
                if let Some(granted) = seat.take() {
                    release(&registry, peer, granted);
                }
            }
        }
    };

    if let Some(granted) = seat.take() {
        release(&registry, peer, granted);
    }
    info!(peer, "Peer disconnected");

    drop(outbound);
    match write_task.await {
        Ok(Err(e)) => debug!(error = %e, "Writer stopped"),
        Err(e) => warn!(error = %e, "Writer task failed"),
        Ok(Ok(())) => {}
    }

    result
}

/// Frees the seat before the room announces the departure, so a peer that
/// sees `PeerLeft` can already take the seat.
fn release(registry: &RoomRegistry, peer: PeerId, seat: Seat) {
    registry.leave(peer, &seat.room);
    let _ = seat.inbox.send(RoomEvent::Leave { peer });
}

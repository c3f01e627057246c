//! Wire protocol between peers and the relay.
//!
//! Every message is one JSON object on its own line. The relay never looks
//! inside a [`Command`]; it only orders, stores and fans it out.

use crate::error::TransportError;
use gridlock_tictactoe::{GameRules, Move, Player};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Relay-assigned peer identifier, unique per relay process.
pub type PeerId = u64;

/// Room name.
pub type RoomId = String;

/// Game command broadcast to every member of a room, sender included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Mark a cell.
    MarkCell(Move),
    /// Start a new game.
    Restart,
}

/// A room member as seen by other members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters, derive_new::new)]
pub struct PeerInfo {
    /// Relay-assigned id.
    id: PeerId,
    /// Display name.
    name: String,
    /// Seat held in the room.
    role: Player,
}

/// Messages sent by a peer to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientMessage {
    /// Take a seat in `room`, or in any room with a free seat when `None`.
    Join {
        /// Display name.
        name: String,
        /// Room to join.
        room: Option<RoomId>,
        /// Rules proposed for the room. Only the first peer's rules count.
        rules: GameRules,
    },
    /// Relay a command to the whole room.
    Broadcast(Command),
    /// Give up the seat.
    Leave,
}

/// Messages sent by the relay to a peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerMessage {
    /// Seat granted. The buffered commands of the current game follow.
    Joined {
        /// Room joined.
        room: RoomId,
        /// Id assigned to the receiving peer.
        peer: PeerId,
        /// Player identity the receiving peer controls.
        role: Player,
        /// Rules of the room, set by the peer that opened it.
        rules: GameRules,
        /// Members already seated.
        peers: Vec<PeerInfo>,
    },
    /// The requested room has no free seat.
    RoomFull {
        /// Room that was requested.
        room: RoomId,
    },
    /// Another peer took a seat.
    PeerJoined(PeerInfo),
    /// Another peer left.
    PeerLeft {
        /// Id of the peer that left.
        peer: PeerId,
    },
    /// A relayed command.
    Command {
        /// Peer that broadcast the command.
        from: PeerId,
        /// The command.
        command: Command,
    },
    /// The relay could not act on the last message.
    Error {
        /// Human-readable reason.
        message: String,
    },
}

/// Encodes a message as one line, newline included.
///
/// # Errors
///
/// Returns [`TransportError`] if serialization fails.
#[instrument(skip(message))]
pub fn encode<T: Serialize>(message: &T) -> Result<String, TransportError> {
    let mut line = serde_json::to_string(message)?;
    line.push('\n');
    Ok(line)
}

/// Decodes one line.
///
/// # Errors
///
/// Returns [`TransportError`] if the line is not a valid message.
#[instrument]
pub fn decode<T: DeserializeOwned>(line: &str) -> Result<T, TransportError> {
    Ok(serde_json::from_str(line.trim_end())?)
}

//! Presentation callbacks fired by the match controller.

use crate::protocol::{PeerId, RoomId};
use gridlock_tictactoe::{Board, Outcome, Player};

/// Session-level notices that are not part of the game state.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SessionNotice {
    /// Seat granted in a room.
    #[display("Joined {} as {}", room, role)]
    Joined {
        /// Room joined.
        room: RoomId,
        /// Player identity controlled locally.
        role: Player,
    },
    /// The requested room had no free seat.
    #[display("Room {} is full", _0)]
    RoomFull(RoomId),
    /// Another peer took a seat.
    #[display("{} joined as {}", name, role)]
    PeerJoined {
        /// Display name.
        name: String,
        /// Their player identity.
        role: Player,
    },
    /// Another peer left.
    #[display("Peer {} left", _0)]
    PeerLeft(PeerId),
    /// The connection to the relay is gone. The board is kept as is.
    #[display("Disconnected from relay")]
    Disconnected,
}

/// Receives game and session updates.
///
/// Implementations render; they never change game state.
pub trait Presenter {
    /// The turn passed to `player` (also fired after a reset).
    fn on_turn_changed(&mut self, player: Player);

    /// The game ended.
    fn on_game_over(&mut self, outcome: Outcome);

    /// The board changed.
    fn on_board_changed(&mut self, _board: &Board) {}

    /// Something happened to the session.
    fn on_notice(&mut self, _notice: SessionNotice) {}
}

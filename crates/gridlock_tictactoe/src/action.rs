//! First-class move types for tic-tac-toe.
//!
//! Moves are domain events, not side effects. The same value is produced by
//! local input, sent over the wire and applied by every peer.

use super::Player;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A move: `player` marks the cell at `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
    /// The player placing the mark.
    pub player: Player,
}

impl Move {
    /// Creates a new move.
    #[instrument]
    pub fn new(x: usize, y: usize, player: Player) -> Self {
        Self { x, y, player }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> ({}, {})", self.player, self.x, self.y)
    }
}

/// Reason a move was not applied.
///
/// Every variant leaves the game untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The coordinates are off the board.
    #[display("Cell ({}, {}) is out of bounds", _0, _1)]
    OutOfBounds(usize, usize),

    /// The cell already holds the other player's mark.
    #[display("Cell ({}, {}) is already occupied", _0, _1)]
    Occupied(usize, usize),

    /// The cell already holds this exact move (redelivery).
    #[display("Move {} was already applied", _0)]
    Duplicate(Move),

    /// It's not this player's turn.
    #[display("It's not {}'s turn", _0)]
    WrongTurn(Player),

    /// The game is already over.
    #[display("Game is already over")]
    GameOver,
}

impl std::error::Error for MoveError {}

impl MoveError {
    /// Returns true for redelivered moves, which are expected on an
    /// at-least-once channel and carry no information.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, MoveError::Duplicate(_))
    }
}

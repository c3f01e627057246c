//! Gridlock tic-tac-toe - the game model shared by every peer.
//!
//! # Architecture
//!
//! - **Types**: board, cells, players, rules and outcomes
//! - **Action**: the [`Move`] event and its [`MoveError`] rejections
//! - **Rules**: directional win scan and full-board check
//! - **Game**: the state machine every move funnels through
//!
//! # Example
//!
//! ```
//! use gridlock_tictactoe::{Game, Move, MoveResult, Outcome, Player};
//!
//! let mut game = Game::default();
//! for (x, y, player) in [
//!     (0, 0, Player::One),
//!     (1, 1, Player::Two),
//!     (0, 1, Player::One),
//!     (1, 0, Player::Two),
//! ] {
//!     game.submit_move(Move::new(x, y, player)).unwrap();
//! }
//! let result = game.submit_move(Move::new(0, 2, Player::One)).unwrap();
//! assert_eq!(result, MoveResult::Finished(Outcome::Win(Player::One)));
//! ```

#![warn(missing_docs)]

mod action;
mod game;
pub mod rules;
mod types;

pub use action::{Move, MoveError};
pub use game::{Game, MoveResult};
pub use types::{Board, Cell, GameRules, GameStatus, Outcome, Player, RulesError, TurnPolicy};

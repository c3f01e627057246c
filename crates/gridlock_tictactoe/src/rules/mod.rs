//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`](super::Board). Rules are kept apart from
//! the state machine so they can be tested on hand-built boards.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{check_win, count_in_direction};

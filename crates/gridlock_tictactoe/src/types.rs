//! Core domain types for tic-tac-toe.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Player in the game.
///
/// Player One is the session initiator and always moves first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
pub enum Player {
    /// First player (session initiator).
    #[strum(to_string = "Player 1")]
    One,
    /// Second player (joiner).
    #[strum(to_string = "Player 2")]
    Two,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Returns the numeric id used on screen (1 or 2).
    pub fn id(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    /// Creates a player from its numeric id.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }

    /// Board symbol for this player.
    pub fn symbol(self) -> char {
        match self {
            Player::One => 'X',
            Player::Two => 'O',
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell occupied by a player.
    Occupied(Player),
}

/// Board dimensions and the line length that wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameRules {
    width: usize,
    height: usize,
    win_length: usize,
}

impl GameRules {
    /// Largest board, in cells, that rules may describe.
    pub const MAX_CELLS: usize = 1 << 16;

    /// Creates validated rules.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError`] if a dimension is zero, the board has more
    /// than [`GameRules::MAX_CELLS`] cells, or the win length cannot fit on
    /// the board.
    #[instrument]
    pub fn new(width: usize, height: usize, win_length: usize) -> Result<Self, RulesError> {
        if width == 0 || height == 0 {
            return Err(RulesError::EmptyBoard { width, height });
        }
        if width
            .checked_mul(height)
            .is_none_or(|cells| cells > Self::MAX_CELLS)
        {
            return Err(RulesError::TooLarge { width, height });
        }
        if win_length == 0 || win_length > width.max(height) {
            return Err(RulesError::UnreachableLine {
                win_length,
                width,
                height,
            });
        }
        Ok(Self {
            width,
            height,
            win_length,
        })
    }

    /// Re-runs the checks of [`GameRules::new`], for rules that arrived
    /// through deserialization.
    ///
    /// # Errors
    ///
    /// Same as [`GameRules::new`].
    pub fn validated(self) -> Result<Self, RulesError> {
        Self::new(self.width, self.height, self.win_length)
    }

    /// Board width (number of columns, `x` axis).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Board height (number of rows, `y` axis).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Contiguous cells needed to win.
    pub fn win_length(&self) -> usize {
        self.win_length
    }
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            width: 3,
            height: 3,
            win_length: 3,
        }
    }
}

/// Invalid board configuration.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RulesError {
    /// One of the dimensions is zero.
    #[display("Board must be at least 1x1, got {}x{}", width, height)]
    EmptyBoard {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },
    /// The board has too many cells.
    #[display("Board of {}x{} cells is too large", width, height)]
    TooLarge {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },
    /// The win length is zero or longer than any line on the board.
    #[display("Win length {} cannot fit on a {}x{} board", win_length, width, height)]
    UnreachableLine {
        /// Requested win length.
        win_length: usize,
        /// Board width.
        width: usize,
        /// Board height.
        height: usize,
    },
}

/// Rectangular board of cells, addressed as `(x, y)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    width: usize,
    height: usize,
    /// Cells in row-major order (`y * width + x`).
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board.
    ///
    /// Dimensions are not checked here; build them through [`GameRules`]
    /// to stay within [`GameRules::MAX_CELLS`].
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// Board width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Board height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Checks whether `(x, y)` lies on the board.
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Gets the cell at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        if !self.in_bounds(x, y) {
            return None;
        }
        self.cells.get(y * self.width + x).copied()
    }

    /// Sets the cell at `(x, y)`.
    ///
    /// Returns `false` without touching the board when out of bounds.
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        match self.cells.get_mut(y * self.width + x) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Checks if the cell at `(x, y)` is empty.
    pub fn is_empty(&self, x: usize, y: usize) -> bool {
        matches!(self.get(x, y), Some(Cell::Empty))
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| **c != Cell::Empty).count()
    }

    /// Formats the board as a human-readable grid, row `y = 0` on top.
    pub fn display(&self) -> String {
        let mut result = String::from("  ");
        for x in 0..self.width {
            result.push_str(&format!(" {}", x));
        }
        for y in 0..self.height {
            result.push('\n');
            result.push_str(&format!("{} ", y));
            for x in 0..self.width {
                let symbol = match self.get(x, y) {
                    Some(Cell::Occupied(p)) => p.symbol(),
                    Some(Cell::Empty) | None => '.',
                };
                result.push(' ');
                result.push(symbol);
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        let rules = GameRules::default();
        Self::new(rules.width(), rules.height())
    }
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Outcome {
    /// A player completed a line.
    #[display("{} wins", _0)]
    Win(Player),
    /// The board filled up without a line.
    #[display("Draw")]
    Draw,
}

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game has ended.
    Over(Outcome),
}

impl GameStatus {
    /// Returns true once the game has ended.
    pub fn is_over(&self) -> bool {
        matches!(self, GameStatus::Over(_))
    }
}

/// Whether the mover must match the turn holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TurnPolicy {
    /// Online play: a move from anyone but the turn holder is rejected.
    #[default]
    Strict,
    /// Offline hotseat: the move is placed as submitted.
    Free,
}

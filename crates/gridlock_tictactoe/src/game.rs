//! Game state machine for tic-tac-toe.
//!
//! Local input and moves arriving from the network both go through
//! [`Game::submit_move`], so every peer runs the same validation and reaches
//! the same state for the same move sequence.

use super::action::{Move, MoveError};
use super::rules;
use super::types::{Board, Cell, GameRules, GameStatus, Outcome, Player, TurnPolicy};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Transition produced by an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveResult {
    /// Game continues; `next` holds the turn.
    Continue {
        /// The new turn holder.
        next: Player,
    },
    /// The move ended the game.
    Finished(Outcome),
}

/// Tic-tac-toe game engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    rules: GameRules,
    policy: TurnPolicy,
    board: Board,
    current_player: Player,
    status: GameStatus,
    history: Vec<Move>,
}

impl Game {
    /// Creates a new game, Player One to move.
    #[instrument]
    pub fn new(rules: GameRules, policy: TurnPolicy) -> Self {
        Self {
            rules,
            policy,
            board: Board::new(rules.width(), rules.height()),
            current_player: Player::One,
            status: GameStatus::InProgress,
            history: Vec::new(),
        }
    }

    /// Rebuilds a game by submitting `moves` in order.
    ///
    /// # Errors
    ///
    /// Returns the first rejection. Duplicates are rejections here too, a
    /// replayed history is expected to be clean.
    #[instrument(skip(moves), fields(count = moves.len()))]
    pub fn replay(rules: GameRules, policy: TurnPolicy, moves: &[Move]) -> Result<Self, MoveError> {
        let mut game = Self::new(rules, policy);
        for mv in moves {
            game.submit_move(*mv)?;
        }
        Ok(game)
    }

    /// Returns the rules this game was created with.
    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// Returns the turn policy.
    pub fn policy(&self) -> TurnPolicy {
        self.policy
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the turn holder.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns the accepted moves of this game, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Returns the outcome once the game is over.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.status {
            GameStatus::InProgress => None,
            GameStatus::Over(outcome) => Some(outcome),
        }
    }

    /// Empty cells in row-major order; none once the game is over.
    #[instrument(skip(self))]
    pub fn valid_moves(&self) -> Vec<(usize, usize)> {
        if self.status.is_over() {
            return Vec::new();
        }
        (0..self.board.height())
            .flat_map(|y| (0..self.board.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| self.board.is_empty(x, y))
            .collect()
    }

    /// Validates a move without applying it.
    ///
    /// # Errors
    ///
    /// Returns why [`Game::submit_move`] would reject the move.
    pub fn validate(&self, mv: &Move) -> Result<(), MoveError> {
        let cell = self.board.get(mv.x, mv.y);

        // Redelivery is recognised first, including the move that ended the game.
        if cell == Some(Cell::Occupied(mv.player)) {
            return Err(MoveError::Duplicate(*mv));
        }

        if self.status.is_over() {
            return Err(MoveError::GameOver);
        }

        match cell {
            None => return Err(MoveError::OutOfBounds(mv.x, mv.y)),
            Some(Cell::Occupied(_)) => return Err(MoveError::Occupied(mv.x, mv.y)),
            Some(Cell::Empty) => {}
        }

        if self.policy == TurnPolicy::Strict && mv.player != self.current_player {
            return Err(MoveError::WrongTurn(mv.player));
        }

        Ok(())
    }

    /// Marks a cell and advances the game.
    ///
    /// The win check runs from the placed cell; the draw check only runs when
    /// there is no winner.
    ///
    /// # Errors
    ///
    /// Any [`MoveError`]; the game is unchanged in that case.
    #[instrument(skip(self), fields(current = %self.current_player))]
    pub fn submit_move(&mut self, mv: Move) -> Result<MoveResult, MoveError> {
        self.validate(&mv)?;

        self.board.set(mv.x, mv.y, Cell::Occupied(mv.player));
        self.history.push(mv);

        if rules::check_win(&self.board, mv.x, mv.y, mv.player, self.rules.win_length()) {
            let outcome = Outcome::Win(mv.player);
            self.status = GameStatus::Over(outcome);
            info!(%outcome, moves = self.history.len(), "Game over");
            return Ok(MoveResult::Finished(outcome));
        }

        if rules::is_full(&self.board) {
            self.status = GameStatus::Over(Outcome::Draw);
            info!(moves = self.history.len(), "Game over, board full");
            return Ok(MoveResult::Finished(Outcome::Draw));
        }

        self.current_player = self.current_player.opponent();
        debug!(next = %self.current_player, "Turn switched");
        Ok(MoveResult::Continue {
            next: self.current_player,
        })
    }

    /// Checks whether the mark at `(x, y)` completes a line for `player`.
    pub fn check_win(&self, x: usize, y: usize, player: Player) -> bool {
        rules::check_win(&self.board, x, y, player, self.rules.win_length())
    }

    /// Checks whether every cell is taken.
    pub fn is_board_full(&self) -> bool {
        rules::is_full(&self.board)
    }

    /// Clears the board and history, Player One to move.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.board = Board::new(self.rules.width(), self.rules.height());
        self.current_player = Player::One;
        self.status = GameStatus::InProgress;
        self.history.clear();
        info!("Game reset");
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameRules::default(), TurnPolicy::default())
    }
}

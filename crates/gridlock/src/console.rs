//! Terminal frontend: renders controller callbacks and parses typed commands.

use gridlock_net::{Presenter, SessionNotice};
use gridlock_tictactoe::{Board, Outcome, Player};
use std::io::Write;
use tracing::{instrument, warn};

/// Shown when a line cannot be parsed.
pub const HELP: &str = "Commands: `x y` to mark a cell, `restart`, `quit`";

/// A parsed line of terminal input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Mark the cell at column `x`, row `y`.
    Select {
        /// Column.
        x: usize,
        /// Row.
        y: usize,
    },
    /// Ask for a new game.
    Restart,
    /// Leave.
    Quit,
}

impl Input {
    /// Parses one line. Coordinates may be separated by spaces or a comma.
    #[instrument]
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        match line.to_ascii_lowercase().as_str() {
            "restart" | "r" => return Some(Input::Restart),
            "quit" | "q" | "exit" => return Some(Input::Quit),
            _ => {}
        }

        let mut parts = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty());
        let x = parts.next()?.parse().ok()?;
        let y = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Input::Select { x, y })
    }
}

/// Writes game updates as plain text.
#[derive(Debug)]
pub struct ConsolePresenter<W> {
    out: W,
}

impl<W: Write> ConsolePresenter<W> {
    /// Creates a presenter writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the presenter, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|()| self.out.flush()) {
            warn!(error = %e, "Console write failed");
        }
    }
}

impl<W: Write> Presenter for ConsolePresenter<W> {
    fn on_turn_changed(&mut self, player: Player) {
        self.line(&format!("{} ({}) to move", player, player.symbol()));
    }

    fn on_game_over(&mut self, outcome: Outcome) {
        self.line(&format!("Game over: {}", outcome));
    }

    fn on_board_changed(&mut self, board: &Board) {
        self.line(&format!("\n{}\n", board.display()));
    }

    fn on_notice(&mut self, notice: SessionNotice) {
        self.line(&format!("* {}", notice));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinates() {
        assert_eq!(Input::parse("1 2"), Some(Input::Select { x: 1, y: 2 }));
        assert_eq!(Input::parse("  0,2 "), Some(Input::Select { x: 0, y: 2 }));
        assert_eq!(Input::parse("2, 0"), Some(Input::Select { x: 2, y: 0 }));
    }

    #[test]
    fn test_parse_words() {
        assert_eq!(Input::parse("restart"), Some(Input::Restart));
        assert_eq!(Input::parse("QUIT"), Some(Input::Quit));
        assert_eq!(Input::parse("q"), Some(Input::Quit));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Input::parse(""), None);
        assert_eq!(Input::parse("1"), None);
        assert_eq!(Input::parse("1 2 3"), None);
        assert_eq!(Input::parse("-1 0"), None);
        assert_eq!(Input::parse("a b"), None);
    }

    #[test]
    fn test_presenter_renders_updates() {
        let mut presenter = ConsolePresenter::new(Vec::new());
        presenter.on_board_changed(&Board::default());
        presenter.on_turn_changed(Player::One);
        presenter.on_game_over(Outcome::Win(Player::Two));
        presenter.on_notice(SessionNotice::Disconnected);

        let text = String::from_utf8(presenter.into_inner()).expect("Utf8");
        assert!(text.contains(". . ."));
        assert!(text.contains("Player 1 (X) to move"));
        assert!(text.contains("Game over: Player 2 wins"));
        assert!(text.contains("* Disconnected from relay"));
    }
}

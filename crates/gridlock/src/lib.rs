//! Gridlock - terminal frontend and configuration for networked tic-tac-toe.
//!
//! The binary wires a [`ConsolePresenter`] and typed [`Input`] into a
//! [`gridlock_net::MatchController`], either over a relay or offline.

#![warn(missing_docs)]

mod cli;
mod config;
mod console;
mod play;

pub use cli::{Cli, Command};
pub use config::{AppConfig, ConfigError, GameSection, RelaySection};
pub use console::{ConsolePresenter, HELP, Input};
pub use play::run_match;

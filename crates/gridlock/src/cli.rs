//! Command-line interface for gridlock.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Gridlock - tic-tac-toe for two terminals
#[derive(Parser, Debug)]
#[command(name = "gridlock")]
#[command(about = "Networked tic-tac-toe with a room relay", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file (optional, defaults apply when absent)
    #[arg(short, long, global = true, default_value = "gridlock.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the room relay
    Relay {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Join a room on a relay and play
    Play {
        /// Relay address (host:port)
        #[arg(short, long)]
        server: Option<String>,

        /// Room to join. If not provided, any room with a free seat is used.
        #[arg(short, long)]
        room: Option<String>,

        /// Display name shown to the other player
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Play both sides in this terminal
    Offline,
}

//! Application configuration loaded from `gridlock.toml`.

use derive_getters::Getters;
use derive_more::{Display, Error};
use gridlock_tictactoe::GameRules;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Top-level configuration. Every field has a default, so an empty file (or
/// no file at all) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// Display name sent to the relay.
    #[serde(default = "default_name")]
    name: String,

    /// Board and win settings.
    #[serde(default)]
    game: GameSection,

    /// Relay address settings.
    #[serde(default)]
    relay: RelaySection,
}

/// `[game]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameSection {
    /// Board width.
    #[serde(default = "default_side")]
    width: usize,

    /// Board height.
    #[serde(default = "default_side")]
    height: usize,

    /// Marks in a line needed to win.
    #[serde(default = "default_side")]
    win_length: usize,
}

/// `[relay]` table.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct RelaySection {
    /// Host the relay binds to, and the host clients connect to.
    #[serde(default = "default_host")]
    host: String,

    /// Relay port.
    #[serde(default = "default_port")]
    port: u16,
}

fn default_name() -> String {
    "player".to_string()
}

fn default_side() -> usize {
    3
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    7777
}

impl Default for GameSection {
    fn default() -> Self {
        Self {
            width: default_side(),
            height: default_side(),
            win_length: default_side(),
        }
    }
}

impl Default for RelaySection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            game: GameSection::default(),
            relay: RelaySection::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(name = %config.name, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Validated game rules.
    #[instrument(skip(self), fields(game = ?self.game))]
    pub fn rules(&self) -> Result<GameRules, ConfigError> {
        GameRules::new(self.game.width, self.game.height, self.game.win_length)
            .map_err(|e| ConfigError::new(format!("Invalid game rules: {}", e)))
    }

    /// `host:port` of the relay.
    pub fn relay_addr(&self) -> String {
        format!("{}:{}", self.relay.host, self.relay.port)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

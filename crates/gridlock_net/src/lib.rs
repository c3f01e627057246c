//! Gridlock networking - keeps two peers on the same board.
//!
//! # Architecture
//!
//! - **Protocol**: JSON-lines messages between peers and the relay
//! - **Relay**: TCP server seating two peers per room, relaying commands in
//!   order and replaying the current game to late joiners
//! - **Transport**: the peer side of the relay, plus a loopback for offline play
//! - **Controller**: funnels local input and delivered commands into one game
//!
//! # Example
//!
//! ```no_run
//! use gridlock_net::{RelayClient, RelayServer};
//! use gridlock_tictactoe::GameRules;
//!
//! # async fn example() -> Result<(), gridlock_net::TransportError> {
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:7777").await?;
//! tokio::spawn(RelayServer::new().serve(listener));
//!
//! let (client, events) =
//!     RelayClient::connect("127.0.0.1:7777", "ada".to_string(), None, GameRules::default())
//!         .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod controller;
mod error;
mod presenter;
pub mod protocol;
mod relay;
mod transport;

pub use controller::{LocalRole, MatchController};
pub use error::TransportError;
pub use presenter::{Presenter, SessionNotice};
pub use protocol::{Command, PeerId, PeerInfo, RoomId};
pub use relay::RelayServer;
pub use transport::{LoopbackTransport, RelayClient, Transport, TransportEvent};

//! Match controller: one game, one local role, one transport, one presenter.
//!
//! Local input only ever produces a broadcast. State changes happen when a
//! command comes back through [`MatchController::handle_event`], which is the
//! same path remote commands take, so all peers apply the same sequence.

use crate::error::TransportError;
use crate::presenter::{Presenter, SessionNotice};
use crate::protocol::Command;
use crate::transport::{Transport, TransportEvent};
use gridlock_tictactoe::{Game, GameRules, Move, MoveResult, Player, TurnPolicy};
use tracing::{debug, info, instrument, warn};

/// Which side(s) this peer may play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalRole {
    /// One terminal plays both sides.
    Offline,
    /// Connected, waiting for a seat.
    Pending,
    /// Seated as `Player`.
    Online(Player),
}

impl LocalRole {
    /// Turn policy for games played under this role.
    pub fn policy(self) -> TurnPolicy {
        match self {
            LocalRole::Offline => TurnPolicy::Free,
            LocalRole::Pending | LocalRole::Online(_) => TurnPolicy::Strict,
        }
    }

    /// Whether local input may move for `player`.
    pub fn controls(self, player: Player) -> bool {
        match self {
            LocalRole::Offline => true,
            LocalRole::Pending => false,
            LocalRole::Online(own) => own == player,
        }
    }

    /// Whether local input may restart the game. Only the session initiator
    /// may, or an offline player.
    pub fn may_restart(self) -> bool {
        matches!(self, LocalRole::Offline | LocalRole::Online(Player::One))
    }
}

/// Drives a [`Game`] from local input and transport events.
#[derive(Debug)]
pub struct MatchController<T, P> {
    game: Game,
    role: LocalRole,
    transport: T,
    presenter: P,
}

impl<T: Transport, P: Presenter> MatchController<T, P> {
    /// Creates a controller and announces the initial turn.
    #[instrument(skip(transport, presenter))]
    pub fn new(rules: GameRules, role: LocalRole, transport: T, presenter: P) -> Self {
        let mut controller = Self {
            game: Game::new(rules, role.policy()),
            role,
            transport,
            presenter,
        };
        controller.announce();
        controller
    }

    /// Returns the game.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Returns the local role.
    pub fn role(&self) -> LocalRole {
        self.role
    }

    /// Returns the presenter.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Returns the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Local click on `(x, y)`.
    ///
    /// Ignored when the game is over, when the local role does not hold the
    /// turn, or when the cell cannot be marked. Otherwise the move is
    /// broadcast for the current turn holder.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the broadcast cannot be sent.
    #[instrument(skip(self), fields(role = ?self.role, current = %self.game.current_player()))]
    pub fn select_cell(&mut self, x: usize, y: usize) -> Result<(), TransportError> {
        if self.game.status().is_over() {
            debug!("Game is over, click ignored");
            return Ok(());
        }

        let current = self.game.current_player();
        if !self.role.controls(current) {
            debug!("Not your turn, click ignored");
            return Ok(());
        }

        let mv = Move::new(x, y, current);
        if let Err(e) = self.game.validate(&mv) {
            debug!(error = %e, "Click ignored");
            return Ok(());
        }

        self.transport.broadcast(Command::MarkCell(mv))
    }

    /// Local restart request.
    ///
    /// Ignored unless [`LocalRole::may_restart`].
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the broadcast cannot be sent.
    #[instrument(skip(self), fields(role = ?self.role))]
    pub fn request_restart(&mut self) -> Result<(), TransportError> {
        if !self.role.may_restart() {
            debug!("Only the session initiator may restart");
            return Ok(());
        }
        self.transport.broadcast(Command::Restart)
    }

    /// Applies an event from the transport.
    #[instrument(skip(self))]
    pub fn handle_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::SessionReady {
                room,
                role,
                rules,
                peers,
            } => {
                info!(%room, %role, ?rules, seated = peers.len(), "Session ready");
                if rules != *self.game.rules() {
                    info!(local = ?self.game.rules(), "Adopting the room's rules");
                }
                self.role = LocalRole::Online(role);
                self.game = Game::new(rules, self.role.policy());
                self.presenter.on_notice(SessionNotice::Joined { room, role });
                for peer in peers {
                    self.presenter.on_notice(SessionNotice::PeerJoined {
                        name: peer.name().clone(),
                        role: *peer.role(),
                    });
                }
                self.announce();
            }
            TransportEvent::RoomFull { room } => {
                warn!(%room, "Room is full");
                self.presenter.on_notice(SessionNotice::RoomFull(room));
            }
            TransportEvent::PeerJoined(peer) => {
                self.presenter.on_notice(SessionNotice::PeerJoined {
                    name: peer.name().clone(),
                    role: *peer.role(),
                });
            }
            TransportEvent::PeerLeft(peer) => {
                self.presenter.on_notice(SessionNotice::PeerLeft(peer));
            }
            TransportEvent::MoveReceived(mv) => {
                self.apply_move(mv);
            }
            TransportEvent::RestartReceived => self.apply_restart(),
            TransportEvent::Disconnected => {
                warn!("Transport disconnected, game state kept");
                self.presenter.on_notice(SessionNotice::Disconnected);
            }
        }
    }

    /// Submits a delivered move and notifies the presenter.
    ///
    /// Rejected moves change nothing and notify nobody.
    #[instrument(skip(self))]
    pub fn apply_move(&mut self, mv: Move) -> Option<MoveResult> {
        match self.game.submit_move(mv) {
            Ok(result) => {
                self.presenter.on_board_changed(self.game.board());
                match result {
                    MoveResult::Continue { next } => self.presenter.on_turn_changed(next),
                    MoveResult::Finished(outcome) => self.presenter.on_game_over(outcome),
                }
                Some(result)
            }
            Err(e) if e.is_duplicate() => {
                debug!(%mv, "Duplicate delivery ignored");
                None
            }
            Err(e) => {
                warn!(%mv, error = %e, "Move rejected");
                None
            }
        }
    }

    /// Resets the game and notifies the presenter.
    #[instrument(skip(self))]
    pub fn apply_restart(&mut self) {
        self.game.reset();
        self.announce();
    }

    fn announce(&mut self) {
        self.presenter.on_board_changed(self.game.board());
        self.presenter.on_turn_changed(self.game.current_player());
    }
}

//! The terminal match loop shared by online and offline play.

use crate::console::{HELP, Input};
use anyhow::{Result, bail};
use gridlock_net::{MatchController, Presenter, Transport, TransportEvent};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, instrument, warn};

/// Funnels input lines and transport events into the controller until the
/// player quits, input closes or the transport goes away.
///
/// Pending events are always handled before the next input line, so every
/// click is checked against the latest board.
///
/// # Errors
///
/// Fails when the requested room is full, when reading input fails, or when
/// a command cannot be sent.
#[instrument(skip_all, fields(role = ?controller.role()))]
pub async fn run_match<T, P, R>(
    controller: &mut MatchController<T, P>,
    events: &mut UnboundedReceiver<TransportEvent>,
    input: R,
) -> Result<()>
where
    T: Transport,
    P: Presenter,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    loop {
        tokio::select! {
            biased;

            event = events.recv() => match event {
                Some(TransportEvent::RoomFull { room }) => {
                    controller.handle_event(TransportEvent::RoomFull { room: room.clone() });
                    bail!("Room {} is full, pick another room or leave --room out", room);
                }
                Some(TransportEvent::Disconnected) | None => {
                    controller.handle_event(TransportEvent::Disconnected);
                    warn!("Session ended by transport");
                    break;
                }
                Some(event) => controller.handle_event(event),
            },
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("Input closed");
                    break;
                };
                match Input::parse(&line) {
                    Some(Input::Select { x, y }) => controller.select_cell(x, y)?,
                    Some(Input::Restart) => controller.request_restart()?,
                    Some(Input::Quit) => break,
                    None => println!("{}", HELP),
                }
            }
        }
    }

    info!(status = ?controller.game().status(), "Leaving match");
    Ok(())
}

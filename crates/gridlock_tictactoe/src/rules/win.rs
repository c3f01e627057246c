//! Win detection logic for tic-tac-toe.
//!
//! A win is only possible through the cell that was just marked, so the scan
//! starts there and walks outwards along four axes instead of checking every
//! line on the board.

use super::super::{Board, Cell, Player};
use tracing::instrument;

/// Axis directions scanned from the placed cell: horizontal, vertical and
/// both diagonals. Each is walked forwards and backwards.
const AXES: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Counts contiguous cells held by `player`, starting at `(x, y)` and
/// stepping by `(dx, dy)` until the edge or a foreign cell.
///
/// The origin is included in the count.
pub fn count_in_direction(
    board: &Board,
    x: usize,
    y: usize,
    dx: isize,
    dy: isize,
    player: Player,
) -> usize {
    let mut count = 0;
    let (mut cx, mut cy) = (x as isize, y as isize);

    while cx >= 0
        && cy >= 0
        && board.get(cx as usize, cy as usize) == Some(Cell::Occupied(player))
    {
        count += 1;
        cx += dx;
        cy += dy;
    }

    count
}

/// Checks whether the mark at `(x, y)` completes a line of `win_length`.
///
/// Returns false when the cell is not held by `player`.
#[instrument(skip(board))]
pub fn check_win(board: &Board, x: usize, y: usize, player: Player, win_length: usize) -> bool {
    AXES.iter().any(|&(dx, dy)| {
        let forward = count_in_direction(board, x, y, dx, dy, player);
        let backward = count_in_direction(board, x, y, -dx, -dy, player);
        // Origin is counted by both walks.
        (forward + backward).saturating_sub(1) >= win_length
    })
}

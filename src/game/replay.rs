//! Rebuild a board from a match history.
//!
//! Replay applies each recorded action to a fresh board and checks the result
//! against the snapshot stored in the record. Rollbacks are recorded as
//! reversed moves, so they replay like any other move.

use crate::board::Board;
use crate::core::{Action, EngineError, PieceConfig, Result};

use super::record::MoveRecord;

/// Replay `records` on a board of `size` with the initial `pieces`.
pub fn replay<'a>(
    size: usize,
    pieces: &PieceConfig,
    records: impl IntoIterator<Item = &'a MoveRecord>,
) -> Result<Board> {
    let mut board = Board::new(size, pieces)?;

    for (step, record) in records.into_iter().enumerate() {
        match record.action {
            Action::Move { from, to } => board.apply_move(from, to)?,
            Action::Burn { tile } => board.apply_burn(tile)?,
        }
        if board.snapshot() != record.snapshot {
            return Err(EngineError::invariant(format!(
                "replay diverged at step {step} (turn {}, {})",
                record.turn, record.seat
            )));
        }
    }

    Ok(board)
}

//! Move records for replay and testing.
//!
//! The turn engine creates one record per accepted mutation and never
//! touches it again. A record carries the board as it stood right after the
//! mutation, so a replay can check itself step by step.

use serde::{Deserialize, Serialize};

use crate::board::BoardSnapshot;
use crate::core::{Action, MatchId, SeatId};

use super::phase::SubPhase;

/// One accepted mutation of a match's board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub match_id: MatchId,

    /// Seat whose turn it was.
    pub seat: SeatId,

    /// Turn number (starts at 1) the mutation belongs to.
    pub turn: u32,

    /// Sub-phase the mutation was made in.
    pub phase: SubPhase,

    pub action: Action,

    /// Board right after the mutation.
    pub snapshot: BoardSnapshot,
}

impl MoveRecord {
    #[must_use]
    pub fn new(
        match_id: MatchId,
        seat: SeatId,
        turn: u32,
        phase: SubPhase,
        action: Action,
        snapshot: BoardSnapshot,
    ) -> Self {
        Self {
            match_id,
            seat,
            turn,
            phase,
            action,
            snapshot,
        }
    }
}

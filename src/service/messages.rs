//! Requests, replies, and broadcast events of the match service.
//!
//! Transport-agnostic shapes: every type derives serde with camelCase
//! fields so a session layer can map JSON straight onto them.

use serde::{Deserialize, Serialize};

use crate::board::BoardSnapshot;
use crate::core::{Coord, MatchId, ParticipantId, SeatId};
use crate::game::{Match, MatchStatus, SubPhase, TimeoutAction};

/// Move request from a participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptMove {
    pub match_id: MatchId,
    pub external_id: ParticipantId,
    pub from: Coord,
    pub to: Coord,
}

/// Burn request from a participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptBurn {
    pub match_id: MatchId,
    pub external_id: ParticipantId,
    pub tile: Coord,
}

/// Reply to an accepted move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSuccess {
    /// Where the piece now stands; burns are measured from here.
    pub to: Coord,
}

/// Reply to an accepted burn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnSuccess {
    /// Whether the burn ended the match.
    pub finished: bool,
}

/// Full public state of a match after an accepted mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshotEvent {
    pub match_id: MatchId,
    pub tiles: BoardSnapshot,
    pub turn_seat: SeatId,
    pub phase: SubPhase,
    pub status: MatchStatus,
    pub winner_seat: Option<SeatId>,
    pub turn_number: u32,
}

impl BoardSnapshotEvent {
    /// Capture the current state of `game`.
    #[must_use]
    pub fn of(game: &Match) -> Self {
        Self {
            match_id: game.id(),
            tiles: game.snapshot(),
            turn_seat: game.turn(),
            phase: game.phase(),
            status: game.status(),
            winner_seat: game.winner(),
            turn_number: game.turn_number(),
        }
    }
}

/// A match has ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchFinished {
    pub match_id: MatchId,
    pub winner_seat: Option<SeatId>,
    pub winner: Option<ParticipantId>,
}

/// A turn ran out of time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnTimedOut {
    pub match_id: MatchId,
    pub seat: SeatId,
    pub action: TimeoutAction,
}

/// Events broadcast to every subscriber of a [`super::MatchRegistry`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MatchEvent {
    Snapshot(BoardSnapshotEvent),
    TimedOut(TurnTimedOut),
    Finished(MatchFinished),
    /// The match hit an internal invariant violation and was halted.
    Quarantined {
        match_id: MatchId,
        reason: String,
    },
}

impl MatchEvent {
    /// Match the event belongs to.
    #[must_use]
    pub fn match_id(&self) -> MatchId {
        match self {
            Self::Snapshot(event) => event.match_id,
            Self::TimedOut(event) => event.match_id,
            Self::Finished(event) => event.match_id,
            Self::Quarantined { match_id, .. } => *match_id,
        }
    }
}

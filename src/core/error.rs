//! Engine error taxonomy.
//!
//! Every rejection the engine can produce is an `EngineError`. All variants
//! except [`EngineError::InternalInvariantViolation`] and
//! [`EngineError::Quarantined`] are ordinary, non-fatal rejections: the
//! match state is untouched and the caller decides whether to tell the
//! participant.

use thiserror::Error;

use super::coord::Coord;
use super::id::{MatchId, ParticipantId};
use super::seat::SeatId;
use crate::game::{MatchStatus, SubPhase};

/// Errors produced by the board, validator, turn engine, AI, and registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("coordinate {coord} is outside the {size}x{size} board")]
    OutOfBounds { coord: Coord, size: usize },

    #[error("{seat} cannot move from {from} to {to}")]
    IllegalMove { seat: SeatId, from: Coord, to: Coord },

    #[error("{seat} cannot burn {tile}")]
    IllegalBurn { seat: SeatId, tile: Coord },

    #[error("not {seat}'s turn, waiting for {expected}")]
    NotYourTurn { seat: SeatId, expected: SeatId },

    #[error("expected {expected:?}, match is in {actual:?}")]
    WrongPhase { expected: SubPhase, actual: SubPhase },

    #[error("match is {status:?}, not active")]
    MatchNotActive { status: MatchStatus },

    #[error("unknown participant {0}")]
    UnknownParticipant(ParticipantId),

    #[error("unknown match {0}")]
    UnknownMatch(MatchId),

    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("internal invariant violated: {reason}")]
    InternalInvariantViolation { reason: String },

    #[error("match {0} was halted after an internal error")]
    Quarantined(MatchId),
}

impl EngineError {
    /// Shorthand for an `InvalidConfiguration` with a formatted reason.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Shorthand for an `InternalInvariantViolation` with a formatted reason.
    pub fn invariant(reason: impl Into<String>) -> Self {
        Self::InternalInvariantViolation {
            reason: reason.into(),
        }
    }

    /// True for defects (AI or validator bugs) rather than participant mistakes.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::InternalInvariantViolation { .. } | Self::Quarantined(_)
        )
    }
}

/// Engine result alias.
pub type Result<T> = std::result::Result<T, EngineError>;

//! Turn-timer expiry policies.
//!
//! Policies are trait-based so a deployment can plug in its own; the two
//! built-ins correspond to [`TimeoutPolicyKind`] in configuration.
//!
//! - `ForfeitMatch` (default): the seat on turn loses.
//! - `SkipTurn`: the turn is rolled back and passes to the next seat.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{SeatId, TimeoutPolicyKind};

use super::phase::SubPhase;

/// What the turn engine does with an expired turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutAction {
    ForfeitMatch,
    SkipTurn,
}

/// Decides the consequence of a turn running out of time.
pub trait TimeoutPolicy: Send + Sync + std::fmt::Debug {
    /// `seat` was on turn, in `phase`, when the budget ran out.
    fn on_expiry(&self, seat: SeatId, phase: SubPhase) -> TimeoutAction;
}

/// Running out of time loses the match.
#[derive(Clone, Debug, Default)]
pub struct ForfeitMatch;

impl TimeoutPolicy for ForfeitMatch {
    fn on_expiry(&self, _seat: SeatId, _phase: SubPhase) -> TimeoutAction {
        TimeoutAction::ForfeitMatch
    }
}

/// Running out of time only costs the turn.
#[derive(Clone, Debug, Default)]
pub struct SkipTurn;

impl TimeoutPolicy for SkipTurn {
    fn on_expiry(&self, _seat: SeatId, _phase: SubPhase) -> TimeoutAction {
        TimeoutAction::SkipTurn
    }
}

/// Built-in policy for a configured kind.
#[must_use]
pub fn policy_for(kind: TimeoutPolicyKind) -> Arc<dyn TimeoutPolicy> {
    match kind {
        TimeoutPolicyKind::ForfeitMatch => Arc::new(ForfeitMatch),
        TimeoutPolicyKind::SkipTurn => Arc::new(SkipTurn),
    }
}

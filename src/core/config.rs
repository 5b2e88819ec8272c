//! Match and engine configuration.
//!
//! Transports hand the engine loosely shaped payloads (`StartMatch` and its
//! seat and piece lists). They are parsed here into a strongly typed
//! [`MatchSetup`] before any match sees them; anything malformed is an
//! `InvalidConfiguration` and no match is created.
//!
//! - `RuleSet`: per-match rule choices (origin burn, timer scope, timeout)
//! - `PieceConfig`: initial piece placement
//! - `EngineConfig`: service-wide knobs (channel sizes, AI tuning)

use std::time::Duration;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::coord::Coord;
use super::error::{EngineError, Result};
use super::id::{IdGenerator, ParticipantId};
use super::seat::SeatId;
use crate::ai::AiConfig;
use crate::players::{SeatAssignment, SeatKind};

/// Largest supported board edge.
pub const MAX_BOARD_SIZE: usize = 32;

/// Edge length of the classic Amazons board.
pub const STANDARD_BOARD_SIZE: usize = 10;

// =============================================================================
// Rules
// =============================================================================

/// What the turn timer covers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerScope {
    /// One budget for the whole turn; an accepted move does not extend it.
    #[default]
    Turn,
    /// The budget restarts when the move is accepted, so the burn gets a
    /// fresh allowance.
    SubPhase,
}

/// What happens when a turn's budget runs out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutPolicyKind {
    /// The seat on turn loses the match.
    #[default]
    ForfeitMatch,
    /// The turn is rolled back to its starting board and passes on.
    SkipTurn,
}

/// Per-match rule choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// May the arrow land on the square the piece just left?
    pub allow_origin_burn: bool,

    /// Timer coverage.
    pub timer_scope: TimerScope,

    /// Timer expiry behavior.
    pub timeout: TimeoutPolicyKind,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            allow_origin_burn: true,
            timer_scope: TimerScope::Turn,
            timeout: TimeoutPolicyKind::ForfeitMatch,
        }
    }
}

impl RuleSet {
    /// Set the origin-burn rule.
    #[must_use]
    pub fn with_origin_burn(mut self, allowed: bool) -> Self {
        self.allow_origin_burn = allowed;
        self
    }

    /// Set the timer scope.
    #[must_use]
    pub fn with_timer_scope(mut self, scope: TimerScope) -> Self {
        self.timer_scope = scope;
        self
    }

    /// Set the timeout policy.
    #[must_use]
    pub fn with_timeout(mut self, timeout: TimeoutPolicyKind) -> Self {
        self.timeout = timeout;
        self
    }
}

// =============================================================================
// Piece placement
// =============================================================================

/// One piece on the starting board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiecePlacement {
    pub at: Coord,
    pub owner: SeatId,
}

impl PiecePlacement {
    #[must_use]
    pub const fn new(x: i32, y: i32, owner: u8) -> Self {
        Self {
            at: Coord::new(x, y),
            owner: SeatId::new(owner),
        }
    }
}

/// Initial piece placement for a match.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceConfig {
    placements: Vec<PiecePlacement>,
}

impl PieceConfig {
    #[must_use]
    pub fn new(placements: Vec<PiecePlacement>) -> Self {
        Self { placements }
    }

    /// The classic two-player layout on a 10×10 board: four queens each.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            PiecePlacement::new(0, 6, 0),
            PiecePlacement::new(3, 9, 0),
            PiecePlacement::new(6, 9, 0),
            PiecePlacement::new(9, 6, 0),
            PiecePlacement::new(0, 3, 1),
            PiecePlacement::new(3, 0, 1),
            PiecePlacement::new(6, 0, 1),
            PiecePlacement::new(9, 3, 1),
        ])
    }

    #[must_use]
    pub fn placements(&self) -> &[PiecePlacement] {
        &self.placements
    }

    /// Seats implied by the placement: highest owner index plus one.
    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.placements
            .iter()
            .map(|p| p.owner.index() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Check the placement against a board edge length.
    ///
    /// Every piece must be in bounds, no two pieces may share a square, and
    /// every seat up to the highest owner must own at least one piece.
    pub fn validate(&self, board_size: usize) -> Result<()> {
        if self.placements.is_empty() {
            return Err(EngineError::invalid_config("piece configuration is empty"));
        }

        let mut occupied = FxHashSet::default();
        for placement in &self.placements {
            if !placement.at.in_bounds(board_size) {
                return Err(EngineError::invalid_config(format!(
                    "piece at {} is outside the {board_size}x{board_size} board",
                    placement.at
                )));
            }
            if !occupied.insert(placement.at) {
                return Err(EngineError::invalid_config(format!(
                    "two pieces placed on {}",
                    placement.at
                )));
            }
        }

        for seat in SeatId::all(self.seat_count()) {
            if !self.placements.iter().any(|p| p.owner == seat) {
                return Err(EngineError::invalid_config(format!("{seat} owns no pieces")));
            }
        }

        Ok(())
    }
}

// =============================================================================
// Wire payloads
// =============================================================================

/// Seat entry of a `StartMatch` request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatRequest {
    /// Session-layer identity. Ignored for automated seats.
    #[serde(default)]
    pub external_id: String,

    #[serde(rename = "type")]
    pub kind: SeatKind,

    /// Whether the invitee accepted. Declined seats do not count.
    #[serde(alias = "acceptedFlag")]
    pub accepted: bool,
}

/// Piece entry of a `StartMatch` request. Signed and wide so that garbage
/// from the wire is reported rather than wrapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceRequest {
    pub x: i64,
    pub y: i64,
    pub owner: i64,
}

/// Request to create and begin a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartMatch {
    pub seats: Vec<SeatRequest>,
    pub piece_config: Vec<PieceRequest>,
    pub board_size: i64,
    pub turn_timer_ms: i64,
    #[serde(default)]
    pub rules: RuleSet,
}

/// Validated, strongly typed match setup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchSetup {
    pub board_size: usize,
    pub pieces: PieceConfig,
    pub seats: Vec<SeatAssignment>,
    pub turn_budget: Duration,
    pub rules: RuleSet,
}

impl MatchSetup {
    /// Parse a wire request into a setup.
    ///
    /// Only accepted seats are kept, in request order; their count must equal
    /// the highest piece owner plus one. Automated seats get a synthetic
    /// identity from `ids`.
    pub fn from_request(request: &StartMatch, ids: &dyn IdGenerator) -> Result<Self> {
        let board_size = usize::try_from(request.board_size)
            .ok()
            .filter(|s| (1..=MAX_BOARD_SIZE).contains(s))
            .ok_or_else(|| {
                EngineError::invalid_config(format!(
                    "board size {} is not in 1..={MAX_BOARD_SIZE}",
                    request.board_size
                ))
            })?;

        let turn_budget = u64::try_from(request.turn_timer_ms)
            .ok()
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .ok_or_else(|| {
                EngineError::invalid_config(format!(
                    "turn timer {}ms must be positive",
                    request.turn_timer_ms
                ))
            })?;

        let placements = request
            .piece_config
            .iter()
            .map(|piece| {
                let x = i32::try_from(piece.x);
                let y = i32::try_from(piece.y);
                let owner = u8::try_from(piece.owner);
                match (x, y, owner) {
                    (Ok(x), Ok(y), Ok(owner)) if owner < u8::MAX => Ok(PiecePlacement {
                        at: Coord::new(x, y),
                        owner: SeatId::new(owner),
                    }),
                    _ => Err(EngineError::invalid_config(format!(
                        "malformed piece ({}, {}) owner {}",
                        piece.x, piece.y, piece.owner
                    ))),
                }
            })
            .collect::<Result<Vec<_>>>()?;
        let pieces = PieceConfig::new(placements);
        pieces.validate(board_size)?;

        let mut humans = FxHashSet::default();
        let mut seats = Vec::new();
        for seat in request.seats.iter().filter(|s| s.accepted) {
            let participant = match seat.kind {
                SeatKind::Automated => ids.next_bot_identity(),
                SeatKind::Human => {
                    if seat.external_id.is_empty() {
                        return Err(EngineError::invalid_config("human seat without an identity"));
                    }
                    let id = ParticipantId::new(seat.external_id.clone());
                    if !humans.insert(id.clone()) {
                        return Err(EngineError::invalid_config(format!(
                            "participant {id} holds two seats"
                        )));
                    }
                    id
                }
            };
            seats.push(SeatAssignment::new(participant, seat.kind));
        }

        let expected = pieces.seat_count();
        if seats.len() != expected {
            return Err(EngineError::invalid_config(format!(
                "{} accepted seats, piece configuration needs {expected}",
                seats.len()
            )));
        }
        if seats.len() < 2 {
            return Err(EngineError::invalid_config("a match needs at least two seats"));
        }

        Ok(Self {
            board_size,
            pieces,
            seats,
            turn_budget,
            rules: request.rules,
        })
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Service-wide configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Pending requests per match actor before senders wait.
    pub mailbox_capacity: usize,

    /// Buffered broadcast events before slow subscribers start lagging.
    pub event_capacity: usize,

    /// Automated seat tuning.
    pub ai: AiConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 64,
            event_capacity: 256,
            ai: AiConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Set the per-match mailbox capacity.
    #[must_use]
    pub fn with_mailbox_capacity(mut self, capacity: usize) -> Self {
        self.mailbox_capacity = capacity;
        self
    }

    /// Set the AI configuration.
    #[must_use]
    pub fn with_ai(mut self, ai: AiConfig) -> Self {
        self.ai = ai;
        self
    }
}

//! The turn engine for one match.
//!
//! `Match` enforces turn ownership and the move-then-burn structure of a
//! turn, delegates legality to [`MoveValidator`], and detects the terminal
//! condition (the seat to move cannot play a turn).
//!
//! Every entry point either applies its whole effect or returns an error
//! with the match untouched. Only an accepted burn advances the turn, apart
//! from timer expiry and seat departure, which roll back any half-played
//! turn first.
//!
//! ## Clock epochs
//!
//! The engine does not own a clock. Instead it bumps `clock_epoch` whenever
//! the turn timer should restart (new turn, or an accepted move under
//! [`TimerScope::SubPhase`]). Whoever drives the timer re-arms on a new
//! epoch and reports expiry with the epoch it armed, so stale expiries are
//! ignored.

use std::sync::Arc;
use std::time::Duration;

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::board::{Board, BoardSnapshot};
use crate::core::{
    Action, Coord, EngineError, MatchId, MatchSetup, ParticipantId, Result, RuleSet, SeatId,
    SeatMap, TimerScope,
};
use crate::players::{PlayerRegistry, SeatAssignment, SeatKind};
use crate::rules::MoveValidator;

use super::phase::{MatchStatus, SubPhase};
use super::record::MoveRecord;
use super::timeout::{policy_for, TimeoutAction, TimeoutPolicy};

/// The move half of the turn in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingMove {
    pub from: Coord,
    pub to: Coord,
}

/// What an expired turn turned into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeoutOutcome {
    /// Seat that ran out of time.
    pub seat: SeatId,
    pub action: TimeoutAction,
    /// Move undone because its burn never came.
    pub rolled_back: Option<PendingMove>,
}

/// One game of Amazons.
#[derive(Clone, Debug)]
pub struct Match {
    id: MatchId,
    validator: MoveValidator,
    timeout: Arc<dyn TimeoutPolicy>,

    board: Board,
    players: PlayerRegistry,
    departed: SeatMap<bool>,

    status: MatchStatus,
    phase: SubPhase,
    turn: SeatId,
    pending: Option<PendingMove>,
    winner: Option<SeatId>,

    turn_budget: Duration,
    turn_number: u32,
    clock_epoch: u64,

    history: Vector<MoveRecord>,
}

impl Match {
    /// A match in `Setup`, waiting for [`Match::begin`].
    #[must_use]
    pub fn new(id: MatchId, rules: RuleSet) -> Self {
        Self {
            id,
            validator: MoveValidator::new(rules),
            timeout: policy_for(rules.timeout),
            board: Board::default(),
            players: PlayerRegistry::default(),
            departed: SeatMap::default(),
            status: MatchStatus::Setup,
            phase: SubPhase::AwaitingMove,
            turn: SeatId::new(0),
            pending: None,
            winner: None,
            turn_budget: Duration::ZERO,
            turn_number: 0,
            clock_epoch: 0,
            history: Vector::new(),
        }
    }

    /// Replace the timeout policy derived from the rule set.
    #[must_use]
    pub fn with_timeout_policy(mut self, policy: Arc<dyn TimeoutPolicy>) -> Self {
        self.timeout = policy;
        self
    }

    /// Build and begin a match from a validated setup.
    pub fn from_setup(id: MatchId, setup: &MatchSetup) -> Result<Self> {
        let mut game = Self::new(id, setup.rules);
        let board = Board::new(setup.board_size, &setup.pieces)?;
        game.begin(setup.seats.clone(), board, setup.turn_budget)?;
        Ok(game)
    }

    /// Transition `Setup → Active`.
    ///
    /// The number of seats must equal the board's seat count (highest piece
    /// owner plus one), and there must be at least two. On failure the match
    /// stays in `Setup`.
    #[instrument(skip_all, fields(match_id = %self.id))]
    pub fn begin(
        &mut self,
        seats: Vec<SeatAssignment>,
        board: Board,
        turn_budget: Duration,
    ) -> Result<()> {
        if self.status != MatchStatus::Setup {
            return Err(EngineError::invalid_config("match has already begun"));
        }
        if seats.len() != board.seat_count() {
            return Err(EngineError::invalid_config(format!(
                "{} seats, piece placement needs {}",
                seats.len(),
                board.seat_count()
            )));
        }
        if seats.len() < 2 {
            return Err(EngineError::invalid_config("a match needs at least two seats"));
        }
        if turn_budget.is_zero() {
            return Err(EngineError::invalid_config("turn budget must be positive"));
        }
        let players = PlayerRegistry::new(seats)?;

        self.departed = SeatMap::with_value(players.seat_count(), false);
        self.players = players;
        self.board = board;
        self.turn_budget = turn_budget;
        self.status = MatchStatus::Active;
        self.phase = SubPhase::AwaitingMove;
        self.turn = SeatId::new(0);
        self.turn_number = 1;
        self.clock_epoch += 1;

        info!(
            seats = self.players.seat_count(),
            size = self.board.size(),
            "match started"
        );

        if !self.validator.has_any_legal_turn(&self.board, self.turn) {
            let winner = self.previous_active_seat(self.turn);
            self.finish(winner);
        }
        Ok(())
    }

    // === Queries ===

    #[must_use]
    pub fn id(&self) -> MatchId {
        self.id
    }

    #[must_use]
    pub fn status(&self) -> MatchStatus {
        self.status
    }

    #[must_use]
    pub fn phase(&self) -> SubPhase {
        self.phase
    }

    /// Seat on turn.
    #[must_use]
    pub fn turn(&self) -> SeatId {
        self.turn
    }

    #[must_use]
    pub fn winner(&self) -> Option<SeatId> {
        self.winner
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        self.board.snapshot()
    }

    #[must_use]
    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    #[must_use]
    pub fn validator(&self) -> &MoveValidator {
        &self.validator
    }

    #[must_use]
    pub fn pending(&self) -> Option<PendingMove> {
        self.pending
    }

    #[must_use]
    pub fn turn_budget(&self) -> Duration {
        self.turn_budget
    }

    /// Turn counter, 1 for the first turn.
    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    #[must_use]
    pub fn clock_epoch(&self) -> u64 {
        self.clock_epoch
    }

    /// Every accepted mutation so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<MoveRecord> {
        &self.history
    }

    #[must_use]
    pub fn is_departed(&self, seat: SeatId) -> bool {
        self.departed.get(seat).copied().unwrap_or(false)
    }

    /// Is the seat on turn engine-driven?
    #[must_use]
    pub fn automated_on_turn(&self) -> bool {
        self.status == MatchStatus::Active
            && self.players.kind(self.turn) == Some(SeatKind::Automated)
    }

    /// Internal seat of an external participant.
    pub fn seat_of(&self, participant: &ParticipantId) -> Result<SeatId> {
        self.players.seat_of(participant)
    }

    // === Actions ===

    /// Move the piece at `from` to `to` as the first half of `seat`'s turn.
    #[instrument(skip(self), fields(match_id = %self.id))]
    pub fn attempt_move(&mut self, seat: SeatId, from: Coord, to: Coord) -> Result<MoveRecord> {
        self.ensure_actor(seat, SubPhase::AwaitingMove)?;
        self.board.tile_at(from)?;
        self.board.tile_at(to)?;

        if !self.validator.is_legal_move(&self.board, seat, from, to) {
            return Err(EngineError::IllegalMove { seat, from, to });
        }
        self.board.apply_move(from, to)?;

        self.pending = Some(PendingMove { from, to });
        self.phase = SubPhase::AwaitingBurn;
        if self.validator.rules().timer_scope == TimerScope::SubPhase {
            self.clock_epoch += 1;
        }

        debug!(%seat, %from, %to, "move accepted");
        Ok(self.record(seat, SubPhase::AwaitingMove, Action::Move { from, to }))
    }

    /// Burn `tile` from the moved piece's new square, ending `seat`'s turn.
    #[instrument(skip(self), fields(match_id = %self.id))]
    pub fn attempt_burn(&mut self, seat: SeatId, tile: Coord) -> Result<MoveRecord> {
        self.ensure_actor(seat, SubPhase::AwaitingBurn)?;
        let pending = self
            .pending
            .ok_or_else(|| EngineError::invariant("awaiting burn without a pending move"))?;
        self.board.tile_at(tile)?;

        if !self.validator.is_legal_burn_after_move(
            &self.board,
            seat,
            pending.from,
            pending.to,
            tile,
        ) {
            return Err(EngineError::IllegalBurn { seat, tile });
        }
        self.board.apply_burn(tile)?;

        self.pending = None;
        self.phase = SubPhase::AwaitingMove;
        let record = self.record(seat, SubPhase::AwaitingBurn, Action::Burn { tile });

        debug!(%seat, %tile, "burn accepted");
        self.advance_turn();
        Ok(record)
    }

    /// Apply the timeout policy to the turn armed at `epoch`.
    ///
    /// Returns `Ok(None)` for a stale epoch or a match that is not active.
    #[instrument(skip(self), fields(match_id = %self.id))]
    pub fn expire_turn(&mut self, epoch: u64) -> Result<Option<TimeoutOutcome>> {
        if self.status != MatchStatus::Active || epoch != self.clock_epoch {
            return Ok(None);
        }

        let seat = self.turn;
        let action = self.timeout.on_expiry(seat, self.phase);
        let rolled_back = self.roll_back_pending()?;
        info!(%seat, ?action, "turn timed out");

        match action {
            TimeoutAction::ForfeitMatch => {
                let winner = self.previous_active_seat(seat);
                self.finish(winner);
            }
            TimeoutAction::SkipTurn => self.advance_turn(),
        }

        Ok(Some(TimeoutOutcome {
            seat,
            action,
            rolled_back,
        }))
    }

    /// Record that `seat` has left.
    ///
    /// Departed seats are skipped in the rotation. When one seat remains it
    /// wins. Returns whether anything changed.
    #[instrument(skip(self), fields(match_id = %self.id))]
    pub fn leave(&mut self, seat: SeatId) -> Result<bool> {
        match self.status {
            MatchStatus::Setup => {
                return Err(EngineError::MatchNotActive {
                    status: self.status,
                })
            }
            MatchStatus::Finished => return Ok(false),
            MatchStatus::Active => {}
        }
        let Some(departed) = self.departed.get_mut(seat) else {
            return Err(EngineError::invariant(format!("{seat} is not part of this match")));
        };
        if *departed {
            return Ok(false);
        }
        *departed = true;
        info!(%seat, "seat left");

        let remaining: Vec<SeatId> = self
            .departed
            .iter()
            .filter(|(_, gone)| !**gone)
            .map(|(s, _)| s)
            .collect();

        if remaining.len() <= 1 {
            self.roll_back_pending()?;
            let winner = remaining.first().copied().unwrap_or(seat);
            self.finish(winner);
        } else if self.turn == seat {
            self.roll_back_pending()?;
            self.advance_turn();
        }
        Ok(true)
    }

    // === Internals ===

    fn ensure_actor(&self, seat: SeatId, phase: SubPhase) -> Result<()> {
        if self.status != MatchStatus::Active {
            return Err(EngineError::MatchNotActive {
                status: self.status,
            });
        }
        if seat != self.turn {
            return Err(EngineError::NotYourTurn {
                seat,
                expected: self.turn,
            });
        }
        if self.phase != phase {
            return Err(EngineError::WrongPhase {
                expected: phase,
                actual: self.phase,
            });
        }
        Ok(())
    }

    fn record(&mut self, seat: SeatId, phase: SubPhase, action: Action) -> MoveRecord {
        let record = MoveRecord::new(
            self.id,
            seat,
            self.turn_number,
            phase,
            action,
            self.board.snapshot(),
        );
        self.history.push_back(record.clone());
        record
    }

    /// Undo a move whose burn never came. The origin is still empty because
    /// nothing else happens between a move and its burn.
    fn roll_back_pending(&mut self) -> Result<Option<PendingMove>> {
        let Some(pending) = self.pending.take() else {
            return Ok(None);
        };
        self.board.apply_move(pending.to, pending.from)?;
        self.phase = SubPhase::AwaitingMove;
        self.record(
            self.turn,
            SubPhase::AwaitingBurn,
            Action::Move {
                from: pending.to,
                to: pending.from,
            },
        );
        Ok(Some(pending))
    }

    fn advance_turn(&mut self) {
        self.turn = self.next_active_seat(self.turn);
        self.phase = SubPhase::AwaitingMove;
        self.turn_number += 1;
        self.clock_epoch += 1;

        if !self.validator.has_any_legal_turn(&self.board, self.turn) {
            let winner = self.previous_active_seat(self.turn);
            self.finish(winner);
        }
    }

    fn finish(&mut self, winner: SeatId) {
        self.status = MatchStatus::Finished;
        self.winner = Some(winner);
        self.pending = None;
        info!(%winner, turns = self.turn_number, "match finished");
    }

    fn next_active_seat(&self, from: SeatId) -> SeatId {
        let count = self.players.seat_count();
        let mut seat = from;
        for _ in 0..count {
            seat = seat.next(count);
            if !self.is_departed(seat) {
                return seat;
            }
        }
        from
    }

    fn previous_active_seat(&self, from: SeatId) -> SeatId {
        let count = self.players.seat_count();
        let mut seat = from;
        for _ in 0..count {
            seat = seat.previous(count);
            if !self.is_departed(seat) {
                return seat;
            }
        }
        from
    }
}

//! The automated seat's decision entry point.
//!
//! `AiPlayer` runs a [`Strategy`] under a deadline and re-validates the
//! proposal with the same [`MoveValidator`] the match uses. A seat that can
//! play a turn always gets a legal one back, or an
//! `InternalInvariantViolation`; never a silent pass.

use std::time::Instant;

use smallvec::SmallVec;
use tracing::{debug, error};

use crate::board::Board;
use crate::core::{EngineError, GameRng, Result, SeatId, TurnAction};
use crate::rules::MoveValidator;

use super::config::{AiConfig, StrategyKind};
use super::stats::SearchStats;
use super::strategy::{MobilityStrategy, RandomStrategy, SearchLimits, Strategy};

/// Decision context for one automated seat.
///
/// Owns the configuration, the strategy, and the RNG stream; each decision
/// forks its own stream so repeated calls with the same seed replay.
#[derive(Debug)]
pub struct AiPlayer {
    validator: MoveValidator,
    config: AiConfig,
    rng: GameRng,
    strategy: Box<dyn Strategy>,
    stats: SearchStats,
    departed: SmallVec<[SeatId; 4]>,
}

impl AiPlayer {
    /// Create a new decision context for the match's rules.
    pub fn new(validator: MoveValidator, config: AiConfig) -> Self {
        let strategy: Box<dyn Strategy> = match config.strategy {
            StrategyKind::Mobility => Box::new(MobilityStrategy),
            StrategyKind::Random => Box::new(RandomStrategy),
        };
        Self {
            validator,
            rng: GameRng::new(config.seed),
            config,
            strategy,
            stats: SearchStats::default(),
            departed: SmallVec::new(),
        }
    }

    /// Set a custom strategy.
    pub fn with_strategy<S: Strategy + 'static>(mut self, strategy: S) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    /// Seats that have left the match and no longer take turns.
    pub fn with_departed(mut self, seats: impl IntoIterator<Item = SeatId>) -> Self {
        self.departed = seats.into_iter().collect();
        self
    }

    /// Statistics from the last decision.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Choose a legal (move, burn) for `seat`.
    ///
    /// Errors with `InternalInvariantViolation` if `seat` has no legal turn,
    /// if the strategy finds nothing, or if what it finds is illegal.
    pub fn choose_action(
        &mut self,
        board: &Board,
        seat: SeatId,
        deadline: Instant,
    ) -> Result<TurnAction> {
        if !self.validator.has_any_legal_turn(board, seat) {
            return Err(EngineError::invariant(format!(
                "automated {seat} asked to move with no legal turn"
            )));
        }

        let start = Instant::now();
        self.stats.reset();
        let mut rng = self.rng.fork();
        let limits = SearchLimits {
            deadline,
            max_candidates: self.config.max_candidates,
            departed: &self.departed,
        };

        let proposal = self.strategy.choose(
            board,
            seat,
            &self.validator,
            limits,
            &mut rng,
            &mut self.stats,
        );
        self.stats.time_us = start.elapsed().as_micros() as u64;

        let Some(action) = proposal else {
            error!(%seat, strategy = ?self.strategy, "no turn found for a mobile seat");
            return Err(EngineError::invariant(format!(
                "strategy found no turn for {seat}"
            )));
        };
        self.verify(board, seat, action)?;

        debug!(
            %seat,
            from = %action.from,
            to = %action.to,
            burn = %action.burn,
            positions = self.stats.positions,
            time_us = self.stats.time_us,
            "automated turn chosen"
        );
        Ok(action)
    }

    fn verify(&self, board: &Board, seat: SeatId, action: TurnAction) -> Result<()> {
        let legal = self
            .validator
            .is_legal_move(board, seat, action.from, action.to)
            && {
                let mut after = board.clone();
                after.apply_move(action.from, action.to).is_ok()
                    && self.validator.is_legal_burn_after_move(
                        &after,
                        seat,
                        action.from,
                        action.to,
                        action.burn,
                    )
            };

        if legal {
            Ok(())
        } else {
            error!(%seat, ?action, "strategy proposed an illegal turn");
            Err(EngineError::invariant(format!(
                "illegal automated turn {} -> {} burn {} for {seat}",
                action.from, action.to, action.burn
            )))
        }
    }
}

/// One-shot decision with a fresh [`AiPlayer`].
pub fn choose_action(
    board: &Board,
    seat: SeatId,
    validator: MoveValidator,
    config: &AiConfig,
    deadline: Instant,
) -> Result<TurnAction> {
    AiPlayer::new(validator, config.clone()).choose_action(board, seat, deadline)
}

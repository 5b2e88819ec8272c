//! Decision procedures for automated seats.
//!
//! Strategies are trait-based so a deployment can plug in its own:
//! - `MobilityStrategy`: one-ply search maximising reachable squares
//! - `RandomStrategy`: any legal turn, uniformly over moves
//!
//! A strategy only proposes. [`super::AiPlayer`] re-checks every proposal
//! against the validator before it leaves the AI.

use std::sync::Arc;
use std::time::Instant;

use crate::board::Board;
use crate::core::{Coord, Direction, GameRng, SeatId, TurnAction};
use crate::rules::MoveValidator;

use super::stats::SearchStats;

/// Bounds on one decision.
#[derive(Clone, Copy, Debug)]
pub struct SearchLimits<'a> {
    /// Stop scoring new candidates after this instant.
    pub deadline: Instant,

    /// Maximum moves scored (0 = unlimited).
    pub max_candidates: usize,

    /// Seats that have left. Their pieces still block, but they no longer
    /// take turns and are not scored as opponents.
    pub departed: &'a [SeatId],
}

/// Proposes a full turn for `seat`.
pub trait Strategy: Send + Sync + std::fmt::Debug {
    /// Pick a (move, burn) for `seat` on `board`, or `None` if no full turn
    /// exists.
    fn choose(
        &self,
        board: &Board,
        seat: SeatId,
        validator: &MoveValidator,
        limits: SearchLimits<'_>,
        rng: &mut GameRng,
        stats: &mut SearchStats,
    ) -> Option<TurnAction>;
}

impl<S: Strategy + ?Sized> Strategy for Arc<S> {
    fn choose(
        &self,
        board: &Board,
        seat: SeatId,
        validator: &MoveValidator,
        limits: SearchLimits<'_>,
        rng: &mut GameRng,
        stats: &mut SearchStats,
    ) -> Option<TurnAction> {
        (**self).choose(board, seat, validator, limits, rng, stats)
    }
}

/// Picks a random move, then a random burn from its destination.
///
/// Moves whose destination has no burn (possible when origin burns are
/// forbidden) are skipped.
#[derive(Clone, Debug, Default)]
pub struct RandomStrategy;

impl Strategy for RandomStrategy {
    fn choose(
        &self,
        board: &Board,
        seat: SeatId,
        validator: &MoveValidator,
        _limits: SearchLimits<'_>,
        rng: &mut GameRng,
        stats: &mut SearchStats,
    ) -> Option<TurnAction> {
        let mut moves = validator.legal_moves(board, seat);
        stats.legal_moves = moves.len() as u32;
        rng.shuffle(&mut moves);

        for (from, to) in moves {
            let after = moved(board, from, to)?;
            let burns = validator.legal_burns(&after, from, to);
            stats.moves_scored += 1;
            if let Some(&burn) = rng.choose(&burns) {
                stats.positions += 1;
                return Some(TurnAction::new(from, to, burn));
            }
        }
        None
    }
}

/// One-ply search over (move, burn) pairs.
///
/// Each position is scored as the seat's mobility (sum of open ray lengths
/// over its pieces) minus the best opponent's. Leaving the next seat with no
/// move wins outright. Candidate moves are visited in seeded random order
/// and only a strictly better score replaces the incumbent, so ties go to
/// whichever the seed put first.
#[derive(Clone, Debug, Default)]
pub struct MobilityStrategy;

impl Strategy for MobilityStrategy {
    fn choose(
        &self,
        board: &Board,
        seat: SeatId,
        validator: &MoveValidator,
        limits: SearchLimits<'_>,
        rng: &mut GameRng,
        stats: &mut SearchStats,
    ) -> Option<TurnAction> {
        let mut moves = validator.legal_moves(board, seat);
        stats.legal_moves = moves.len() as u32;
        rng.shuffle(&mut moves);

        let mut best: Option<(i64, TurnAction)> = None;
        for (from, to) in moves {
            if limits.max_candidates > 0 && stats.moves_scored as usize >= limits.max_candidates {
                break;
            }
            if best.is_some() && Instant::now() >= limits.deadline {
                stats.deadline_hit = true;
                break;
            }

            let after = moved(board, from, to)?;
            let burns = validator.legal_burns(&after, from, to);
            if burns.is_empty() {
                continue;
            }
            stats.moves_scored += 1;

            for burn in burns {
                let mut position = after.clone();
                if position.apply_burn(burn).is_err() {
                    continue;
                }
                stats.positions += 1;

                let score = score_position(&position, seat, limits.departed);
                if best.as_ref().map_or(true, |(incumbent, _)| score > *incumbent) {
                    best = Some((score, TurnAction::new(from, to, burn)));
                }
            }
        }

        best.map(|(_, action)| action)
    }
}

fn moved(board: &Board, from: Coord, to: Coord) -> Option<Board> {
    let mut after = board.clone();
    after.apply_move(from, to).ok()?;
    Some(after)
}

fn score_position(board: &Board, seat: SeatId, departed: &[SeatId]) -> i64 {
    let seats = board.seat_count();
    let next = next_in_play(seat, seats, departed);
    if next != seat && mobility(board, next) == 0 {
        return i64::MAX;
    }

    let own = mobility(board, seat);
    let best_opponent = SeatId::all(seats)
        .filter(|&other| other != seat && !departed.contains(&other))
        .map(|other| mobility(board, other))
        .max()
        .unwrap_or(0);
    own - best_opponent
}

/// The seat that moves after `seat`, skipping departed ones. `seat` itself
/// when nobody else is left.
fn next_in_play(seat: SeatId, seats: usize, departed: &[SeatId]) -> SeatId {
    let mut next = seat;
    for _ in 0..seats {
        next = next.next(seats);
        if next != seat && !departed.contains(&next) {
            return next;
        }
    }
    seat
}

/// Queen-move destinations summed over the seat's pieces.
pub fn mobility(board: &Board, seat: SeatId) -> i64 {
    board
        .pieces(seat)
        .iter()
        .map(|&piece| {
            Direction::ALL
                .iter()
                .map(|&direction| board.open_ray(piece, direction).count() as i64)
                .sum::<i64>()
        })
        .sum()
}

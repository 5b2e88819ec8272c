//! Move and burn legality.
//!
//! Pure functions over a [`Board`]; the only state a validator carries is the
//! match's [`RuleSet`]. Non-queen geometry is rejected before the board is
//! touched, then the destination and every intermediate square must be
//! empty. Pieces, burned tiles, and the board edge all block.

use crate::board::Board;
use crate::core::{Coord, Direction, RuleSet, SeatId};

/// Stateless rule engine for one match's rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveValidator {
    rules: RuleSet,
}

impl MoveValidator {
    #[must_use]
    pub const fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    #[must_use]
    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Can `seat` move its piece at `from` to `to`?
    #[must_use]
    pub fn is_legal_move(&self, board: &Board, seat: SeatId, from: Coord, to: Coord) -> bool {
        owns_piece(board, seat, from) && clear_line(board, from, to)
    }

    /// Can `seat`, whose piece now stands on `piece`, burn `tile`?
    ///
    /// Geometry only: the piece's own square is never burnable because it is
    /// occupied. See [`MoveValidator::is_legal_burn_after_move`] for the
    /// origin-square rule.
    #[must_use]
    pub fn is_legal_burn(&self, board: &Board, seat: SeatId, piece: Coord, tile: Coord) -> bool {
        owns_piece(board, seat, piece) && clear_line(board, piece, tile)
    }

    /// Burn legality for the turn's pending move `origin -> piece`, applying
    /// the match's origin-burn rule.
    #[must_use]
    pub fn is_legal_burn_after_move(
        &self,
        board: &Board,
        seat: SeatId,
        origin: Coord,
        piece: Coord,
        tile: Coord,
    ) -> bool {
        if tile == origin && !self.rules.allow_origin_burn {
            return false;
        }
        self.is_legal_burn(board, seat, piece, tile)
    }

    /// Does `seat` have at least one legal move?
    ///
    /// Scans every piece in all eight directions; returns on the first open
    /// neighbour, so the full O(pieces × directions × size) cost is only paid
    /// for a seat that is actually stuck.
    #[must_use]
    pub fn has_any_legal_move(&self, board: &Board, seat: SeatId) -> bool {
        board.pieces(seat).iter().any(|&piece| {
            Direction::ALL
                .iter()
                .any(|&direction| board.open_ray(piece, direction).next().is_some())
        })
    }

    /// Can `seat` play a whole turn, move and burn?
    ///
    /// Same as [`MoveValidator::has_any_legal_move`] while origin burns are
    /// allowed, since the vacated origin is always burnable. Otherwise a move
    /// into a pocket whose only open square is the origin does not count.
    #[must_use]
    pub fn has_any_legal_turn(&self, board: &Board, seat: SeatId) -> bool {
        if self.rules.allow_origin_burn {
            return self.has_any_legal_move(board, seat);
        }
        self.legal_moves(board, seat).into_iter().any(|(from, to)| {
            let mut after = board.clone();
            after.apply_move(from, to).is_ok() && !self.legal_burns(&after, from, to).is_empty()
        })
    }

    /// Every legal `(from, to)` for `seat`.
    #[must_use]
    pub fn legal_moves(&self, board: &Board, seat: SeatId) -> Vec<(Coord, Coord)> {
        let mut moves = Vec::new();
        for &piece in board.pieces(seat) {
            for direction in Direction::ALL {
                moves.extend(board.open_ray(piece, direction).map(|to| (piece, to)));
            }
        }
        moves
    }

    /// Every square burnable from `piece` on the current board.
    ///
    /// With the pending move already applied, `origin` is excluded when the
    /// rules forbid burning it.
    #[must_use]
    pub fn legal_burns(&self, board: &Board, origin: Coord, piece: Coord) -> Vec<Coord> {
        let mut burns = Vec::new();
        for direction in Direction::ALL {
            burns.extend(
                board
                    .open_ray(piece, direction)
                    .filter(|&tile| self.rules.allow_origin_burn || tile != origin),
            );
        }
        burns
    }
}

fn owns_piece(board: &Board, seat: SeatId, at: Coord) -> bool {
    board.get(at).and_then(|tile| tile.owner()) == Some(seat)
}

/// Straight, non-empty, unobstructed line ending on an empty square.
fn clear_line(board: &Board, from: Coord, to: Coord) -> bool {
    if !board.is_open(to) {
        return false;
    }
    if Direction::between(from, to).is_none() {
        return false;
    }
    board
        .line_path(from, to)
        .iter()
        .all(|&square| board.is_open(square))
}

//! The square grid and piece placement.
//!
//! `Board` owns the tiles and a per-seat index of piece positions so that
//! rule checks never scan the whole grid to find a seat's queens. Mutations
//! check their own preconditions and report a broken precondition as an
//! internal invariant violation; legality (straight lines, clear paths) is
//! the validator's job and is assumed to have run first.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Coord, Direction, EngineError, PieceConfig, Result, SeatId, SeatMap};

use super::snapshot::BoardSnapshot;

/// Squares strictly between two points on a line. Sized for the common
/// case so short paths never allocate.
pub type LinePath = SmallVec<[Coord; 16]>;

/// Piece positions of one seat.
pub type PieceList = SmallVec<[Coord; 4]>;

/// State of a single square.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    Occupied(SeatId),
    Burned,
}

impl Tile {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Tile::Empty
    }

    /// Seat owning the piece on this square, if any.
    #[must_use]
    pub fn owner(self) -> Option<SeatId> {
        match self {
            Tile::Occupied(seat) => Some(seat),
            _ => None,
        }
    }
}

/// An S×S Amazons board.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    size: usize,
    tiles: Vec<Tile>,
    pieces: SeatMap<PieceList>,
    burned: usize,
}

impl Board {
    /// Build a board of edge `size` with the given starting pieces.
    ///
    /// The seat count is the highest owner index plus one.
    pub fn new(size: usize, config: &PieceConfig) -> Result<Self> {
        config.validate(size)?;

        let mut tiles = vec![Tile::Empty; size * size];
        let mut pieces: SeatMap<PieceList> = SeatMap::with_default(config.seat_count());
        for placement in config.placements() {
            tiles[placement.at.index(size)] = Tile::Occupied(placement.owner);
            pieces[placement.owner].push(placement.at);
        }

        Ok(Self {
            size,
            tiles,
            pieces,
            burned: 0,
        })
    }

    /// Edge length.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of seats with pieces on this board.
    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.pieces.seat_count()
    }

    /// Tile state at `coord`.
    pub fn tile_at(&self, coord: Coord) -> Result<Tile> {
        self.get(coord).ok_or(EngineError::OutOfBounds {
            coord,
            size: self.size,
        })
    }

    /// Tile state at `coord`, `None` when off the board.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<Tile> {
        if coord.in_bounds(self.size) {
            Some(self.tiles[coord.index(self.size)])
        } else {
            None
        }
    }

    /// True when `coord` is on the board and empty.
    #[must_use]
    pub fn is_open(&self, coord: Coord) -> bool {
        self.get(coord) == Some(Tile::Empty)
    }

    /// Positions of a seat's pieces. Empty for unknown seats.
    #[must_use]
    pub fn pieces(&self, seat: SeatId) -> &[Coord] {
        self.pieces.get(seat).map_or(&[][..], |p| p.as_slice())
    }

    /// Number of burned tiles. Never decreases.
    #[must_use]
    pub fn burned_count(&self) -> usize {
        self.burned
    }

    /// Relocate the piece at `from` to `to`.
    pub fn apply_move(&mut self, from: Coord, to: Coord) -> Result<()> {
        let seat = self.tile_at(from)?.owner().ok_or_else(|| {
            EngineError::invariant(format!("move source {from} holds no piece"))
        })?;
        if !self.tile_at(to)?.is_empty() {
            return Err(EngineError::invariant(format!("move target {to} is not empty")));
        }

        let slot = self.pieces[seat]
            .iter_mut()
            .find(|p| **p == from)
            .ok_or_else(|| {
                EngineError::invariant(format!("piece index for {seat} is missing {from}"))
            })?;
        *slot = to;

        self.tiles[from.index(self.size)] = Tile::Empty;
        self.tiles[to.index(self.size)] = Tile::Occupied(seat);
        Ok(())
    }

    /// Mark `tile` burned. Irreversible.
    pub fn apply_burn(&mut self, tile: Coord) -> Result<()> {
        if !self.tile_at(tile)?.is_empty() {
            return Err(EngineError::invariant(format!("burn target {tile} is not empty")));
        }
        self.tiles[tile.index(self.size)] = Tile::Burned;
        self.burned += 1;
        Ok(())
    }

    /// Immutable copy of the full grid.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::new(self.size, self.tiles.clone())
    }

    /// Squares strictly between `from` and `to`, in order from `from`.
    ///
    /// Empty when the two points are not on a common rank, file, or
    /// diagonal, when they coincide, or when either lies off the board.
    /// Adjacent squares also yield an empty path.
    #[must_use]
    pub fn line_path(&self, from: Coord, to: Coord) -> LinePath {
        let mut path = LinePath::new();
        if !from.in_bounds(self.size) || !to.in_bounds(self.size) {
            return path;
        }
        let Some((direction, distance)) = Direction::between(from, to) else {
            return path;
        };

        let mut cursor = from;
        for _ in 1..distance {
            cursor = cursor.step(direction);
            path.push(cursor);
        }
        path
    }

    /// Empty squares reachable from `from` heading in `direction`, stopping
    /// at the first piece, burned tile, or edge.
    pub fn open_ray(&self, from: Coord, direction: Direction) -> impl Iterator<Item = Coord> + '_ {
        let mut cursor = from;
        std::iter::from_fn(move || {
            cursor = cursor.step(direction);
            self.is_open(cursor).then_some(cursor)
        })
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        super::snapshot::render(self.size, &self.tiles, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PiecePlacement;

    fn two_corner_board() -> Board {
        let config = PieceConfig::new(vec![
            PiecePlacement::new(0, 0, 0),
            PiecePlacement::new(3, 3, 1),
        ]);
        Board::new(4, &config).unwrap()
    }

    #[test]
    fn test_new_places_pieces() {
        let board = two_corner_board();

        assert_eq!(board.size(), 4);
        assert_eq!(board.seat_count(), 2);
        assert_eq!(board.tile_at(Coord::new(0, 0)).unwrap(), Tile::Occupied(SeatId::new(0)));
        assert_eq!(board.tile_at(Coord::new(3, 3)).unwrap(), Tile::Occupied(SeatId::new(1)));
        assert_eq!(board.tile_at(Coord::new(1, 1)).unwrap(), Tile::Empty);
        assert_eq!(board.pieces(SeatId::new(0)), &[Coord::new(0, 0)]);
    }

    #[test]
    fn test_tile_at_out_of_bounds() {
        let board = two_corner_board();
        assert_eq!(
            board.tile_at(Coord::new(4, 0)),
            Err(EngineError::OutOfBounds {
                coord: Coord::new(4, 0),
                size: 4
            })
        );
        assert!(board.tile_at(Coord::new(-1, 2)).is_err());
    }

    #[test]
    fn test_apply_move_relocates_piece() {
        let mut board = two_corner_board();
        board.apply_move(Coord::new(0, 0), Coord::new(3, 0)).unwrap();

        assert_eq!(board.tile_at(Coord::new(0, 0)).unwrap(), Tile::Empty);
        assert_eq!(board.tile_at(Coord::new(3, 0)).unwrap(), Tile::Occupied(SeatId::new(0)));
        assert_eq!(board.pieces(SeatId::new(0)), &[Coord::new(3, 0)]);
    }

    #[test]
    fn test_apply_move_requires_piece_and_empty_target() {
        let mut board = two_corner_board();

        let err = board.apply_move(Coord::new(1, 1), Coord::new(2, 2)).unwrap_err();
        assert!(err.is_internal());

        let err = board.apply_move(Coord::new(0, 0), Coord::new(3, 3)).unwrap_err();
        assert!(err.is_internal());
        assert_eq!(board, two_corner_board());
    }

    #[test]
    fn test_apply_burn_is_counted() {
        let mut board = two_corner_board();
        board.apply_burn(Coord::new(2, 1)).unwrap();

        assert_eq!(board.tile_at(Coord::new(2, 1)).unwrap(), Tile::Burned);
        assert_eq!(board.burned_count(), 1);
        assert!(board.apply_burn(Coord::new(2, 1)).is_err());
        assert!(board.apply_burn(Coord::new(0, 0)).is_err());
        assert_eq!(board.burned_count(), 1);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut board = two_corner_board();
        let before = board.snapshot();

        board.apply_burn(Coord::new(1, 2)).unwrap();

        assert_eq!(before.tile_at(Coord::new(1, 2)), Some(Tile::Empty));
        assert_ne!(before, board.snapshot());
    }

    #[test]
    fn test_line_path() {
        let board = two_corner_board();

        let path = board.line_path(Coord::new(0, 0), Coord::new(3, 0));
        assert_eq!(path.as_slice(), &[Coord::new(1, 0), Coord::new(2, 0)]);

        let path = board.line_path(Coord::new(3, 3), Coord::new(0, 0));
        assert_eq!(path.as_slice(), &[Coord::new(2, 2), Coord::new(1, 1)]);

        assert!(board.line_path(Coord::new(0, 0), Coord::new(1, 0)).is_empty());
        assert!(board.line_path(Coord::new(0, 0), Coord::new(1, 2)).is_empty());
        assert!(board.line_path(Coord::new(0, 0), Coord::new(0, 0)).is_empty());
        assert!(board.line_path(Coord::new(0, 0), Coord::new(0, 7)).is_empty());
    }

    #[test]
    fn test_open_ray_stops_at_obstacles() {
        let mut board = two_corner_board();
        board.apply_burn(Coord::new(2, 0)).unwrap();

        let east: Vec<_> = board.open_ray(Coord::new(0, 0), Direction::East).collect();
        assert_eq!(east, vec![Coord::new(1, 0)]);

        let diagonal: Vec<_> = board.open_ray(Coord::new(0, 0), Direction::SouthEast).collect();
        assert_eq!(diagonal, vec![Coord::new(1, 1), Coord::new(2, 2)]);

        assert_eq!(board.open_ray(Coord::new(0, 0), Direction::North).count(), 0);
    }

    #[test]
    fn test_display() {
        let mut board = two_corner_board();
        board.apply_burn(Coord::new(1, 0)).unwrap();

        assert_eq!(board.to_string(), "0#..\n....\n....\n...1\n");
    }
}

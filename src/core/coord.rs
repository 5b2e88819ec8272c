//! Board coordinates and the eight queen-line directions.
//!
//! Coordinates are signed so that transports can hand us whatever the client
//! sent; bounds are only meaningful relative to a board size and are checked
//! by [`Coord::in_bounds`].

use serde::{Deserialize, Serialize};

/// A square on the board, `(x, y)` with `(0, 0)` in the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Check whether this coordinate lies inside a `size`×`size` board.
    #[must_use]
    pub const fn in_bounds(self, size: usize) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as usize) < size && (self.y as usize) < size
    }

    /// Row-major index into a `size`×`size` grid.
    ///
    /// Only meaningful when `in_bounds(size)` holds.
    #[must_use]
    pub const fn index(self, size: usize) -> usize {
        self.y as usize * size + self.x as usize
    }

    /// Step one square in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// One of the eight directions a queen (and an arrow) may travel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// All eight directions, clockwise from north.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Unit step `(dx, dy)`. North is decreasing `y`.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    /// Direction and distance from `from` to `to`, if they share a rank, file,
    /// or exact diagonal.
    ///
    /// Returns `None` for a zero-length request, any non-queen line, or a
    /// span too wide for `i32`.
    ///
    /// ```
    /// use amazons_engine::core::{Coord, Direction};
    ///
    /// let line = Direction::between(Coord::new(0, 0), Coord::new(3, 3));
    /// assert_eq!(line, Some((Direction::SouthEast, 3)));
    /// assert_eq!(Direction::between(Coord::new(0, 0), Coord::new(1, 2)), None);
    /// ```
    #[must_use]
    pub fn between(from: Coord, to: Coord) -> Option<(Direction, u32)> {
        let dx = to.x.checked_sub(from.x)?;
        let dy = to.y.checked_sub(from.y)?;

        if dx == 0 && dy == 0 {
            return None;
        }
        if dx != 0 && dy != 0 && dx.unsigned_abs() != dy.unsigned_abs() {
            return None;
        }

        let direction = match (dx.signum(), dy.signum()) {
            (0, -1) => Direction::North,
            (1, -1) => Direction::NorthEast,
            (1, 0) => Direction::East,
            (1, 1) => Direction::SouthEast,
            (0, 1) => Direction::South,
            (-1, 1) => Direction::SouthWest,
            (-1, 0) => Direction::West,
            _ => Direction::NorthWest,
        };

        Some((direction, dx.unsigned_abs().max(dy.unsigned_abs())))
    }
}

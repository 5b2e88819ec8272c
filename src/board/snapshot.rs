//! Immutable board snapshots for broadcast and replay.
//!
//! A snapshot owns its tiles; the board it came from can keep mutating
//! without the transport ever observing it.

use serde::{Deserialize, Serialize};

use crate::core::Coord;

use super::grid::Tile;

/// Full-grid copy of a board at one instant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSnapshot {
    size: usize,
    tiles: Vec<Tile>,
}

impl BoardSnapshot {
    pub(crate) fn new(size: usize, tiles: Vec<Tile>) -> Self {
        Self { size, tiles }
    }

    /// Edge length.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Tiles in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[must_use]
    pub fn tile_at(&self, coord: Coord) -> Option<Tile> {
        if !coord.in_bounds(self.size) {
            return None;
        }
        self.tiles.get(coord.index(self.size)).copied()
    }

    /// Coordinates of every burned tile.
    pub fn burned(&self) -> impl Iterator<Item = Coord> + '_ {
        let size = self.size.max(1);
        self.tiles.iter().enumerate().filter_map(move |(i, tile)| {
            (*tile == Tile::Burned).then(|| Coord::new((i % size) as i32, (i / size) as i32))
        })
    }

    /// Compact binary encoding for transports.
    pub fn encode(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Inverse of [`BoardSnapshot::encode`].
    ///
    /// Rejects payloads whose tile count is not `size * size`.
    pub fn decode(bytes: &[u8]) -> Result<Self, bincode::Error> {
        let snapshot: Self = bincode::deserialize(bytes)?;
        let expected = snapshot.size.checked_mul(snapshot.size);
        if expected != Some(snapshot.tiles.len()) {
            return Err(Box::new(bincode::ErrorKind::Custom(format!(
                "snapshot of size {} carries {} tiles",
                snapshot.size,
                snapshot.tiles.len()
            ))));
        }
        Ok(snapshot)
    }
}

impl std::fmt::Display for BoardSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        render(self.size, &self.tiles, f)
    }
}

/// One text row per board row: `.` empty, `#` burned, seat index otherwise.
pub(crate) fn render(size: usize, tiles: &[Tile], f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for row in tiles.chunks(size.max(1)) {
        for tile in row {
            let glyph = match tile {
                Tile::Empty => '.',
                Tile::Burned => '#',
                Tile::Occupied(seat) => {
                    char::from_digit(u32::from(seat.0), 36).unwrap_or('?')
                }
            };
            write!(f, "{glyph}")?;
        }
        writeln!(f)?;
    }
    Ok(())
}

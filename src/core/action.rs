//! Action representation.
//!
//! A turn is two actions: a queen move followed by a burn. The engine
//! accepts them one at a time from humans; automated seats produce both at
//! once as a [`TurnAction`].

use serde::{Deserialize, Serialize};

use super::coord::Coord;

/// A single accepted or requested mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Relocate the piece at `from` to `to`.
    Move { from: Coord, to: Coord },
    /// Mark `tile` permanently burned.
    Burn { tile: Coord },
}

/// A whole turn: move, then burn from the piece's new square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnAction {
    pub from: Coord,
    pub to: Coord,
    pub burn: Coord,
}

impl TurnAction {
    #[must_use]
    pub const fn new(from: Coord, to: Coord, burn: Coord) -> Self {
        Self { from, to, burn }
    }
}

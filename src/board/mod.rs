//! Board model: tiles, piece placement, line geometry, snapshots.
//!
//! Pure geometric and state queries plus the two mutations a turn makes
//! (`apply_move`, `apply_burn`). Legality lives in [`crate::rules`].

pub mod grid;
pub mod snapshot;

pub use grid::{Board, LinePath, PieceList, Tile};
pub use snapshot::BoardSnapshot;

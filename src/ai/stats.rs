//! Decision statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Statistics collected while choosing one turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Legal moves available to the seat.
    pub legal_moves: u32,

    /// Moves whose burns were fully scored.
    pub moves_scored: u32,

    /// (move, burn) positions evaluated.
    pub positions: u32,

    /// Whether the deadline cut the search short.
    pub deadline_hit: bool,

    /// Total time spent deciding (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all statistics to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Evaluated positions per second.
    #[must_use]
    pub fn positions_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.positions as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }
}

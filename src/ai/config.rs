//! Automated seat configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which decision procedure an automated seat uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// One-ply search scoring mobility difference.
    #[default]
    Mobility,
    /// Uniformly random legal turn.
    Random,
}

/// Automated seat parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub strategy: StrategyKind,

    /// Random seed for candidate ordering and tie-breaks.
    /// Same seed and same board produce the same choice.
    pub seed: u64,

    /// Maximum moves scored per decision (0 = unlimited).
    /// Each scored move expands every burn from its destination.
    pub max_candidates: usize,

    /// Share of the turn budget a decision may spend (0.0..=1.0).
    /// The rest is slack for applying the action before the timer fires.
    pub time_fraction: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Mobility,
            seed: 42,
            max_candidates: 64,
            time_fraction: 0.5,
        }
    }
}

impl AiConfig {
    /// Create a new config with a custom strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Create a new config with custom seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Create a new config with a custom candidate cap.
    #[must_use]
    pub fn with_max_candidates(mut self, max: usize) -> Self {
        self.max_candidates = max;
        self
    }

    /// Create a new config with a custom share of the turn budget.
    #[must_use]
    pub fn with_time_fraction(mut self, fraction: f64) -> Self {
        self.time_fraction = fraction;
        self
    }

    /// Time a decision may take within `turn_budget`.
    #[must_use]
    pub fn think_time(&self, turn_budget: Duration) -> Duration {
        let fraction = if self.time_fraction.is_finite() {
            self.time_fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        turn_budget.mul_f64(fraction)
    }
}

//! Match lifecycle and turn sub-phases.

use serde::{Deserialize, Serialize};

/// Lifecycle of a match. One-way: `Setup → Active → Finished`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Setup,
    Active,
    Finished,
}

/// The two halves of a turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubPhase {
    #[default]
    AwaitingMove,
    AwaitingBurn,
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Setup => write!(f, "setup"),
            Self::Active => write!(f, "active"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

impl std::fmt::Display for SubPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AwaitingMove => write!(f, "awaiting_move"),
            Self::AwaitingBurn => write!(f, "awaiting_burn"),
        }
    }
}

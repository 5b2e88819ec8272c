//! The match turn engine.
//!
//! - [`Match`]: lifecycle, turn order, move-then-burn sub-phases, terminal
//!   detection, timer expiry, departures
//! - [`MoveRecord`]: append-only history of accepted mutations
//! - [`TimeoutPolicy`]: what an expired turn turns into
//! - [`replay`]: rebuild and verify a board from history

pub mod phase;
pub mod record;
pub mod replay;
pub mod timeout;
pub mod turn_engine;

pub use phase::{MatchStatus, SubPhase};
pub use record::MoveRecord;
pub use replay::replay;
pub use timeout::{policy_for, ForfeitMatch, SkipTurn, TimeoutAction, TimeoutPolicy};
pub use turn_engine::{Match, PendingMove, TimeoutOutcome};

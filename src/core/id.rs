//! Match and participant identifiers, and the generator capability that
//! mints them.
//!
//! The registry never creates identifiers inline. It is handed an
//! [`IdGenerator`] at construction: [`UuidIds`] in production,
//! [`SequentialIds`] where tests want predictable values.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a live match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchId(Uuid);

impl MatchId {
    /// Create a match ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for MatchId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// External identity of a participant, as supplied by the session layer.
///
/// Automated seats get a synthetic identity from the [`IdGenerator`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Source of collision-resistant identifiers for matches and bot seats.
pub trait IdGenerator: Send + Sync {
    /// Mint a fresh match identifier.
    fn next_match_id(&self) -> MatchId;

    /// Mint a synthetic identity for an automated seat.
    fn next_bot_identity(&self) -> ParticipantId;
}

/// Random v4 UUIDs.
#[derive(Clone, Debug, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_match_id(&self) -> MatchId {
        MatchId(Uuid::new_v4())
    }

    fn next_bot_identity(&self) -> ParticipantId {
        ParticipantId(format!("bot-{}", Uuid::new_v4().simple()))
    }
}

/// Monotonic counter identifiers. Same construction, same sequence.
#[derive(Debug, Default)]
pub struct SequentialIds {
    counter: AtomicU64,
}

impl SequentialIds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl IdGenerator for SequentialIds {
    fn next_match_id(&self) -> MatchId {
        MatchId(Uuid::from_u128(u128::from(self.bump())))
    }

    fn next_bot_identity(&self) -> ParticipantId {
        ParticipantId(format!("bot-{}", self.bump()))
    }
}

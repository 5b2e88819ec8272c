//! # amazons-engine
//!
//! Match engine for the Game of the Amazons: queen moves followed by an
//! arrow that permanently burns a tile, on an S×S board with any number of
//! seats.
//!
//! ## Design Principles
//!
//! 1. **Exact Legality**: Every move and burn goes through one stateless
//!    `MoveValidator`. Humans and automated seats get the same checks.
//!
//! 2. **N-Seat First**: Seat count comes from the piece placement. Nothing
//!    assumes two players.
//!
//! 3. **Typed at the Boundary**: Wire requests are parsed into a validated
//!    `MatchSetup` before a match exists. The engine never sees raw shapes.
//!
//! 4. **All-or-Nothing Mutations**: A rejected action leaves the board
//!    byte-for-byte identical and emits nothing.
//!
//! ## Architecture
//!
//! - **Single Writer per Match**: Each match lives in its own tokio task and
//!   only that task mutates it. Matches share nothing.
//!
//! - **Off-Task AI**: Automated seats think on the blocking pool against a
//!   copy of the board; the decision re-enters through the match's mailbox.
//!
//! - **Persistent History**: Move records live in an `im::Vector`, so
//!   handing history to a caller is O(1).
//!
//! ## Modules
//!
//! - `core`: Coordinates, seats, identifiers, actions, errors, RNG, configuration
//! - `board`: Tiles, piece index, line geometry, snapshots
//! - `rules`: Move and burn legality
//! - `players`: Participant ↔ seat mapping
//! - `game`: Turn engine, timeout policies, history, replay
//! - `ai`: Automated seat strategies
//! - `service`: Per-match actors and the match registry

pub mod ai;
pub mod board;
pub mod core;
pub mod game;
pub mod players;
pub mod rules;
pub mod service;

// Re-export commonly used types
pub use crate::core::{
    Action, Coord, Direction, EngineConfig, EngineError, GameRng, IdGenerator, MatchId,
    MatchSetup, ParticipantId, PieceConfig, PiecePlacement, Result, RuleSet, SeatId, SeatMap,
    SequentialIds, StartMatch, TimeoutPolicyKind, TimerScope, TurnAction, UuidIds,
};

pub use crate::board::{Board, BoardSnapshot, Tile};

pub use crate::rules::MoveValidator;

pub use crate::players::{PlayerRegistry, SeatAssignment, SeatKind};

pub use crate::game::{
    replay, Match, MatchStatus, MoveRecord, SubPhase, TimeoutAction, TimeoutPolicy,
};

pub use crate::ai::{AiConfig, AiPlayer, MobilityStrategy, RandomStrategy, Strategy};

pub use crate::service::{
    AttemptBurn, AttemptMove, BoardSnapshotEvent, BurnSuccess, MatchEvent, MatchRegistry,
    MoveSuccess,
};

//! Core engine types: coordinates, seats, identifiers, actions, errors,
//! RNG, configuration.
//!
//! Everything above this module (board, rules, turn engine, AI, service)
//! speaks in these types.

pub mod action;
pub mod config;
pub mod coord;
pub mod error;
pub mod id;
pub mod rng;
pub mod seat;

pub use action::{Action, TurnAction};
pub use config::{
    EngineConfig, MatchSetup, PieceConfig, PiecePlacement, PieceRequest, RuleSet, SeatRequest,
    StartMatch, TimeoutPolicyKind, TimerScope, MAX_BOARD_SIZE, STANDARD_BOARD_SIZE,
};
pub use coord::{Coord, Direction};
pub use error::{EngineError, Result};
pub use id::{IdGenerator, MatchId, ParticipantId, SequentialIds, UuidIds};
pub use rng::GameRng;
pub use seat::{SeatId, SeatMap};

//! Automated seats.
//!
//! ## Overview
//!
//! Given a board and a seat, produce a full legal turn (move, then burn)
//! within a deadline. The decision runs on a plain `&Board` so the service
//! can hand it a private copy and run it off the match's task.
//!
//! - **Strategies**: pluggable behind [`Strategy`]; mobility search by default
//! - **Deterministic**: seeded candidate ordering, forked per decision
//! - **Self-checking**: every proposal is re-validated before it is returned
//!
//! ## Usage
//!
//! ```rust
//! use std::time::{Duration, Instant};
//!
//! use amazons_engine::ai::{AiConfig, AiPlayer};
//! use amazons_engine::board::Board;
//! use amazons_engine::core::{PieceConfig, SeatId};
//! use amazons_engine::rules::MoveValidator;
//!
//! let board = Board::new(10, &PieceConfig::standard()).unwrap();
//! let mut ai = AiPlayer::new(MoveValidator::default(), AiConfig::default());
//!
//! let deadline = Instant::now() + Duration::from_millis(200);
//! let turn = ai.choose_action(&board, SeatId::new(0), deadline).unwrap();
//! println!("{} -> {}, burn {}", turn.from, turn.to, turn.burn);
//! ```

pub mod config;
pub mod search;
pub mod stats;
pub mod strategy;

pub use config::{AiConfig, StrategyKind};
pub use search::{choose_action, AiPlayer};
pub use stats::SearchStats;
pub use strategy::{mobility, MobilityStrategy, RandomStrategy, SearchLimits, Strategy};

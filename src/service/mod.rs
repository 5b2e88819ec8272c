//! Match service: one actor per live match, owned by a [`MatchRegistry`].
//!
//! - [`MatchRegistry`]: creation, lookup, teardown, event fan-out
//! - [`MatchHandle`]: request/response channel into one match's actor
//! - [`messages`]: wire requests, replies, and broadcast events
//!
//! ## Usage
//!
//! ```rust
//! use amazons_engine::core::{PieceRequest, SeatRequest, StartMatch};
//! use amazons_engine::players::SeatKind;
//! use amazons_engine::service::MatchRegistry;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let registry = MatchRegistry::default();
//! let request = StartMatch {
//!     seats: vec![
//!         SeatRequest { external_id: "alice".into(), kind: SeatKind::Human, accepted: true },
//!         SeatRequest { external_id: "bob".into(), kind: SeatKind::Human, accepted: true },
//!     ],
//!     piece_config: vec![
//!         PieceRequest { x: 0, y: 0, owner: 0 },
//!         PieceRequest { x: 3, y: 3, owner: 1 },
//!     ],
//!     board_size: 4,
//!     turn_timer_ms: 30_000,
//!     rules: Default::default(),
//! };
//!
//! let id = registry.start_match(&request).await.unwrap();
//! let view = registry.view(id).await.unwrap();
//! assert_eq!(view.turn_number, 1);
//! # }
//! ```

pub mod actor;
pub mod messages;
pub mod registry;

pub use actor::MatchHandle;
pub use messages::{
    AttemptBurn, AttemptMove, BoardSnapshotEvent, BurnSuccess, MatchEvent, MatchFinished,
    MoveSuccess, TurnTimedOut,
};
pub use registry::MatchRegistry;

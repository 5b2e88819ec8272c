//! Bot-versus-bot match through the full service stack.
//!
//! ```text
//! RUST_LOG=amazons_engine=debug amazons-selfplay [board-size] [seed]
//! ```
//!
//! Plays the standard layout on a 10×10 board by default, printing every
//! board the match broadcasts.

use std::sync::Arc;

use amazons_engine::ai::AiConfig;
use amazons_engine::core::{
    EngineConfig, PieceConfig, PieceRequest, SeatRequest, StartMatch, UuidIds,
    STANDARD_BOARD_SIZE,
};
use amazons_engine::players::SeatKind;
use amazons_engine::service::{MatchEvent, MatchRegistry};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let board_size = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(STANDARD_BOARD_SIZE as i64);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    let config = EngineConfig::default().with_ai(AiConfig::default().with_seed(seed));
    let registry = MatchRegistry::new(config, Arc::new(UuidIds));
    let mut events = registry.subscribe();

    let request = StartMatch {
        seats: vec![bot_seat(), bot_seat()],
        piece_config: layout(board_size),
        board_size,
        turn_timer_ms: 2_000,
        rules: Default::default(),
    };

    let match_id = match registry.start_match(&request).await {
        Ok(id) => id,
        Err(err) => {
            eprintln!("cannot start match: {err}");
            std::process::exit(2);
        }
    };
    info!(%match_id, board_size, seed, "self-play started");

    loop {
        match events.recv().await {
            Ok(MatchEvent::Snapshot(view)) if view.match_id == match_id => {
                println!("turn {} ({}, {})", view.turn_number, view.turn_seat, view.phase);
                println!("{}", view.tiles);
            }
            Ok(MatchEvent::Finished(finished)) if finished.match_id == match_id => {
                match finished.winner_seat {
                    Some(seat) => println!("{seat} wins"),
                    None => println!("no winner"),
                }
                break;
            }
            Ok(MatchEvent::Quarantined { reason, .. }) => {
                eprintln!("match halted: {reason}");
                std::process::exit(1);
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "event stream lagged"),
            Err(RecvError::Closed) => break,
        }
    }
}

fn bot_seat() -> SeatRequest {
    SeatRequest {
        external_id: String::new(),
        kind: SeatKind::Automated,
        accepted: true,
    }
}

/// Standard layout on 10×10, otherwise two pieces per seat in the corners.
fn layout(board_size: i64) -> Vec<PieceRequest> {
    if board_size == STANDARD_BOARD_SIZE as i64 {
        return PieceConfig::standard()
            .placements()
            .iter()
            .map(|p| PieceRequest {
                x: i64::from(p.at.x),
                y: i64::from(p.at.y),
                owner: i64::from(p.owner.0),
            })
            .collect();
    }

    let last = board_size - 1;
    vec![
        PieceRequest { x: 0, y: 0, owner: 0 },
        PieceRequest { x: last, y: 0, owner: 0 },
        PieceRequest { x: 0, y: last, owner: 1 },
        PieceRequest { x: last, y: last, owner: 1 },
    ]
}

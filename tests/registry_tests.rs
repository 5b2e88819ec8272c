//! Match service integration tests: registry lifecycle, actors, timers,
//! automated seats.

use std::sync::Arc;
use std::time::Duration;

use amazons_engine::ai::{AiConfig, SearchLimits, SearchStats, Strategy, StrategyKind};
use amazons_engine::board::Board;
use amazons_engine::core::{
    Coord, EngineConfig, EngineError, GameRng, MatchId, PieceRequest, RuleSet, SeatId,
    SeatRequest, SequentialIds, StartMatch, TimeoutPolicyKind, TimerScope, TurnAction,
};
use amazons_engine::game::{MatchStatus, SubPhase, TimeoutAction};
use amazons_engine::players::SeatKind;
use amazons_engine::rules::MoveValidator;
use amazons_engine::service::{AttemptBurn, AttemptMove, MatchEvent, MatchRegistry};
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::broadcast::Receiver;

fn registry() -> MatchRegistry {
    let config = EngineConfig {
        event_capacity: 4096,
        ..EngineConfig::default()
    }
    .with_ai(AiConfig::default().with_max_candidates(16));
    MatchRegistry::new(config, Arc::new(SequentialIds::new()))
}

fn human(id: &str) -> SeatRequest {
    SeatRequest {
        external_id: id.to_string(),
        kind: SeatKind::Human,
        accepted: true,
    }
}

fn bot() -> SeatRequest {
    SeatRequest {
        external_id: String::new(),
        kind: SeatKind::Automated,
        accepted: true,
    }
}

fn corners(seats: Vec<SeatRequest>, timer_ms: i64, rules: RuleSet) -> StartMatch {
    StartMatch {
        seats,
        piece_config: vec![
            PieceRequest { x: 0, y: 0, owner: 0 },
            PieceRequest { x: 3, y: 3, owner: 1 },
        ],
        board_size: 4,
        turn_timer_ms: timer_ms,
        rules,
    }
}

fn six_by_six(seats: Vec<SeatRequest>) -> StartMatch {
    StartMatch {
        seats,
        piece_config: vec![
            PieceRequest { x: 0, y: 2, owner: 0 },
            PieceRequest { x: 5, y: 3, owner: 0 },
            PieceRequest { x: 2, y: 0, owner: 1 },
            PieceRequest { x: 3, y: 5, owner: 1 },
        ],
        board_size: 6,
        turn_timer_ms: 30_000,
        rules: RuleSet::default(),
    }
}

fn mv(match_id: MatchId, who: &str, from: (i32, i32), to: (i32, i32)) -> AttemptMove {
    AttemptMove {
        match_id,
        external_id: who.into(),
        from: Coord::new(from.0, from.1),
        to: Coord::new(to.0, to.1),
    }
}

fn burn(match_id: MatchId, who: &str, tile: (i32, i32)) -> AttemptBurn {
    AttemptBurn {
        match_id,
        external_id: who.into(),
        tile: Coord::new(tile.0, tile.1),
    }
}

async fn next_for(events: &mut Receiver<MatchEvent>, match_id: MatchId) -> MatchEvent {
    loop {
        let event = events.recv().await.unwrap();
        if event.match_id() == match_id {
            return event;
        }
    }
}

/// Collect this match's events up to and including `Finished`.
async fn until_finished(events: &mut Receiver<MatchEvent>, match_id: MatchId) -> Vec<MatchEvent> {
    let mut seen = Vec::new();
    loop {
        let event = next_for(events, match_id).await;
        let done = matches!(event, MatchEvent::Finished(_));
        seen.push(event);
        if done {
            return seen;
        }
    }
}

async fn wait_removed(registry: &MatchRegistry, match_id: MatchId) {
    while registry.contains(match_id).await {
        tokio::task::yield_now().await;
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test]
async fn test_start_match_rejects_seat_mismatch() {
    let registry = registry();
    let mut request = corners(vec![human("alice"), human("bob")], 1_000, RuleSet::default());
    request.seats[1].accepted = false;

    let err = registry.start_match(&request).await.unwrap_err();

    assert!(matches!(err, EngineError::InvalidConfiguration { .. }));
    assert!(registry.is_empty().await);
}

#[tokio::test]
async fn test_start_publishes_initial_snapshot() {
    let registry = registry();
    let mut events = registry.subscribe();

    let id = registry
        .start_match(&corners(vec![human("alice"), human("bob")], 60_000, RuleSet::default()))
        .await
        .unwrap();

    let MatchEvent::Snapshot(view) = next_for(&mut events, id).await else {
        panic!("expected a snapshot first");
    };
    assert_eq!(view.status, MatchStatus::Active);
    assert_eq!(view.turn_seat, SeatId::new(0));
    assert_eq!(view.phase, SubPhase::AwaitingMove);
    assert_eq!(view.turn_number, 1);
    assert!(registry.contains(id).await);
}

#[tokio::test]
async fn test_unknown_match_and_participant() {
    let registry = registry();
    let id = registry
        .start_match(&corners(vec![human("alice"), human("bob")], 60_000, RuleSet::default()))
        .await
        .unwrap();

    let missing = MatchId::from_uuid(uuid::Uuid::from_u128(999));
    assert_eq!(
        registry.attempt_move(mv(missing, "alice", (0, 0), (1, 0))).await,
        Err(EngineError::UnknownMatch(missing))
    );
    assert_eq!(
        registry.attempt_move(mv(id, "mallory", (0, 0), (1, 0))).await,
        Err(EngineError::UnknownParticipant("mallory".into()))
    );
}

#[tokio::test]
async fn test_remove_stops_the_match() {
    let registry = registry();
    let id = registry
        .start_match(&corners(vec![human("alice"), human("bob")], 60_000, RuleSet::default()))
        .await
        .unwrap();

    assert!(registry.remove(id).await);
    assert!(!registry.remove(id).await);
    assert_eq!(registry.view(id).await, Err(EngineError::UnknownMatch(id)));
}

// =============================================================================
// Human play
// =============================================================================

#[tokio::test]
async fn test_accepted_actions_broadcast_and_rejections_do_not() {
    let registry = registry();
    let mut events = registry.subscribe();
    let id = registry
        .start_match(&corners(vec![human("alice"), human("bob")], 60_000, RuleSet::default()))
        .await
        .unwrap();
    next_for(&mut events, id).await;

    // Out of turn: rejected, nothing broadcast.
    let err = registry.attempt_move(mv(id, "bob", (3, 3), (3, 0))).await.unwrap_err();
    assert!(matches!(err, EngineError::NotYourTurn { .. }));
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

    let moved = registry.attempt_move(mv(id, "alice", (0, 0), (3, 0))).await.unwrap();
    assert_eq!(moved.to, Coord::new(3, 0));
    let MatchEvent::Snapshot(view) = next_for(&mut events, id).await else {
        panic!("expected a snapshot");
    };
    assert_eq!(view.phase, SubPhase::AwaitingBurn);

    // Scenario A over the wire.
    let err = registry.attempt_burn(burn(id, "alice", (3, 3))).await.unwrap_err();
    assert!(matches!(err, EngineError::IllegalBurn { .. }));
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

    let burned = registry.attempt_burn(burn(id, "alice", (0, 0))).await.unwrap();
    assert!(!burned.finished);

    let view = registry.view(id).await.unwrap();
    assert_eq!(view.turn_seat, SeatId::new(1));
    assert_eq!(view.turn_number, 2);
    assert_eq!(registry.history(id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_leaving_hands_the_win_over_and_tears_down() {
    let registry = registry();
    let mut events = registry.subscribe();
    let id = registry
        .start_match(&corners(vec![human("alice"), human("bob")], 60_000, RuleSet::default()))
        .await
        .unwrap();

    registry.leave(id, "alice".into()).await.unwrap();

    let events = until_finished(&mut events, id).await;
    let Some(MatchEvent::Finished(finished)) = events.last() else {
        panic!("expected the match to finish");
    };
    assert_eq!(finished.winner_seat, Some(SeatId::new(1)));
    assert_eq!(finished.winner, Some("bob".into()));

    wait_removed(&registry, id).await;
    assert!(registry.is_empty().await);
}

// =============================================================================
// Turn timer
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_timeout_forfeits_by_default() {
    let registry = registry();
    let mut events = registry.subscribe();
    let id = registry
        .start_match(&corners(vec![human("alice"), human("bob")], 1_000, RuleSet::default()))
        .await
        .unwrap();

    // Half a turn, then silence.
    registry.attempt_move(mv(id, "alice", (0, 0), (2, 0))).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1_500)).await;

    let events = until_finished(&mut events, id).await;
    assert!(events.iter().any(|e| matches!(
        e,
        MatchEvent::TimedOut(t) if t.seat == SeatId::new(0) && t.action == TimeoutAction::ForfeitMatch
    )));
    let Some(MatchEvent::Finished(finished)) = events.last() else {
        panic!("expected the match to finish");
    };
    assert_eq!(finished.winner_seat, Some(SeatId::new(1)));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_skip_passes_the_turn() {
    let registry = registry();
    let rules = RuleSet::default().with_timeout(TimeoutPolicyKind::SkipTurn);
    let id = registry
        .start_match(&corners(vec![human("alice"), human("bob")], 1_000, rules))
        .await
        .unwrap();
    let start = registry.view(id).await.unwrap();

    registry.attempt_move(mv(id, "alice", (0, 0), (2, 0))).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1_500)).await;

    let view = registry.view(id).await.unwrap();
    assert_eq!(view.status, MatchStatus::Active);
    assert_eq!(view.turn_seat, SeatId::new(1));
    assert_eq!(view.phase, SubPhase::AwaitingMove);
    assert_eq!(view.tiles, start.tiles);

    // Bob's budget started when the skip happened.
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(registry.view(id).await.unwrap().turn_seat, SeatId::new(1));
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(registry.view(id).await.unwrap().turn_seat, SeatId::new(0));
}

#[tokio::test(start_paused = true)]
async fn test_subphase_scope_rearms_on_move() {
    let registry = registry();
    let mut events = registry.subscribe();
    let rules = RuleSet::default().with_timer_scope(TimerScope::SubPhase);
    let id = registry
        .start_match(&corners(vec![human("alice"), human("bob")], 1_000, rules))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(800)).await;
    registry.attempt_move(mv(id, "alice", (0, 0), (2, 0))).await.unwrap();

    // Past the original deadline, inside the re-armed one.
    tokio::time::sleep(Duration::from_millis(500)).await;
    let view = registry.view(id).await.unwrap();
    assert_eq!(view.status, MatchStatus::Active);
    assert_eq!(view.phase, SubPhase::AwaitingBurn);

    tokio::time::sleep(Duration::from_millis(600)).await;
    let events = until_finished(&mut events, id).await;
    assert!(matches!(events.last(), Some(MatchEvent::Finished(_))));
}

// =============================================================================
// Automated seats
// =============================================================================

#[tokio::test]
async fn test_bot_answers_a_human_turn() {
    let registry = registry();
    let mut events = registry.subscribe();
    let id = registry
        .start_match(&six_by_six(vec![human("alice"), bot()]))
        .await
        .unwrap();

    registry.attempt_move(mv(id, "alice", (0, 2), (1, 2))).await.unwrap();
    registry.attempt_burn(burn(id, "alice", (1, 1))).await.unwrap();

    let reply = tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            if let MatchEvent::Snapshot(view) = next_for(&mut events, id).await {
                if view.turn_number == 3 {
                    return view;
                }
            }
        }
    })
    .await
    .unwrap();

    assert_eq!(reply.turn_seat, SeatId::new(0));
    assert_eq!(reply.phase, SubPhase::AwaitingMove);
    assert_eq!(reply.tiles.burned().count(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_bot_matches_run_side_by_side() {
    let registry = registry();
    let mut events = registry.subscribe();

    let mut ids = Vec::new();
    for _ in 0..4 {
        ids.push(registry.start_match(&six_by_six(vec![bot(), bot()])).await.unwrap());
    }

    let finished = tokio::time::timeout(Duration::from_secs(60), async {
        let mut finished = Vec::new();
        let mut burned = std::collections::HashMap::new();
        while finished.len() < ids.len() {
            match events.recv().await.unwrap() {
                MatchEvent::Snapshot(view) => {
                    // Burned tiles never disappear.
                    let count = view.tiles.burned().count();
                    let last = burned.insert(view.match_id, count).unwrap_or(0);
                    assert!(count >= last);
                }
                MatchEvent::Finished(done) => finished.push(done),
                MatchEvent::Quarantined { reason, .. } => panic!("quarantined: {reason}"),
                MatchEvent::TimedOut(_) => panic!("bots should never time out"),
            }
        }
        finished
    })
    .await
    .unwrap();

    assert!(finished.iter().all(|f| f.winner_seat.is_some()));
    for id in ids {
        wait_removed(&registry, id).await;
    }
    assert!(registry.is_empty().await);
}

#[tokio::test]
async fn test_random_bots_with_strict_origin_rule() {
    let config = EngineConfig::default()
        .with_ai(AiConfig::default().with_strategy(StrategyKind::Random));
    let registry = MatchRegistry::new(config, Arc::new(SequentialIds::new()));
    let mut events = registry.subscribe();

    let mut request = six_by_six(vec![bot(), bot()]);
    request.rules = RuleSet::default().with_origin_burn(false);
    let id = registry.start_match(&request).await.unwrap();

    let events = tokio::time::timeout(Duration::from_secs(30), until_finished(&mut events, id))
        .await
        .unwrap();
    assert!(!events
        .iter()
        .any(|e| matches!(e, MatchEvent::Quarantined { .. })));
}

// =============================================================================
// Quarantine
// =============================================================================

/// Always proposes a move off the board.
#[derive(Debug)]
struct OffBoard;

impl Strategy for OffBoard {
    fn choose(
        &self,
        _board: &Board,
        _seat: SeatId,
        _validator: &MoveValidator,
        _limits: SearchLimits<'_>,
        _rng: &mut GameRng,
        _stats: &mut SearchStats,
    ) -> Option<TurnAction> {
        Some(TurnAction::new(Coord::new(0, 0), Coord::new(9, 9), Coord::new(5, 5)))
    }
}

/// Start a bot-first match whose bot can only cheat, and wait for the halt.
async fn halted_match(registry: &MatchRegistry, events: &mut Receiver<MatchEvent>) -> MatchId {
    let id = registry
        .start_match(&corners(vec![bot(), human("bob")], 60_000, RuleSet::default()))
        .await
        .unwrap();

    assert!(matches!(next_for(events, id).await, MatchEvent::Snapshot(_)));
    let MatchEvent::Quarantined { reason, .. } = next_for(events, id).await else {
        panic!("expected the match to be quarantined");
    };
    assert!(reason.contains("Seat 0"));
    id
}

#[tokio::test]
async fn test_illegal_automated_turn_quarantines_the_match() {
    let registry = registry().with_strategy(Arc::new(OffBoard));
    let mut events = registry.subscribe();
    let id = halted_match(&registry, &mut events).await;

    // Later requests are refused as halted, not judged on their merits.
    assert_eq!(
        registry.attempt_move(mv(id, "bob", (3, 3), (3, 0))).await,
        Err(EngineError::Quarantined(id))
    );
    assert_eq!(
        registry.attempt_burn(burn(id, "bob", (2, 2))).await,
        Err(EngineError::Quarantined(id))
    );

    // Nothing was applied or broadcast.
    let view = registry.view(id).await.unwrap();
    assert_eq!(view.status, MatchStatus::Active);
    assert_eq!(view.turn_number, 1);
    assert_eq!(view.tiles.burned().count(), 0);
    assert!(registry.history(id).await.unwrap().is_empty());
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    assert!(registry.contains(id).await);
}

#[tokio::test]
async fn test_leaving_a_quarantined_match_tears_it_down() {
    let registry = registry().with_strategy(Arc::new(OffBoard));
    let mut events = registry.subscribe();
    let id = halted_match(&registry, &mut events).await;

    assert_eq!(
        registry.leave(id, "mallory".into()).await,
        Err(EngineError::UnknownParticipant("mallory".into()))
    );
    registry.leave(id, "bob".into()).await.unwrap();

    wait_removed(&registry, id).await;
    assert!(registry.is_empty().await);
    assert_eq!(registry.view(id).await, Err(EngineError::UnknownMatch(id)));
}

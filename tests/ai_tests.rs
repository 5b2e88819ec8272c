//! Automated seat integration tests.

use std::time::{Duration, Instant};

use amazons_engine::ai::{AiConfig, AiPlayer, StrategyKind};
use amazons_engine::board::Board;
use amazons_engine::core::{
    MatchId, PieceConfig, PiecePlacement, RuleSet, SeatId, STANDARD_BOARD_SIZE,
};
use amazons_engine::game::{replay, Match, MatchStatus};
use amazons_engine::players::SeatAssignment;
use amazons_engine::rules::MoveValidator;

fn deadline() -> Instant {
    Instant::now() + Duration::from_secs(5)
}

fn six_by_six() -> PieceConfig {
    PieceConfig::new(vec![
        PiecePlacement::new(0, 2, 0),
        PiecePlacement::new(5, 3, 0),
        PiecePlacement::new(2, 0, 1),
        PiecePlacement::new(3, 5, 1),
    ])
}

/// Play a bot-vs-bot match to the end through the turn engine.
fn play_out(rules: RuleSet, config: AiConfig) -> Match {
    let validator = MoveValidator::new(rules);
    let mut game = Match::new(MatchId::from_uuid(uuid::Uuid::from_u128(3)), rules);
    game.begin(
        vec![SeatAssignment::automated("bot-a"), SeatAssignment::automated("bot-b")],
        Board::new(6, &six_by_six()).unwrap(),
        Duration::from_secs(5),
    )
    .unwrap();

    let mut bots = [
        AiPlayer::new(validator, config.clone().with_seed(1)),
        AiPlayer::new(validator, config.with_seed(2)),
    ];

    while game.status() == MatchStatus::Active {
        let seat = game.turn();
        let turn = bots[seat.index()]
            .choose_action(game.board(), seat, deadline())
            .unwrap();

        // Each half must pass the match's own checks.
        game.attempt_move(seat, turn.from, turn.to).unwrap();
        game.attempt_burn(seat, turn.burn).unwrap();
    }
    game
}

// =============================================================================
// Legality
// =============================================================================

#[test]
fn test_mobility_bots_finish_a_game() {
    let game = play_out(RuleSet::default(), AiConfig::default().with_max_candidates(24));

    assert_eq!(game.status(), MatchStatus::Finished);
    let loser = game.turn();
    assert!(!MoveValidator::default().has_any_legal_move(game.board(), loser));
    assert_ne!(game.winner(), Some(loser));
}

#[test]
fn test_random_bots_finish_a_game() {
    let game = play_out(
        RuleSet::default(),
        AiConfig::default().with_strategy(StrategyKind::Random),
    );
    assert_eq!(game.status(), MatchStatus::Finished);
}

#[test]
fn test_bots_respect_forbidden_origin_burn() {
    let rules = RuleSet::default().with_origin_burn(false);
    let game = play_out(rules, AiConfig::default().with_strategy(StrategyKind::Random));

    assert_eq!(game.status(), MatchStatus::Finished);
    let replayed = replay(6, &six_by_six(), game.history()).unwrap();
    assert_eq!(replayed.snapshot(), game.snapshot());
}

#[test]
fn test_standard_opening_is_legal_for_both_seats() {
    let board = Board::new(STANDARD_BOARD_SIZE, &PieceConfig::standard()).unwrap();
    let validator = MoveValidator::default();

    for seat in [SeatId::new(0), SeatId::new(1)] {
        let mut ai = AiPlayer::new(validator, AiConfig::default());
        let turn = ai.choose_action(&board, seat, deadline()).unwrap();

        assert!(validator.is_legal_move(&board, seat, turn.from, turn.to));
        let mut after = board.clone();
        after.apply_move(turn.from, turn.to).unwrap();
        assert!(validator.is_legal_burn(&after, seat, turn.to, turn.burn));
    }
}

// =============================================================================
// Defects
// =============================================================================

#[test]
fn test_stuck_seat_is_an_internal_error() {
    let pieces = PieceConfig::new(vec![
        PiecePlacement::new(0, 0, 0),
        PiecePlacement::new(1, 0, 1),
        PiecePlacement::new(0, 1, 1),
        PiecePlacement::new(1, 1, 1),
    ]);
    let board = Board::new(3, &pieces).unwrap();
    let mut ai = AiPlayer::new(MoveValidator::default(), AiConfig::default());

    let err = ai.choose_action(&board, SeatId::new(0), deadline()).unwrap_err();
    assert!(err.is_internal());
}

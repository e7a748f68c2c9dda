//! Tests for the game state machine.

use serde_json::json;
use strictly_quoridor::{
    Action, ActionError, ActionOutcome, AiConfig, ErrorCategory, GameMode, GameState, GameStatus,
    Orientation, Pathfinder, PlayerId, SimpleAi, action_report,
};

/// A game restored from a snapshot with pawns at the given cells.
fn game_with_pawns(p1: (i32, i32), p2: (i32, i32), current_turn: u8) -> GameState {
    GameState::from_value(json!({
        "game_id": "fixture",
        "status": "in_progress",
        "game_mode": "local_2p",
        "current_turn": current_turn,
        "turn_count": 0,
        "players": {
            "player1": {"name": "A", "position": {"row": p1.0, "col": p1.1}, "walls_remaining": 10, "goal_row": 0},
            "player2": {"name": "B", "position": {"row": p2.0, "col": p2.1}, "walls_remaining": 10, "goal_row": 8}
        },
        "walls": [],
        "winner": null,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    }))
    .unwrap()
}

fn observable(game: &GameState) -> (PlayerId, u32, (i32, i32), (i32, i32), usize) {
    (
        game.current_turn(),
        game.turn_count(),
        game.player1().position().to_tuple(),
        game.player2().position().to_tuple(),
        game.wall_manager().len(),
    )
}

#[test]
fn test_fresh_game_single_step() {
    let mut game = GameState::new(None, "A", "B", GameMode::VsAi);
    assert_eq!(game.player1().position().to_tuple(), (8, 4));

    let result = game.move_pawn(7, 4);
    assert_eq!(action_report(&result), (true, "Pawn moved successfully".to_string()));
    assert_eq!(game.player1().position().to_tuple(), (7, 4));
    assert_eq!(game.current_turn(), PlayerId::Two);
    assert_eq!(game.turn_count(), 1);
}

#[test]
fn test_fresh_game_two_cell_move_fails() {
    let mut game = GameState::new(None, "A", "B", GameMode::VsAi);
    let result = game.move_pawn(6, 4);
    assert_eq!(result, Err(ActionError::InvalidMove));
    assert_eq!(action_report(&result), (false, "Invalid move".to_string()));
    assert_eq!(game.player1().position().to_tuple(), (8, 4));
    assert_eq!(game.turn_count(), 0);
}

#[test]
fn test_reaching_goal_wins_and_freezes_game() {
    let mut game = game_with_pawns((1, 4), (6, 6), 1);

    let result = game.move_pawn(0, 4);
    assert_eq!(result, Ok(ActionOutcome::Won(PlayerId::One)));
    assert_eq!(action_report(&result).1, "Player 1 wins!");
    assert_eq!(game.status(), GameStatus::Player1Win);
    assert_eq!(game.winner(), Some(PlayerId::One));
    assert_eq!(game.current_turn(), PlayerId::One);

    let frozen = observable(&game);
    for attempt in [
        game.move_pawn(0, 3),
        game.move_pawn(1, 4),
        game.place_wall(4, 4, "horizontal"),
        game.apply(Action::Wall {
            row: 2,
            col: 2,
            orientation: Orientation::Vertical,
        }),
    ] {
        let err = attempt.unwrap_err();
        assert_eq!(err, ActionError::GameFinished);
        assert_eq!(err.category(), ErrorCategory::Terminal);
        assert!(err.to_string().contains("finished"));
    }
    assert_eq!(observable(&game), frozen);
}

#[test]
fn test_player_two_wins_on_row_eight() {
    let mut game = game_with_pawns((4, 0), (7, 8), 2);
    assert_eq!(game.move_pawn(8, 8), Ok(ActionOutcome::Won(PlayerId::Two)));
    assert_eq!(game.status(), GameStatus::Player2Win);
}

#[test]
fn test_rejected_actions_leave_state_unchanged() {
    let mut game = GameState::new(None, "A", "B", GameMode::Local2p);
    game.move_pawn(7, 4).unwrap();
    game.place_wall(4, 4, "horizontal").unwrap();
    let before = observable(&game);
    let p1_walls = game.player1().walls_remaining();
    let p2_walls = game.player2().walls_remaining();

    let rejected = [
        game.move_pawn(5, 4),
        game.move_pawn(-1, 4),
        game.move_pawn(7, 4),
        game.place_wall(4, 4, "horizontal"),
        game.place_wall(4, 4, "vertical"),
        game.place_wall(4, 5, "horizontal"),
        game.place_wall(0, 8, "vertical"),
        game.place_wall(3, 3, "upright"),
    ];
    assert!(rejected.iter().all(Result::is_err));

    assert_eq!(observable(&game), before);
    assert_eq!(game.player1().walls_remaining(), p1_walls);
    assert_eq!(game.player2().walls_remaining(), p2_walls);
}

#[test]
fn test_accepted_walls_never_seal_a_player() {
    let config = AiConfig::default().with_probabilities(0.0, 1.0).unwrap();
    for seed in 0..8 {
        let mut game = GameState::new(None, "A", "B", GameMode::Local2p);
        let mut ai = SimpleAi::with_seed(config, seed);
        for _ in 0..60 {
            let Some(action) = ai.choose_action(&game) else {
                break;
            };
            game.apply(action).unwrap();
            if !action.is_move() {
                for player in [game.player1(), game.player2()] {
                    assert!(Pathfinder::has_path_to_goal(
                        player.position(),
                        player.goal_row(),
                        game.wall_manager()
                    ));
                }
            }
        }
    }
}

#[test]
fn test_every_wall_offered_is_accepted() {
    let mut game = GameState::new(None, "A", "B", GameMode::Local2p);
    game.place_wall(7, 3, "horizontal").unwrap();
    game.place_wall(0, 3, "horizontal").unwrap();
    for wall in game.valid_wall_placements() {
        let mut trial = game.clone();
        assert_eq!(trial.apply(Action::place(wall)), Ok(ActionOutcome::WallPlaced), "{}", wall);
    }
}

#[test]
fn test_abandoned_game_rejects_actions() {
    let mut game = GameState::new(None, "A", "B", GameMode::VsAi);
    game.abandon().unwrap();
    assert_eq!(game.status(), GameStatus::Abandoned);
    assert_eq!(game.winner(), None);
    assert_eq!(game.move_pawn(7, 4), Err(ActionError::GameAbandoned));
    assert_eq!(game.place_wall(0, 0, "vertical"), Err(ActionError::GameAbandoned));
}

#[test]
fn test_copy_supports_lookahead() {
    let game = GameState::new(None, "A", "B", GameMode::VsAi);
    let mut lookahead = game.clone();
    lookahead.place_wall(6, 4, "horizontal").unwrap();
    assert_eq!(lookahead.distance_to_goal(PlayerId::One), Some(9));
    assert_eq!(game.distance_to_goal(PlayerId::One), Some(8));
    assert!(game.wall_manager().is_empty());
    assert_eq!(game.current_turn(), PlayerId::One);
}

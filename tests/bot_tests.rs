// Integration tests for the Bot endpoints
//
// These drive the same methods the Rocket handlers call, so the JSON shapes
// checked here are what the game server receives.

use serde_json::json;
use strangler_snake::bot::Bot;
use strangler_snake::config::Config;
use strangler_snake::error::EngineError;
use strangler_snake::types::{Battlesnake, Board, Coord, Game};

fn game() -> Game {
    Game {
        id: "test-game".to_string(),
        ruleset: json!({"name": "standard"}),
        timeout: 500,
        source: "test".to_string(),
    }
}

fn corner_board() -> Board {
    // Head in the top-left corner, neck to the right: only "down" is open
    Board {
        height: 11,
        width: 11,
        food: vec![],
        snakes: vec![Battlesnake {
            id: "our-snake".to_string(),
            name: "Strangler".to_string(),
            health: 70,
            body: vec![Coord::new(0, 10), Coord::new(1, 10), Coord::new(2, 10)],
            head: Coord::new(0, 10),
            length: 3,
            latency: "0".to_string(),
            shout: None,
        }],
        hazards: vec![],
    }
}

#[test]
fn test_info_reports_appearance() {
    let bot = Bot::new(Config::default_hardcoded());
    let info = bot.info();

    assert_eq!(info["apiversion"], "1");
    assert_eq!(info["author"], bot.config().appearance.author.as_str());
    assert_eq!(info["color"], bot.config().appearance.color.as_str());
    assert!(info["version"].is_string());
}

#[tokio::test]
async fn test_get_move_returns_move_and_shout() {
    let bot = Bot::new(Config::default_hardcoded());
    let board = corner_board();
    let you = board.snakes[0].clone();

    let response = bot.get_move(&game(), &3, &board, &you).await.unwrap();

    assert_eq!(response["move"], "down");
    assert!(response["shout"].is_string());
}

#[tokio::test]
async fn test_get_move_rejects_unknown_snake() {
    let bot = Bot::new(Config::default_hardcoded());
    let board = corner_board();
    let mut you = board.snakes[0].clone();
    you.id = "ghost".to_string();

    let err = bot.get_move(&game(), &3, &board, &you).await.unwrap_err();
    assert_eq!(err, EngineError::MissingSnake("ghost".to_string()));
}

#[tokio::test]
async fn test_get_move_rejects_empty_body() {
    let bot = Bot::new(Config::default_hardcoded());
    let mut board = corner_board();
    board.snakes[0].body.clear();
    let you = board.snakes[0].clone();

    let err = bot.get_move(&game(), &0, &board, &you).await.unwrap_err();
    assert_eq!(err, EngineError::EmptyBody("our-snake".to_string()));
}

#[test]
fn test_game_state_parses_server_payload() {
    // Fields the engine does not read may be missing
    let payload = json!({
        "game": {"id": "g1"},
        "turn": 12,
        "board": {
            "height": 7,
            "width": 7,
            "snakes": [{
                "id": "s1",
                "health": 90,
                "body": [{"x": 1, "y": 1}, {"x": 1, "y": 0}],
                "head": {"x": 1, "y": 1},
                "length": 2
            }]
        },
        "you": {
            "id": "s1",
            "health": 90,
            "body": [{"x": 1, "y": 1}, {"x": 1, "y": 0}],
            "head": {"x": 1, "y": 1},
            "length": 2
        }
    });

    let state: strangler_snake::types::GameState = serde_json::from_value(payload).unwrap();
    assert_eq!(state.turn, 12);
    assert!(state.board.food.is_empty());
    assert!(state.board.hazards.is_empty());
    assert_eq!(state.you.shout, None);
}

//! Integration tests for tictac-server API

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tictac_core::{GameConfig, Mode};
use tictac_server::{create_router, ServerConfig, ServerState};
use tower::ServiceExt;

fn test_app_with(game: GameConfig) -> Router {
    let config = ServerConfig {
        game: game.clone(),
        ..ServerConfig::default()
    };
    let state = Arc::new(ServerState::new(game));
    create_router(&config, state)
}

fn test_app() -> Router {
    test_app_with(GameConfig::default())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

async fn create_game(app: &Router, mode: &str) -> u64 {
    let (status, json) = send(app, "POST", "/api/games", Some(json!({ "mode": mode }))).await;
    assert_eq!(status, StatusCode::OK);
    json["id"].as_u64().unwrap()
}

#[tokio::test]
async fn test_status_endpoint() {
    let app = test_app();
    let (status, json) = send(&app, "GET", "/api/status", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["engine"], "alpha-beta");
    assert_eq!(json["sessions"], 0);
}

#[tokio::test]
async fn test_create_game_defaults_to_configured_mode() {
    let app = test_app_with(GameConfig::default().with_mode(Mode::PlayerVsPlayer));
    let (status, json) = send(&app, "POST", "/api/games", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["mode"], "pvp");
    assert_eq!(json["current_player"], "x");
    assert_eq!(json["result"], "ongoing");
    assert_eq!(json["game_over"], false);
    assert_eq!(json["board"][1][1], "empty");
    assert_eq!(json["status"], "Player X's turn");
}

#[tokio::test]
async fn test_move_against_ai() {
    let app = test_app();
    let id = create_game(&app, "pvai").await;

    let (status, json) = send(
        &app,
        "POST",
        &format!("/api/games/{}/move", id),
        Some(json!({ "row": 0, "col": 0 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["placed"], json!({ "row": 0, "col": 0 }));
    assert_eq!(json["board"][0][0], "x");
    // The only non-losing answer to a corner is the center
    assert_eq!(json["ai_move"], json!({ "row": 1, "col": 1 }));
    assert_eq!(json["board"][1][1], "o");
    assert_eq!(json["current_player"], "x");
}

#[tokio::test]
async fn test_move_by_canvas_point() {
    let app = test_app();
    let id = create_game(&app, "pvp").await;

    let (status, json) = send(
        &app,
        "POST",
        &format!("/api/games/{}/move", id),
        Some(json!({ "x": 400.0, "y": 200.0 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["placed"], json!({ "row": 1, "col": 2 }));
    assert_eq!(json["ai_move"], Value::Null);
    assert_eq!(json["current_player"], "o");

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/games/{}/move", id),
        Some(json!({ "x": 500.0, "y": 10.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_illegal_moves() {
    let app = test_app();
    let id = create_game(&app, "pvp").await;
    let uri = format!("/api/games/{}/move", id);

    let (status, _) = send(&app, "POST", &uri, Some(json!({ "row": 1, "col": 1 }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(&app, "POST", &uri, Some(json!({ "row": 1, "col": 1 }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("occupied"));

    let (status, _) = send(&app, "POST", &uri, Some(json!({ "row": 3, "col": 0 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_session() {
    let app = test_app();
    let (status, json) = send(&app, "GET", "/api/games/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_mode_toggle_resets() {
    let app = test_app();
    let id = create_game(&app, "pvp").await;

    send(
        &app,
        "POST",
        &format!("/api/games/{}/move", id),
        Some(json!({ "row": 2, "col": 2 })),
    )
    .await;

    let (status, json) = send(&app, "POST", &format!("/api/games/{}/mode", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["mode"], "pvai");
    assert_eq!(json["board"][2][2], "empty");
    assert_eq!(json["generation"], 1);

    let (_, json) = send(
        &app,
        "POST",
        &format!("/api/games/{}/mode", id),
        Some(json!({ "mode": "pvai" })),
    )
    .await;
    assert_eq!(json["mode"], "pvai");
    assert_eq!(json["generation"], 2);
}

#[tokio::test]
async fn test_finished_game_restarts_after_delay() {
    let game = GameConfig {
        mode: Mode::PlayerVsPlayer,
        restart_delay_ms: 50,
    };
    let app = test_app_with(game);
    let id = create_game(&app, "pvp").await;
    let uri = format!("/api/games/{}/move", id);

    let mut last = Value::Null;
    for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)] {
        let (status, json) = send(&app, "POST", &uri, Some(json!({ "row": row, "col": col }))).await;
        assert_eq!(status, StatusCode::OK);
        last = json;
    }
    assert_eq!(last["game_over"], true);
    assert_eq!(last["result"], json!({ "won": "x" }));
    assert_eq!(last["status"], "Player X Wins!");

    let (status, _) = send(&app, "POST", &uri, Some(json!({ "row": 2, "col": 2 }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    tokio::time::sleep(Duration::from_millis(300)).await;

    let (_, json) = send(&app, "GET", &format!("/api/games/{}", id), None).await;
    assert_eq!(json["game_over"], false);
    assert_eq!(json["generation"], 1);
    assert_eq!(json["board"][0][0], "empty");
}

#[tokio::test]
async fn test_manual_restart_cancels_pending_restart() {
    let game = GameConfig {
        mode: Mode::PlayerVsPlayer,
        restart_delay_ms: 200,
    };
    let app = test_app_with(game);
    let id = create_game(&app, "pvp").await;
    let uri = format!("/api/games/{}/move", id);

    for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)] {
        send(&app, "POST", &uri, Some(json!({ "row": row, "col": col }))).await;
    }

    // New game started by hand before the timer fires
    let (_, json) = send(&app, "POST", &format!("/api/games/{}/restart", id), None).await;
    assert_eq!(json["generation"], 1);
    let (status, _) = send(&app, "POST", &uri, Some(json!({ "row": 2, "col": 2 }))).await;
    assert_eq!(status, StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(400)).await;

    let (_, json) = send(&app, "GET", &format!("/api/games/{}", id), None).await;
    assert_eq!(json["board"][2][2], "x");
    assert_eq!(json["generation"], 1);
    assert_eq!(json["current_player"], "o");
}

#[tokio::test]
async fn test_manual_restart() {
    let app = test_app();
    let id = create_game(&app, "pvai").await;
    send(
        &app,
        "POST",
        &format!("/api/games/{}/move", id),
        Some(json!({ "row": 0, "col": 0 })),
    )
    .await;

    let (status, json) = send(&app, "POST", &format!("/api/games/{}/restart", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["board"][0][0], "empty");
    assert_eq!(json["board"][1][1], "empty");
    assert_eq!(json["current_player"], "x");
}

#[tokio::test]
async fn test_analyze_endpoint() {
    let app = test_app();

    let (status, json) = send(
        &app,
        "POST",
        "/api/analyze",
        Some(json!({ "board": "oo./xx./x..", "player": "o" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["player"], "o");
    assert_eq!(json["score"], 9);
    assert_eq!(json["move"], json!({ "row": 0, "col": 2 }));
    assert!(json["nodes"].as_u64().unwrap() > 0);

    let (status, json) = send(&app, "POST", "/api/analyze", Some(json!({ "board": "xx" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("cells"));
}

#[tokio::test]
async fn test_invalid_mode_body_is_rejected() {
    let app = test_app();
    let id = create_game(&app, "pvai").await;

    let (status, json) = send(
        &app,
        "POST",
        &format!("/api/games/{}/mode", id),
        Some(json!({ "mode": "solo" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());

    // Session untouched
    let (_, json) = send(&app, "GET", &format!("/api/games/{}", id), None).await;
    assert_eq!(json["mode"], "pvai");
    assert_eq!(json["generation"], 0);

    let (status, json) = send(&app, "POST", "/api/games", Some(json!({ "mode": "bogus" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());

    let (_, json) = send(&app, "GET", "/api/status", None).await;
    assert_eq!(json["sessions"], 1);
}

#[tokio::test]
async fn test_malformed_move_body_is_rejected() {
    let app = test_app();
    let id = create_game(&app, "pvp").await;

    let (status, json) = send(
        &app,
        "POST",
        &format!("/api/games/{}/move", id),
        Some(json!({ "square": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_delete_game() {
    let app = test_app();
    let id = create_game(&app, "pvp").await;
    let uri = format!("/api/games/{}", id);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, json) = send(&app, "GET", "/api/status", None).await;
    assert_eq!(json["sessions"], 0);
}

#[tokio::test]
async fn test_session_count_is_capped() {
    let config = ServerConfig {
        max_sessions: 3,
        ..ServerConfig::default()
    };
    let state = Arc::new(ServerState::with_capacity(config.game.clone(), config.max_sessions));
    let app = create_router(&config, state);

    let mut ids = Vec::new();
    for _ in 0..10 {
        ids.push(create_game(&app, "pvp").await);
    }

    let (_, json) = send(&app, "GET", "/api/status", None).await;
    assert_eq!(json["sessions"], 3);

    // The oldest sessions were dropped, the newest survive
    let (status, _) = send(&app, "GET", &format!("/api/games/{}", ids[0]), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", &format!("/api/games/{}", ids[9]), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_engine_holds_in_api_games() {
    let app = test_app();

    for opening in [(0, 0), (0, 1), (1, 1), (2, 2)] {
        let id = create_game(&app, "pvai").await;
        let uri = format!("/api/games/{}/move", id);

        let mut next = Some(opening);
        let mut last = Value::Null;
        while let Some((row, col)) = next {
            let (status, json) = send(&app, "POST", &uri, Some(json!({ "row": row, "col": col }))).await;
            assert_eq!(status, StatusCode::OK);
            next = None;
            if json["game_over"] == false {
                assert_eq!(json["current_player"], "x");
                let board = json["board"].as_array().unwrap();
                'scan: for (r, cells) in board.iter().enumerate() {
                    for (c, cell) in cells.as_array().unwrap().iter().enumerate() {
                        if *cell == "empty" {
                            next = Some((r, c));
                            break 'scan;
                        }
                    }
                }
            }
            last = json;
        }

        assert_eq!(last["game_over"], true);
        assert_ne!(last["result"], json!({ "won": "x" }));
    }
}

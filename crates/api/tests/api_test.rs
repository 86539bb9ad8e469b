//! End-to-end tests of the HTTP API against an in-memory database.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION},
};
use http_body_util::BodyExt;
use rstest::rstest;
use pokerledger_api::{AppState, create_router};
use pokerledger_db::Migrator;
use pokerledger_db::migration::MigratorTrait;
use pokerledger_shared::config::CorsConfig;
use pokerledger_shared::{JwtConfig, JwtService};
use sea_orm::{ConnectOptions, Database};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn test_app() -> Router {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to connect to in-memory database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");

    let jwt_service = JwtService::new(JwtConfig {
        secret: "test-secret-key-for-testing".to_string(),
        access_token_expires_minutes: 30,
    });

    create_router(AppState::new(db, jwt_service), &CorsConfig::default())
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Registers a user and returns a bearer token for it.
async fn register_and_login(app: &Router, username: &str) -> String {
    let (status, _) = send(
        app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({
            "email": format!("{username}@example.com"),
            "username": username,
            "password": "pocket-aces-99",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": username, "password": "pocket-aces-99" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_string()
}

async fn create_session(app: &Router, token: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/game-sessions",
        Some(token),
        Some(json!({
            "title": "Friday Night",
            "game_date": "2026-10-16T20:00:00Z",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn add_player(
    app: &Router,
    token: &str,
    session_id: &str,
    player: Value,
) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        &format!("/api/v1/game-sessions/{session_id}/players"),
        Some(token),
        Some(player),
    )
    .await
}

fn transfers(body: &Value) -> Vec<(String, String, String)> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|t| {
            (
                t["from_player"].as_str().unwrap().to_string(),
                t["to_player"].as_str().unwrap().to_string(),
                t["amount"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_health() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_register_login_and_me() {
    let app = test_app().await;
    let token = register_and_login(&app, "dealer").await;

    let (status, body) = send(&app, "GET", "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "dealer");
    assert_eq!(body["email"], "dealer@example.com");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_login_by_email() {
    let app = test_app().await;
    register_and_login(&app, "button").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": "button@example.com", "password": "pocket-aces-99" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = test_app().await;
    register_and_login(&app, "river").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({
            "email": "river@example.com",
            "username": "river2",
            "password": "pocket-aces-99",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "EMAIL_EXISTS");
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app = test_app().await;
    register_and_login(&app, "flop").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": "flop", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/api/v1/game-sessions", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "MISSING_TOKEN");

    let (status, body) = send(&app, "GET", "/api/v1/game-sessions", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_multi_way_settlement_flow() {
    let app = test_app().await;
    let token = register_and_login(&app, "host").await;
    let session_id = create_session(&app, &token).await;

    for player in [
        json!({ "name": "A", "pnl": "70" }),
        json!({ "name": "B", "buy_in": "20", "cash_out": "50" }),
        json!({ "name": "C", "buy_in": "40", "cash_out": "0" }),
        json!({ "name": "D", "pnl": "-60" }),
    ] {
        let (status, _) = add_player(&app, &token, &session_id, player).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/game-sessions/{session_id}/calculate-settlements"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let expected = vec![
        ("D".to_string(), "A".to_string(), "60.00".to_string()),
        ("C".to_string(), "A".to_string(), "10.00".to_string()),
        ("C".to_string(), "B".to_string(), "30.00".to_string()),
    ];
    assert_eq!(transfers(&body), expected);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/game-sessions/{session_id}/settlements"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(transfers(&body), expected);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/game-sessions/{session_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_settled"], true);
    assert_eq!(body["players"].as_array().unwrap().len(), 4);
    assert_eq!(body["players"][0]["entry_mode"], "pnl");
    assert_eq!(body["players"][1]["entry_mode"], "buyin-cashout");
    assert_eq!(body["players"][3]["net_result"], "-60.00");
    assert_eq!(body["settlements"].as_array().unwrap().len(), 3);

    let (status, body) = send(&app, "GET", "/api/v1/game-sessions", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["id"], session_id.as_str());
}

#[tokio::test]
async fn test_unbalanced_session_is_unprocessable() {
    let app = test_app().await;
    let token = register_and_login(&app, "short").await;
    let session_id = create_session(&app, &token).await;

    for player in [
        json!({ "name": "A", "buy_in": "100", "cash_out": "150" }),
        json!({ "name": "B", "buy_in": "100", "cash_out": "40" }),
    ] {
        add_player(&app, &token, &session_id, player).await;
    }

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/game-sessions/{session_id}/calculate-settlements"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "UNBALANCED_LEDGER");
}

#[rstest]
#[case::sub_cent_buy_in(json!({ "name": "A", "buy_in": "10.005" }), "INVALID_AMOUNT")]
#[case::sub_cent_pnl(json!({ "name": "A", "pnl": "-0.333" }), "INVALID_AMOUNT")]
#[case::negative_buy_in(json!({ "name": "A", "buy_in": "-5" }), "INVALID_AMOUNT")]
#[case::too_large(json!({ "name": "A", "cash_out": "1000000000000" }), "INVALID_AMOUNT")]
#[case::empty_name(json!({ "name": "" }), "VALIDATION_ERROR")]
#[tokio::test]
async fn test_bad_player_payload_is_rejected(
    #[case] player: Value,
    #[case] expected_code: &str,
) {
    let app = test_app().await;
    let token = register_and_login(&app, "chips").await;
    let session_id = create_session(&app, &token).await;

    let (status, body) = add_player(&app, &token, &session_id, player).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], expected_code);
}

#[rstest]
#[case::get("GET", "")]
#[case::delete("DELETE", "")]
#[case::settle("POST", "/calculate-settlements")]
#[case::list_settlements("GET", "/settlements")]
#[tokio::test]
async fn test_foreign_session_routes_are_forbidden(#[case] method: &str, #[case] suffix: &str) {
    let app = test_app().await;
    let owner = register_and_login(&app, "owner").await;
    let intruder = register_and_login(&app, "intruder").await;
    let session_id = create_session(&app, &owner).await;

    let uri = format!("/api/v1/game-sessions/{session_id}{suffix}");
    let (status, body) = send(&app, method, &uri, Some(&intruder), None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_foreign_session_is_forbidden() {
    let app = test_app().await;
    let owner = register_and_login(&app, "owner").await;
    let intruder = register_and_login(&app, "intruder").await;
    let session_id = create_session(&app, &owner).await;

    let uri = format!("/api/v1/game-sessions/{session_id}");
    let (status, body) = send(&app, "GET", &uri, Some(&intruder), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");

    let (status, _) = send(&app, "DELETE", &uri, Some(&intruder), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_missing_session_is_not_found() {
    let app = test_app().await;
    let token = register_and_login(&app, "ghost").await;

    let (status, body) = send(
        &app,
        "GET",
        "/api/v1/game-sessions/0192f1a0-0000-7000-8000-000000000000",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "GAME_SESSION_NOT_FOUND");
}

#[tokio::test]
async fn test_player_update_delete_and_unique_names() {
    let app = test_app().await;
    let token = register_and_login(&app, "regular").await;
    let first = create_session(&app, &token).await;
    let second = create_session(&app, &token).await;

    let (_, alice) =
        add_player(&app, &token, &first, json!({ "name": "Alice", "pnl": "15" })).await;
    add_player(&app, &token, &first, json!({ "name": "Bob", "pnl": "-15" })).await;
    add_player(&app, &token, &second, json!({ "name": "Alice", "pnl": "0" })).await;

    let player_uri = format!("/api/v1/players/{}", alice["id"].as_str().unwrap());
    let (status, body) = send(
        &app,
        "PUT",
        &player_uri,
        Some(&token),
        Some(json!({ "buy_in": "10", "cash_out": "30", "entry_mode": "buyin-cashout" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["net_result"], "20.00");
    assert_eq!(body["entry_mode"], "buyin-cashout");

    let (status, body) =
        send(&app, "GET", "/api/v1/players/unique-names", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["Alice", "Bob"]));

    let (status, _) = send(&app, "DELETE", &player_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "DELETE", &player_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "PLAYER_NOT_FOUND");
}

#[tokio::test]
async fn test_delete_session() {
    let app = test_app().await;
    let token = register_and_login(&app, "closer").await;
    let session_id = create_session(&app, &token).await;
    add_player(&app, &token, &session_id, json!({ "name": "A", "pnl": "0" })).await;

    let uri = format!("/api/v1/game-sessions/{session_id}");
    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

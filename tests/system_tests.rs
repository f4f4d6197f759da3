//! Integration tests for health probes, the metrics scrape, request limits
//! and the unauthenticated squad sheet.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use teamsheet::config::Config;
use tower::ServiceExt;

async fn spawn_app_with(config_fn: impl FnOnce(&mut Config)) -> Router {
    let db_path =
        std::env::temp_dir().join(format!("teamsheet-system-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.security.jwt_secret = "integration-test-secret".to_string();
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config_fn(&mut config);

    let state = teamsheet::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");

    teamsheet::api::router(state)
}

async fn spawn_app() -> Router {
    spawn_app_with(|_| {}).await
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_health_live() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/system/health/live", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["success"].as_bool().unwrap_or(false));
    assert_eq!(body["data"]["status"], "alive");
}

#[tokio::test]
async fn test_health_ready() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/system/health/ready", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["ready"], true);
    assert_eq!(body["data"]["checks"]["database"], true);
}

#[tokio::test]
async fn test_metrics_require_manager() {
    let app = spawn_app().await;

    let (status, _) = send(&app, "GET", "/api/metrics", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, body) = send(
        &app,
        "POST",
        "/api/users/register",
        Some(json!({"name": "P", "email": "p@example.com", "password": "pw"})),
    )
    .await;
    let token = body["data"]["token"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/metrics")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The request logger labels metrics with the caller carried on the response
    let caller = response
        .extensions()
        .get::<teamsheet::services::AuthUser>()
        .expect("caller should be attached to the response");
    assert_eq!(caller.role.as_str(), "player");
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let app = spawn_app_with(|config| config.server.max_body_bytes = 1024).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/users/register",
        Some(json!({
            "name": "Big",
            "email": "big@example.com",
            "password": "x".repeat(4096),
        })),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/health/live")
                .header("Origin", "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_roster_crud() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "GET", "/players", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, body) = send(
        &app,
        "POST",
        "/players",
        Some(json!({"name": "Dara", "position": "Goalkeeper"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/players/{id}"),
        Some(json!({"name": "Dara", "position": "Full forward"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["position"], "Full forward");

    let (status, body) = send(&app, "GET", &format!("/players/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Dara");

    let (status, _) = send(&app, "DELETE", &format!("/players/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", &format!("/players/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_roster_bad_input() {
    let app = spawn_app().await;

    let (status, _) = send(&app, "POST", "/players", Some(json!({"position": "Wing"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/players/123", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "PUT",
        "/players/123",
        Some(json!({"name": "Nobody"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// File: botwatch-core/tests/liveness_tests.rs

use axum::body::{to_bytes, Body};
use axum::http::header::ACCEPT;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use botwatch_core::liveness::{create_liveness_router, HealthStatus, LivenessState, LIVENESS_BODY};
use botwatch_core::test_utils::FakeSession;
use botwatch_core::SessionRegistry;

fn state() -> LivenessState {
    LivenessState::new(SessionRegistry::new(vec![
        FakeSession::online("up", &[]).into_dyn(),
        FakeSession::new("down").into_dyn(),
    ]))
}

async fn get(path: &str) -> (StatusCode, Vec<u8>) {
    send(create_liveness_router(state()), Request::builder().uri(path)).await
}

async fn get_json(app: Router, path: &str) -> (StatusCode, Vec<u8>) {
    send(app, Request::builder().uri(path).header(ACCEPT, "application/json")).await
}

async fn send(app: Router, request: axum::http::request::Builder) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_root_reports_running() {
    let (status, body) = get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, LIVENESS_BODY.as_bytes());
}

#[tokio::test]
async fn test_any_path_reports_running() {
    let (status, body) = get("/some/other/path").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), "Discord Monitor Bot is running!");
}

#[tokio::test]
async fn test_plain_health_check_gets_fixed_body() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, LIVENESS_BODY.as_bytes());
}

#[tokio::test]
async fn test_health_counts_ready_sessions() {
    let (status, body) = get_json(create_liveness_router(state()), "/health").await;
    assert_eq!(status, StatusCode::OK);

    let health: HealthStatus = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.sessions_total, 2);
    assert_eq!(health.sessions_ready, 1);
}

#[tokio::test]
async fn test_non_get_health_still_alive() {
    let request = Request::builder()
        .method("POST")
        .uri("/health")
        .header(ACCEPT, "application/json");
    let (status, body) = send(create_liveness_router(state()), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, LIVENESS_BODY.as_bytes());
}

#[tokio::test]
async fn test_health_sees_registry_published_after_start() {
    let state = LivenessState::new(SessionRegistry::default());
    let app = create_liveness_router(state.clone());

    state.publish(SessionRegistry::new(vec![FakeSession::online("late", &[]).into_dyn()]));

    let (_, body) = get_json(app, "/health").await;
    let health: HealthStatus = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.sessions_total, 1);
    assert_eq!(health.sessions_ready, 1);
}

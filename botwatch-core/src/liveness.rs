//! Liveness endpoint for hosting platforms that poll a port to decide whether
//! the process is alive.
//!
//! Any request gets `200` and a fixed plaintext body. The one exception is
//! `GET /health` sent with `Accept: application/json`, which reports uptime
//! and how many monitored sessions are ready.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::registry::SessionRegistry;
use crate::Error;

pub const LIVENESS_BODY: &str = "Discord Monitor Bot is running!";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub uptime_secs: u64,
    pub sessions_total: usize,
    pub sessions_ready: usize,
}

/// The server can be up before the sessions are; `publish` swaps in the
/// registry once startup has built it.
#[derive(Clone)]
pub struct LivenessState {
    pub start_time: Instant,
    registry: Arc<RwLock<SessionRegistry>>,
}

impl LivenessState {
    pub fn new(registry: SessionRegistry) -> Self {
        Self {
            start_time: Instant::now(),
            registry: Arc::new(RwLock::new(registry)),
        }
    }

    pub fn publish(&self, registry: SessionRegistry) {
        *self.registry.write() = registry;
    }
}

async fn alive_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, LIVENESS_BODY)
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.contains("application/json"))
}

async fn health_handler(State(state): State<LivenessState>, headers: HeaderMap) -> Response {
    if !wants_json(&headers) {
        return alive_handler().await.into_response();
    }

    let registry = state.registry.read().clone();
    let sessions_ready = registry
        .iter()
        .filter(|s| s.snapshot().connected)
        .count();

    (
        StatusCode::OK,
        Json(HealthStatus {
            status: "ok".to_string(),
            uptime_secs: state.start_time.elapsed().as_secs(),
            sessions_total: registry.len(),
            sessions_ready,
        }),
    )
        .into_response()
}

pub fn create_liveness_router(state: LivenessState) -> Router {
    Router::new()
        .route("/health", get(health_handler).fallback(alive_handler))
        .fallback(alive_handler)
        .with_state(state)
}

pub async fn start_liveness_server(state: LivenessState, port: u16) -> Result<(), Error> {
    let app = create_liveness_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Liveness server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

//! Health check endpoints

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

/// GET /health/live
pub async fn live() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
pub async fn ready(State(state): State<Arc<AppState>>) -> StatusCode {
    // Ready once the store is reachable; a missing location does not block
    // readiness because observation recording works without one
    let _ = state.store.count().await;
    StatusCode::OK
}

/// GET /health
pub async fn full(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        observations: state.store.count().await,
        analyzing: state.analysis.is_analyzing(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

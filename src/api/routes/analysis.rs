//! Analysis endpoints
//!
//! Correlations and insights are served from the latest published results.
//! If no run has completed yet, one is performed on demand so a fresh
//! install never serves uninitialized output.

use crate::analysis::AnalysisResults;
use crate::api::dto::{AnalyzeResponse, CorrelationDto, CorrelationsResponse, InsightsResponse};
use crate::api::state::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

async fn latest_or_run(state: &AppState) -> AnalysisResults {
    let latest = state.analysis.latest().await;
    if latest.completed_at.is_some() {
        latest
    } else {
        state.analysis.run().await
    }
}

/// POST /api/v1/analyze
///
/// Forces a fresh analysis run and returns its output.
pub async fn run(State(state): State<Arc<AppState>>) -> Json<AnalyzeResponse> {
    let results = state.analysis.run().await;
    Json(AnalyzeResponse {
        correlations: results.correlations.iter().map(CorrelationDto::from).collect(),
        insights: results.insights,
        observation_count: results.observation_count,
    })
}

/// GET /api/v1/correlations
pub async fn correlations(State(state): State<Arc<AppState>>) -> Json<CorrelationsResponse> {
    let results = latest_or_run(&state).await;
    Json(CorrelationsResponse {
        correlations: results.correlations.iter().map(CorrelationDto::from).collect(),
        observation_count: results.observation_count,
        analyzed_at: results.completed_at,
    })
}

/// GET /api/v1/insights
pub async fn insights(State(state): State<Arc<AppState>>) -> Json<InsightsResponse> {
    let results = latest_or_run(&state).await;
    Json(InsightsResponse {
        insights: results.insights,
        observation_count: results.observation_count,
        analyzed_at: results.completed_at,
    })
}

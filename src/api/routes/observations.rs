//! Observation endpoints
//!
//! CRUD over pain observations. Out-of-range pain levels are clamped into
//! 0-10 rather than rejected, matching the store's own behavior.

use crate::api::dto::{
    CreateObservationRequest, CreateObservationResponse, ObservationsResponse,
    UpdateObservationRequest,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::store::types::PainObservation;
use crate::store::ObservationEdit;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

/// POST /api/v1/observations
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateObservationRequest>,
) -> ApiResult<(StatusCode, Json<CreateObservationResponse>)> {
    let mut observation = PainObservation::new(request.pain_level);

    if let Some(timestamp) = request.timestamp {
        observation = observation.timestamp(timestamp);
    }
    if !request.body_regions.is_empty() {
        observation = observation.regions(&request.body_regions);
    }
    if let Some(note) = request.note {
        observation = observation.note(note);
    }
    if let Some(weather) = request.weather {
        observation = observation.weather(weather);
    }
    if let Some(health) = request.health {
        observation = observation.health(health);
    }

    let pain_level = observation.pain_level;
    let id = state.store.insert(observation).await?;

    tracing::info!(%id, pain_level, "Observation recorded");

    Ok((
        StatusCode::CREATED,
        Json(CreateObservationResponse { id, pain_level }),
    ))
}

/// GET /api/v1/observations
pub async fn list(State(state): State<Arc<AppState>>) -> Json<ObservationsResponse> {
    let observations = state.store.snapshot().await;
    let count = observations.len();
    Json(ObservationsResponse {
        observations,
        count,
    })
}

/// GET /api/v1/observations/:id
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PainObservation>> {
    state
        .store
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("observation {}", id)))
}

/// PUT /api/v1/observations/:id
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateObservationRequest>,
) -> ApiResult<Json<PainObservation>> {
    let edit = ObservationEdit {
        pain_level: request.pain_level,
        body_regions: request.body_regions,
        note: request.note.map(Some),
    };

    let updated = state.store.edit(id, edit).await?;
    Ok(Json(updated))
}

/// DELETE /api/v1/observations/:id
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.store.delete(id).await?;
    tracing::info!(%id, "Observation deleted");
    Ok(StatusCode::NO_CONTENT)
}

//! Location endpoints

use crate::api::dto::{LocationRequest, LocationResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

/// GET /api/v1/location
pub async fn get(State(state): State<Arc<AppState>>) -> ApiResult<Json<LocationResponse>> {
    let location = state.location.read().await.clone().ok_or_else(|| {
        ApiError::NotFound("no location configured".to_string())
    })?;

    Ok(Json(LocationResponse {
        name: location.name,
        latitude: location.latitude,
        longitude: location.longitude,
    }))
}

/// PUT /api/v1/location
///
/// Resolves the query through the geocoding provider and, on success,
/// replaces the configured location.
pub async fn set(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LocationRequest>,
) -> ApiResult<Json<LocationResponse>> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(ApiError::Validation("query must not be empty".to_string()));
    }

    let location = state.resolver.resolve(query).await?;

    tracing::info!(
        name = %location.name,
        latitude = location.latitude,
        longitude = location.longitude,
        "Location updated"
    );

    *state.location.write().await = Some(location.clone());

    Ok(Json(LocationResponse {
        name: location.name,
        latitude: location.latitude,
        longitude: location.longitude,
    }))
}

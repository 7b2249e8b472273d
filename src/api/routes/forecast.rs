//! Forecast and risk endpoints
//!
//! The forecast endpoint returns aggregated days annotated with a risk score
//! each; the risk endpoint answers the narrower question "how likely is a
//! flare tomorrow". Days are bucketed in the server's local time zone.

use crate::analysis::risk;
use crate::api::dto::{ForecastDayDto, ForecastResponse, RiskResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::forecast::{ForecastDay, ForecastError, Location};
use axum::{extract::State, Json};
use chrono::{Duration, Local};
use std::sync::Arc;

async fn configured_location(state: &AppState) -> Result<Location, ApiError> {
    state.location.read().await.clone().ok_or_else(|| {
        ApiError::Forecast(ForecastError::LocationUnavailable(
            "no location configured".to_string(),
        ))
    })
}

async fn fetch_days(state: &AppState) -> ApiResult<Vec<ForecastDay>> {
    let location = configured_location(state).await?;
    let days = state.forecast.forecast_days(&location, &Local).await?;
    Ok(days)
}

/// GET /api/v1/forecast
pub async fn forecast(State(state): State<Arc<AppState>>) -> ApiResult<Json<ForecastResponse>> {
    let location = configured_location(&state).await?;
    let days = state.forecast.forecast_days(&location, &Local).await?;

    let recent = state.store.recent(risk::RECENT_HISTORY_WINDOW).await;
    let average = risk::recent_pain_average(&recent);

    let days = days
        .iter()
        .map(|day| {
            let assessment = risk::score(Some(day), average);
            ForecastDayDto::new(day, assessment.risk_percent, assessment.level)
        })
        .collect();

    Ok(Json(ForecastResponse {
        location: location.name,
        days,
    }))
}

/// GET /api/v1/risk
///
/// Tomorrow's flare risk. If the aggregated forecast has no entry for
/// tomorrow, the fixed fallback score is returned rather than an error.
pub async fn risk(State(state): State<Arc<AppState>>) -> ApiResult<Json<RiskResponse>> {
    let days = fetch_days(&state).await?;

    let tomorrow = Local::now().date_naive() + Duration::days(1);
    let day = days.iter().find(|d| d.date == tomorrow);

    let recent = state.store.recent(risk::RECENT_HISTORY_WINDOW).await;
    let average = risk::recent_pain_average(&recent);

    let assessment = risk::score(day, average);

    Ok(Json(RiskResponse {
        date: day.map(|d| d.date),
        risk_percent: assessment.risk_percent,
        risk_level: assessment.level,
        risk_tier: risk::RiskTier::from_percent(assessment.risk_percent),
        recent_pain_average: average,
    }))
}

//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use crate::analysis::{CorrelationResult, Insight, RiskLevel, RiskTier};
use crate::forecast::ForecastDay;
use crate::store::types::{BodyRegion, HealthSnapshot, PainObservation, WeatherSnapshot};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================
// OBSERVATION DTOs
// ============================================

/// Create a new pain observation
#[derive(Debug, Deserialize)]
pub struct CreateObservationRequest {
    /// Pain level; out-of-range values are clamped, never rejected
    pub pain_level: i64,
    /// Optional timestamp, defaults to now
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub body_regions: Vec<BodyRegion>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub weather: Option<WeatherSnapshot>,
    #[serde(default)]
    pub health: Option<HealthSnapshot>,
}

/// Edit an existing observation (snapshots are immutable once attached)
#[derive(Debug, Deserialize)]
pub struct UpdateObservationRequest {
    #[serde(default)]
    pub pain_level: Option<i64>,
    #[serde(default)]
    pub body_regions: Option<Vec<BodyRegion>>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Observation list response
#[derive(Debug, Serialize)]
pub struct ObservationsResponse {
    pub observations: Vec<PainObservation>,
    pub count: usize,
}

/// Response after creating an observation
#[derive(Debug, Serialize)]
pub struct CreateObservationResponse {
    pub id: Uuid,
    pub pain_level: u8,
}

// ============================================
// ANALYSIS DTOs
// ============================================

/// One correlation with its derived strength attached for display
#[derive(Debug, Serialize)]
pub struct CorrelationDto {
    pub factor: String,
    pub coefficient: f64,
    pub strength: String,
    pub sample_size: usize,
    pub description: String,
}

impl From<&CorrelationResult> for CorrelationDto {
    fn from(result: &CorrelationResult) -> Self {
        Self {
            factor: result.factor.to_string(),
            coefficient: result.coefficient,
            strength: result.strength().to_string(),
            sample_size: result.sample_size,
            description: result.description.clone(),
        }
    }
}

/// Correlations response
#[derive(Debug, Serialize)]
pub struct CorrelationsResponse {
    pub correlations: Vec<CorrelationDto>,
    pub observation_count: usize,
    pub analyzed_at: Option<DateTime<Utc>>,
}

/// Insights response
#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub insights: Vec<Insight>,
    pub observation_count: usize,
    pub analyzed_at: Option<DateTime<Utc>>,
}

/// Response after an explicit analysis run
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub correlations: Vec<CorrelationDto>,
    pub insights: Vec<Insight>,
    pub observation_count: usize,
}

// ============================================
// FORECAST DTOs
// ============================================

/// One forecast day annotated with risk
#[derive(Debug, Serialize)]
pub struct ForecastDayDto {
    pub date: NaiveDate,
    pub pressure: f64,
    pub pressure_change: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub condition: String,
    pub precipitation_probability: u8,
    pub risk_percent: u8,
    pub risk_level: RiskLevel,
    /// Four-tier display classification of the percentage
    pub risk_tier: RiskTier,
}

impl ForecastDayDto {
    pub fn new(day: &ForecastDay, risk_percent: u8, risk_level: RiskLevel) -> Self {
        Self {
            date: day.date,
            pressure: day.pressure,
            pressure_change: day.pressure_change,
            temperature: day.temperature,
            humidity: day.humidity,
            condition: day.condition.clone(),
            precipitation_probability: day.precipitation_probability,
            risk_percent,
            risk_level,
            risk_tier: RiskTier::from_percent(risk_percent),
        }
    }
}

/// Forecast response
#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub location: String,
    pub days: Vec<ForecastDayDto>,
}

/// Tomorrow's risk response
#[derive(Debug, Serialize)]
pub struct RiskResponse {
    pub date: Option<NaiveDate>,
    pub risk_percent: u8,
    pub risk_level: RiskLevel,
    pub risk_tier: RiskTier,
    pub recent_pain_average: f64,
}

// ============================================
// LOCATION DTOs
// ============================================

/// Set the forecast location
#[derive(Debug, Deserialize)]
pub struct LocationRequest {
    /// Free-form place name, e.g. "Sapporo"
    pub query: String,
}

/// Current location response
#[derive(Debug, Serialize)]
pub struct LocationResponse {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub observations: usize,
    pub analyzing: bool,
    pub uptime_seconds: u64,
    pub version: String,
}

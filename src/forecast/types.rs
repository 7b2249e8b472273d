//! Forecast data types
//!
//! - `RawWeatherSample`: one per-time-slot sample as delivered by the
//!   weather provider (transient, possibly incomplete)
//! - `ForecastDay`: one aggregated summary per calendar day

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A raw weather sample from the provider
///
/// The provider delivers several samples per calendar day (hourly or
/// three-hourly steps). Samples may arrive unordered and may span more days
/// than requested. Numeric fields can be missing on individual samples;
/// such samples are dropped during aggregation rather than failing a batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawWeatherSample {
    /// Sample time in UTC
    pub timestamp_utc: DateTime<Utc>,
    /// Barometric pressure in hPa
    pub pressure: Option<f64>,
    /// Temperature in degrees Celsius
    pub temperature: Option<f64>,
    /// Relative humidity in percent
    pub humidity: Option<f64>,
    /// Condition label, e.g. "Rain"
    pub condition: String,
    /// Probability of precipitation, 0.0-1.0
    pub precipitation_probability: Option<f64>,
}

impl RawWeatherSample {
    /// Whether all required numeric fields are present
    ///
    /// Precipitation probability is not required; a missing value is treated
    /// as zero during aggregation.
    pub fn is_valid(&self) -> bool {
        self.pressure.is_some() && self.temperature.is_some() && self.humidity.is_some()
    }
}

/// Aggregated weather summary for one calendar day
///
/// Produced fresh on every aggregation run, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastDay {
    /// Calendar day in the caller's time zone
    pub date: NaiveDate,
    /// Mean barometric pressure in hPa
    pub pressure: f64,
    /// Pressure delta versus the previous aggregated day (0 for the first)
    pub pressure_change: f64,
    /// Mean temperature in degrees Celsius
    pub temperature: f64,
    /// Mean relative humidity in percent
    pub humidity: f64,
    /// Most frequent condition label that day
    pub condition: String,
    /// Maximum precipitation probability that day, as integer percent
    pub precipitation_probability: u8,
}

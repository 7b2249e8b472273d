//! Weather provider
//!
//! Fetches raw hourly forecast samples from an Open-Meteo style JSON API.
//! The provider's contract with the aggregator is loose on purpose: samples
//! may be unordered, may span more days than requested, and individual
//! samples may be missing numeric fields.

use crate::forecast::location::Location;
use crate::forecast::types::RawWeatherSample;
use crate::forecast::ForecastError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

/// Source of raw weather samples
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetch hourly samples covering roughly `days` days from now
    async fn fetch_hourly(
        &self,
        location: &Location,
        days: usize,
    ) -> Result<Vec<RawWeatherSample>, ForecastError>;
}

/// Open-Meteo forecast API client (no API key required)
pub struct OpenMeteoProvider {
    client: Client,
    base_url: String,
}

impl OpenMeteoProvider {
    /// Create a provider against the public Open-Meteo endpoint
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn fetch_hourly(
        &self,
        location: &Location,
        days: usize,
    ) -> Result<Vec<RawWeatherSample>, ForecastError> {
        let url = format!(
            "{}/v1/forecast?latitude={}&longitude={}&forecast_days={}\
             &hourly=surface_pressure,temperature_2m,relative_humidity_2m,weather_code,precipitation_probability\
             &timeformat=unixtime&timezone=UTC",
            self.base_url, location.latitude, location.longitude, days
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ForecastError::Api(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ForecastError::Api(format!(
                "API returned {}",
                response.status()
            )));
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| ForecastError::Parse(e.to_string()))?;

        Ok(body.hourly.into_samples())
    }
}

#[derive(Deserialize)]
struct ForecastResponse {
    hourly: HourlyBlock,
}

/// Column-oriented hourly data as Open-Meteo delivers it
#[derive(Deserialize)]
struct HourlyBlock {
    time: Vec<i64>,
    #[serde(default)]
    surface_pressure: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    relative_humidity_2m: Vec<Option<f64>>,
    #[serde(default)]
    weather_code: Vec<Option<u32>>,
    #[serde(default)]
    precipitation_probability: Vec<Option<f64>>,
}

impl HourlyBlock {
    /// Pivot the column arrays into one sample per time slot
    ///
    /// Columns shorter than `time` simply leave the trailing fields absent;
    /// the aggregator drops incomplete samples individually.
    fn into_samples(self) -> Vec<RawWeatherSample> {
        self.time
            .iter()
            .enumerate()
            .filter_map(|(i, &unix)| {
                let timestamp_utc = DateTime::<Utc>::from_timestamp(unix, 0)?;
                Some(RawWeatherSample {
                    timestamp_utc,
                    pressure: column(&self.surface_pressure, i),
                    temperature: column(&self.temperature_2m, i),
                    humidity: column(&self.relative_humidity_2m, i),
                    condition: column(&self.weather_code, i)
                        .map(condition_label)
                        .unwrap_or("Unknown")
                        .to_string(),
                    // API reports percent; the sample carries 0.0-1.0
                    precipitation_probability: column(&self.precipitation_probability, i)
                        .map(|p| p / 100.0),
                })
            })
            .collect()
    }
}

fn column<T: Copy>(values: &[Option<T>], index: usize) -> Option<T> {
    values.get(index).copied().flatten()
}

/// Map a WMO weather code to a condition label
fn condition_label(code: u32) -> &'static str {
    match code {
        0 => "Clear",
        1..=3 => "Clouds",
        45 | 48 => "Fog",
        51..=57 => "Drizzle",
        61..=67 | 80..=82 => "Rain",
        71..=77 | 85 | 86 => "Snow",
        95..=99 => "Thunderstorm",
        _ => "Unknown",
    }
}

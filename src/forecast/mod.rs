//! Forecast ingestion and daily aggregation
//!
//! - [`types`]: raw samples and per-day summaries
//! - [`aggregate`]: reduction of raw samples into `ForecastDay`s
//! - [`provider`]: Open-Meteo style hourly forecast client
//! - [`location`]: geocoding with timeout and single-flight guard
//! - [`service`]: rate-limited cached fetch

pub mod aggregate;
pub mod location;
pub mod provider;
pub mod service;
pub mod types;

pub use aggregate::aggregate;
pub use location::{GeocodingClient, Location, LocationProvider, LocationResolver};
pub use provider::{OpenMeteoProvider, WeatherProvider};
pub use service::{ForecastService, ForecastSettings};
pub use types::{ForecastDay, RawWeatherSample};

use thiserror::Error;

/// Errors from forecast fetching and location lookup
///
/// Aggregation itself never fails; these all originate at the provider
/// boundary.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Weather API error: {0}")]
    Api(String),

    #[error("Failed to parse provider response: {0}")]
    Parse(String),

    #[error("A forecast fetch is already in flight")]
    FetchInFlight,

    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("Location lookup timed out after {0} seconds")]
    LocationTimeout(u64),
}

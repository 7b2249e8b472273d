//! # Flarecast
//!
//! Pain-Environment Intelligence - correlates user-recorded pain observations
//! with weather and health factors, and scores flare risk from aggregated
//! forecast data.
//!
//! ## Features
//!
//! - **Observation store**: pain episodes with optional weather/health context,
//!   persisted as JSON
//! - **Correlation analysis**: Pearson correlation between pain and six
//!   environmental/health factors, ranked by strength
//! - **Insights**: pattern, summary, and correlation findings in a stable order
//! - **Forecast aggregation**: hourly provider samples reduced to local-date
//!   daily summaries with day-over-day pressure deltas
//! - **Risk scoring**: bounded 0-100 flare risk from pressure swings plus
//!   recent pain history
//!
//! ## Modules
//!
//! - [`store`]: observation records and the thread-safe store
//! - [`analysis`]: correlation, insights, risk scoring, and the run service
//! - [`forecast`]: weather provider, daily aggregation, location, caching
//! - [`api`]: REST API server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flarecast::analysis::AnalysisService;
//! use flarecast::store::{types::PainObservation, ObservationStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(ObservationStore::new());
//!     store.insert(PainObservation::new(6)).await?;
//!
//!     let analysis = AnalysisService::new(Arc::clone(&store));
//!     let results = analysis.run().await;
//!
//!     println!("{} insights", results.insights.len());
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod config;
pub mod forecast;
pub mod store;

// Re-export top-level types for convenience
pub use analysis::{
    AnalysisResults, AnalysisService, CorrelationResult, Insight, InsightKind, RiskAssessment,
    RiskLevel, RiskTier, Strength,
};

pub use forecast::{
    ForecastDay, ForecastError, ForecastService, ForecastSettings, GeocodingClient, Location,
    LocationProvider, LocationResolver, OpenMeteoProvider, RawWeatherSample, WeatherProvider,
};

pub use store::{ObservationEdit, ObservationStore, StoreError, StoreResult};

pub use api::{build_router, serve, ApiError, ApiResult, AppState};

pub use config::{Config, ConfigError};

//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::analysis::AnalysisService;
use crate::forecast::{ForecastService, Location, LocationResolver};
use crate::store::ObservationStore;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Shared application state for all handlers
pub struct AppState {
    /// Observation store, read concurrently by handlers and analysis
    pub store: Arc<ObservationStore>,
    /// Analysis service publishing the latest correlations and insights
    pub analysis: Arc<AnalysisService>,
    /// Cached forecast access
    pub forecast: Arc<ForecastService>,
    /// Location resolver with timeout and single-flight guard
    pub resolver: Arc<LocationResolver>,
    /// Currently configured location, if one has been resolved
    pub location: RwLock<Option<Location>>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create state from the wired components
    pub fn new(
        store: Arc<ObservationStore>,
        analysis: Arc<AnalysisService>,
        forecast: Arc<ForecastService>,
        resolver: Arc<LocationResolver>,
        location: Option<Location>,
    ) -> Self {
        Self {
            store,
            analysis,
            forecast,
            resolver,
            location: RwLock::new(location),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

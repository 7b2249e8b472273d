//! Forecast service
//!
//! Rate-limited, cached access to aggregated forecast days. The cache is a
//! single mutable slot (last aggregated list + fetch time) that is replaced
//! wholesale, never updated field-by-field. A fetch already in flight is
//! never duplicated: concurrent callers get the stale slot if one exists,
//! otherwise a defined fetch-in-flight error.

use crate::forecast::aggregate::aggregate;
use crate::forecast::location::Location;
use crate::forecast::provider::WeatherProvider;
use crate::forecast::types::ForecastDay;
use crate::forecast::ForecastError;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Forecast fetch and aggregation settings
#[derive(Debug, Clone)]
pub struct ForecastSettings {
    /// Maximum number of days to aggregate
    pub max_days: usize,
    /// Minimum interval between provider fetches, in seconds
    pub min_fetch_interval_secs: u64,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            max_days: 5,
            min_fetch_interval_secs: 600,
        }
    }
}

/// The single cache slot
struct CacheEntry {
    days: Vec<ForecastDay>,
    fetched_at: DateTime<Utc>,
}

/// Serves aggregated forecast days with caching and fetch deduplication
pub struct ForecastService {
    provider: Box<dyn WeatherProvider>,
    settings: ForecastSettings,
    cache: RwLock<Option<CacheEntry>>,
    fetch_in_flight: AtomicBool,
}

impl ForecastService {
    pub fn new(provider: Box<dyn WeatherProvider>, settings: ForecastSettings) -> Self {
        Self {
            provider,
            settings,
            cache: RwLock::new(None),
            fetch_in_flight: AtomicBool::new(false),
        }
    }

    /// Get aggregated forecast days for a location
    ///
    /// Serves the cached list while it is younger than the minimum fetch
    /// interval; otherwise fetches fresh samples and replaces the slot.
    pub async fn forecast_days<Tz: TimeZone>(
        &self,
        location: &Location,
        tz: &Tz,
    ) -> Result<Vec<ForecastDay>, ForecastError> {
        let min_age = Duration::seconds(self.settings.min_fetch_interval_secs as i64);

        if let Some(entry) = &*self.cache.read().await {
            if Utc::now() - entry.fetched_at < min_age {
                return Ok(entry.days.clone());
            }
        }

        if self.fetch_in_flight.swap(true, Ordering::SeqCst) {
            // Another fetch is outstanding; a stale list is still usable
            if let Some(entry) = &*self.cache.read().await {
                tracing::debug!("Forecast fetch in flight, serving stale cache");
                return Ok(entry.days.clone());
            }
            return Err(ForecastError::FetchInFlight);
        }
        let _guard = FetchGuard(&self.fetch_in_flight);

        // Fetch one extra day so the window still fills when the provider's
        // first day is partially in the past
        let samples = self
            .provider
            .fetch_hourly(location, self.settings.max_days + 1)
            .await?;

        let days = aggregate(&samples, tz, self.settings.max_days);

        tracing::info!(
            days = days.len(),
            samples = samples.len(),
            location = %location.name,
            "Forecast aggregated"
        );

        *self.cache.write().await = Some(CacheEntry {
            days: days.clone(),
            fetched_at: Utc::now(),
        });

        Ok(days)
    }

    /// The cached list, if any, regardless of age
    pub async fn cached_days(&self) -> Option<Vec<ForecastDay>> {
        self.cache.read().await.as_ref().map(|e| e.days.clone())
    }
}

/// Clears the in-flight flag when the fetch finishes, including on error
struct FetchGuard<'a>(&'a AtomicBool);

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

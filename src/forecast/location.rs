//! Location lookup
//!
//! Resolves a place-name query to coordinates for keying forecast fetches.
//! Two guarantees matter here: a lookup fails after a fixed timeout instead
//! of hanging, and only one lookup may be in flight at a time; a second
//! concurrent request fails immediately with a location-unavailable error
//! rather than queuing.

use crate::forecast::ForecastError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// A resolved location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Source of location lookups
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Resolve a free-form place name to a location
    async fn lookup(&self, query: &str) -> Result<Location, ForecastError>;
}

/// Open-Meteo geocoding API client
pub struct GeocodingClient {
    client: Client,
    base_url: String,
}

impl GeocodingClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl LocationProvider for GeocodingClient {
    async fn lookup(&self, query: &str) -> Result<Location, ForecastError> {
        let url = format!(
            "{}/v1/search?name={}&count=1",
            self.base_url,
            urlencoding::encode(query)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ForecastError::LocationUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ForecastError::LocationUnavailable(format!(
                "geocoding API returned {}",
                response.status()
            )));
        }

        #[derive(Deserialize)]
        struct GeocodingResponse {
            #[serde(default)]
            results: Vec<GeocodingResult>,
        }

        #[derive(Deserialize)]
        struct GeocodingResult {
            name: String,
            latitude: f64,
            longitude: f64,
        }

        let body: GeocodingResponse = response
            .json()
            .await
            .map_err(|e| ForecastError::Parse(e.to_string()))?;

        let first = body.results.into_iter().next().ok_or_else(|| {
            ForecastError::LocationUnavailable(format!("no match for {:?}", query))
        })?;

        Ok(Location {
            name: first.name,
            latitude: first.latitude,
            longitude: first.longitude,
        })
    }
}

/// Default lookup timeout
pub const LOCATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Wraps a [`LocationProvider`] with the timeout and single-flight guard
pub struct LocationResolver {
    provider: Box<dyn LocationProvider>,
    timeout: Duration,
    in_flight: AtomicBool,
}

impl LocationResolver {
    /// Create a resolver with the default 10 second timeout
    pub fn new(provider: Box<dyn LocationProvider>) -> Self {
        Self::with_timeout(provider, LOCATION_TIMEOUT)
    }

    /// Create a resolver with a custom timeout
    pub fn with_timeout(provider: Box<dyn LocationProvider>, timeout: Duration) -> Self {
        Self {
            provider,
            timeout,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Resolve a query, failing fast if a lookup is already in flight
    pub async fn resolve(&self, query: &str) -> Result<Location, ForecastError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(ForecastError::LocationUnavailable(
                "a location lookup is already in flight".to_string(),
            ));
        }
        let _guard = InFlightGuard(&self.in_flight);

        // The timeout watchdog is dropped the instant the lookup resolves,
        // so a stale timeout can never fire after success
        match tokio::time::timeout(self.timeout, self.provider.lookup(query)).await {
            Ok(result) => result,
            Err(_) => Err(ForecastError::LocationTimeout(self.timeout.as_secs())),
        }
    }
}

/// Clears the in-flight flag when the lookup finishes, including on error
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct FixedProvider;

    #[async_trait]
    impl LocationProvider for FixedProvider {
        async fn lookup(&self, query: &str) -> Result<Location, ForecastError> {
            Ok(Location {
                name: query.to_string(),
                latitude: 35.68,
                longitude: 139.69,
            })
        }
    }

    struct HangingProvider;

    #[async_trait]
    impl LocationProvider for HangingProvider {
        async fn lookup(&self, _query: &str) -> Result<Location, ForecastError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_resolve_success() {
        let resolver = LocationResolver::new(Box::new(FixedProvider));
        let location = resolver.resolve("Tokyo").await.unwrap();
        assert_eq!(location.name, "Tokyo");
    }

    #[tokio::test]
    async fn test_lookup_times_out() {
        let resolver =
            LocationResolver::with_timeout(Box::new(HangingProvider), Duration::from_millis(20));
        let result = resolver.resolve("Nowhere").await;
        assert!(matches!(result, Err(ForecastError::LocationTimeout(_))));
    }

    #[tokio::test]
    async fn test_second_concurrent_lookup_fails_immediately() {
        let resolver = Arc::new(LocationResolver::with_timeout(
            Box::new(HangingProvider),
            Duration::from_millis(200),
        ));

        let first = {
            let resolver = Arc::clone(&resolver);
            tokio::spawn(async move { resolver.resolve("Tokyo").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let second = resolver.resolve("Osaka").await;
        assert!(matches!(
            second,
            Err(ForecastError::LocationUnavailable(_))
        ));

        // The first lookup still runs to its own timeout
        let first = first.await.unwrap();
        assert!(matches!(first, Err(ForecastError::LocationTimeout(_))));
    }

    #[tokio::test]
    async fn test_flag_cleared_after_timeout() {
        let resolver =
            LocationResolver::with_timeout(Box::new(HangingProvider), Duration::from_millis(20));
        let _ = resolver.resolve("Nowhere").await;
        // Flag was released, so the next lookup is attempted (and times out
        // on its own rather than failing as concurrent)
        let again = resolver.resolve("Nowhere").await;
        assert!(matches!(again, Err(ForecastError::LocationTimeout(_))));
    }
}

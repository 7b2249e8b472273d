//! Analysis service
//!
//! Drives correlation analysis and insight generation off the interactive
//! path: take an immutable snapshot of the observation store, run the pure
//! math on a blocking worker, then publish the output in one atomic
//! assignment. The worker never touches live, concurrently-mutable state.

use crate::analysis::correlation::{self, CorrelationResult};
use crate::analysis::insights::{self, Insight};
use crate::store::ObservationStore;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Output of one analysis run
#[derive(Debug, Clone, Default)]
pub struct AnalysisResults {
    /// Ranked correlations, strongest first
    pub correlations: Vec<CorrelationResult>,
    /// Derived findings in fixed emission order
    pub insights: Vec<Insight>,
    /// How many observations the run saw
    pub observation_count: usize,
    /// When the run completed; `None` until the first run
    pub completed_at: Option<DateTime<Utc>>,
}

/// Runs analysis off the interactive path and publishes the latest results
pub struct AnalysisService {
    store: Arc<ObservationStore>,
    results: RwLock<AnalysisResults>,
    run_lock: Mutex<()>,
    analyzing: AtomicBool,
}

impl AnalysisService {
    /// Create a service over the given store
    pub fn new(store: Arc<ObservationStore>) -> Self {
        Self {
            store,
            results: RwLock::new(AnalysisResults::default()),
            run_lock: Mutex::new(()),
            analyzing: AtomicBool::new(false),
        }
    }

    /// Whether an analysis run is currently in flight
    pub fn is_analyzing(&self) -> bool {
        self.analyzing.load(Ordering::SeqCst)
    }

    /// Run a full analysis and publish the results
    ///
    /// At most one run executes at a time; a request arriving mid-run awaits
    /// the in-flight run's completion instead of cancelling it.
    pub async fn run(&self) -> AnalysisResults {
        let _guard = self.run_lock.lock().await;
        self.analyzing.store(true, Ordering::SeqCst);

        let snapshot = self.store.snapshot().await;

        let computed = tokio::task::spawn_blocking(move || {
            let correlations = correlation::analyze(&snapshot);
            let insights = insights::generate(&snapshot, &correlations);
            AnalysisResults {
                correlations,
                insights,
                observation_count: snapshot.len(),
                completed_at: Some(Utc::now()),
            }
        })
        .await;

        self.analyzing.store(false, Ordering::SeqCst);

        match computed {
            Ok(results) => {
                tracing::debug!(
                    observations = results.observation_count,
                    correlations = results.correlations.len(),
                    "Analysis run completed"
                );
                // Single atomic assignment, never an incremental update
                *self.results.write().await = results.clone();
                results
            }
            Err(e) => {
                tracing::error!(error = %e, "Analysis worker failed; keeping last results");
                self.latest().await
            }
        }
    }

    /// The most recently published results
    pub async fn latest(&self) -> AnalysisResults {
        self.results.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::{PainObservation, WeatherSnapshot};
    use chrono::Duration;

    async fn seed(store: &ObservationStore, entries: &[(i64, f64)]) {
        let now = Utc::now();
        for (i, &(pain, pressure)) in entries.iter().enumerate() {
            let obs = PainObservation::new(pain)
                .timestamp(now - Duration::hours(entries.len() as i64 - i as i64))
                .weather(WeatherSnapshot {
                    pressure,
                    temperature: 15.0,
                    humidity: 60.0,
                    condition: "Clouds".to_string(),
                });
            store.insert(obs).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_run_publishes_results() {
        let store = Arc::new(ObservationStore::new());
        seed(&store, &[(8, 990.0), (5, 1005.0), (2, 1020.0)]).await;
        let service = AnalysisService::new(Arc::clone(&store));

        let results = service.run().await;
        assert_eq!(results.observation_count, 3);
        assert!(!results.correlations.is_empty());

        let latest = service.latest().await;
        assert_eq!(latest.correlations, results.correlations);
        assert!(latest.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_empty_store_yields_empty_results() {
        let store = Arc::new(ObservationStore::new());
        let service = AnalysisService::new(store);

        let results = service.run().await;
        assert!(results.correlations.is_empty());
        assert_eq!(results.insights.len(), 1);
        assert_eq!(results.observation_count, 0);
    }

    #[tokio::test]
    async fn test_concurrent_runs_both_complete() {
        let store = Arc::new(ObservationStore::new());
        seed(&store, &[(8, 990.0), (5, 1005.0), (2, 1020.0)]).await;
        let service = Arc::new(AnalysisService::new(store));

        let a = Arc::clone(&service);
        let b = Arc::clone(&service);
        let (ra, rb) = tokio::join!(a.run(), b.run());

        assert_eq!(ra.correlations, rb.correlations);
        assert!(!service.is_analyzing());
    }

    #[tokio::test]
    async fn test_not_analyzing_before_first_run() {
        let store = Arc::new(ObservationStore::new());
        let service = AnalysisService::new(store);
        assert!(!service.is_analyzing());
        assert!(service.latest().await.completed_at.is_none());
    }
}

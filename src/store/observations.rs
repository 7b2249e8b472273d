//! Observation store
//!
//! In-memory collection of pain observations with optional JSON-file
//! persistence. The store is read concurrently by API handlers and by the
//! analysis snapshot step; analysis only ever works on a point-in-time copy,
//! never on the live collection.

use crate::store::types::{clamp_pain_level, BodyRegion, PainObservation};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Errors from the observation store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Observation {0} not found")]
    NotFound(Uuid),

    #[error("Failed to read data file {path:?}: {error}")]
    Read { path: PathBuf, error: String },

    #[error("Failed to write data file {path:?}: {error}")]
    Write { path: PathBuf, error: String },

    #[error("Failed to parse data file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Fields that may be edited on an existing observation
///
/// Weather and health snapshots are immutable once attached and are
/// deliberately not editable.
#[derive(Debug, Clone, Default)]
pub struct ObservationEdit {
    pub pain_level: Option<i64>,
    pub body_regions: Option<Vec<BodyRegion>>,
    pub note: Option<Option<String>>,
}

/// Thread-safe store of pain observations
pub struct ObservationStore {
    observations: RwLock<Vec<PainObservation>>,
    data_path: Option<PathBuf>,
}

impl ObservationStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self {
            observations: RwLock::new(Vec::new()),
            data_path: None,
        }
    }

    /// Create a store backed by a JSON file
    ///
    /// Loads existing observations if the file is present; a missing file is
    /// treated as an empty store.
    pub fn with_persistence(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let observations = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| StoreError::Read {
                path: path.clone(),
                error: e.to_string(),
            })?;
            serde_json::from_str(&content).map_err(|e| StoreError::Parse {
                path: path.clone(),
                error: e.to_string(),
            })?
        } else {
            Vec::new()
        };

        tracing::info!(count = observations.len(), path = ?path, "Loaded observations");

        Ok(Self {
            observations: RwLock::new(observations),
            data_path: Some(path),
        })
    }

    /// Insert a new observation
    pub async fn insert(&self, observation: PainObservation) -> StoreResult<Uuid> {
        let id = observation.id;
        let mut observations = self.observations.write().await;
        observations.push(observation);
        observations.sort_by_key(|o| o.timestamp);
        self.persist(&observations)?;
        Ok(id)
    }

    /// Apply an edit to an existing observation
    pub async fn edit(&self, id: Uuid, edit: ObservationEdit) -> StoreResult<PainObservation> {
        let mut observations = self.observations.write().await;
        let obs = observations
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::NotFound(id))?;

        if let Some(level) = edit.pain_level {
            obs.pain_level = clamp_pain_level(level);
        }
        if let Some(regions) = edit.body_regions {
            *obs = obs.clone().regions(&regions);
        }
        if let Some(note) = edit.note {
            obs.note = note;
        }

        let updated = obs.clone();
        self.persist(&observations)?;
        Ok(updated)
    }

    /// Delete an observation
    pub async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut observations = self.observations.write().await;
        let before = observations.len();
        observations.retain(|o| o.id != id);
        if observations.len() == before {
            return Err(StoreError::NotFound(id));
        }
        self.persist(&observations)?;
        Ok(())
    }

    /// Get a single observation by id
    pub async fn get(&self, id: Uuid) -> Option<PainObservation> {
        self.observations
            .read()
            .await
            .iter()
            .find(|o| o.id == id)
            .cloned()
    }

    /// Take a point-in-time copy of all observations, ordered by timestamp
    ///
    /// This is the only input the analysis pipeline ever sees, so a worker
    /// never touches the live, concurrently-mutable collection.
    pub async fn snapshot(&self) -> Vec<PainObservation> {
        self.observations.read().await.clone()
    }

    /// Number of stored observations
    pub async fn count(&self) -> usize {
        self.observations.read().await.len()
    }

    /// The `n` most recent observations, newest last
    pub async fn recent(&self, n: usize) -> Vec<PainObservation> {
        let observations = self.observations.read().await;
        let start = observations.len().saturating_sub(n);
        observations[start..].to_vec()
    }

    /// Rewrite the backing file, if persistence is configured
    ///
    /// Observation counts are small (a handful per day), so a full rewrite
    /// per mutation is fine.
    fn persist(&self, observations: &[PainObservation]) -> StoreResult<()> {
        let Some(path) = &self.data_path else {
            return Ok(());
        };

        let json =
            serde_json::to_string_pretty(observations).map_err(|e| StoreError::Write {
                path: path.clone(),
                error: e.to_string(),
            })?;

        std::fs::write(path, json).map_err(|e| StoreError::Write {
            path: path.clone(),
            error: e.to_string(),
        })
    }
}

impl Default for ObservationStore {
    fn default() -> Self {
        Self::new()
    }
}

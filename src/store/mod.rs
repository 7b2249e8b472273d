//! Observation store and domain types
//!
//! The store is deliberately simple: observations are few (a handful per
//! day), so an in-memory collection with a JSON file behind it is all the
//! persistence this system needs.

pub mod observations;
pub mod types;

pub use observations::{ObservationEdit, ObservationStore, StoreError, StoreResult};
pub use types::{
    clamp_pain_level, BodyRegion, Factor, HealthSnapshot, PainObservation, WeatherSnapshot,
};

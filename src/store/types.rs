//! Core data types for pain observations
//!
//! This module defines the records the rest of the crate works with:
//! - `PainObservation`: one user-recorded pain episode with optional context
//! - `WeatherSnapshot` / `HealthSnapshot`: embedded context captured at record time
//! - `BodyRegion` and `Factor`: classification enums

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single recorded pain episode
///
/// Created by user action and never mutated except for explicit edits to
/// level, regions, and note. The weather and health snapshots are immutable
/// once attached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PainObservation {
    /// Unique identifier
    pub id: Uuid,
    /// When the observation was recorded
    pub timestamp: DateTime<Utc>,
    /// Pain level, always within 0-10
    pub pain_level: u8,
    /// Affected body regions (set semantics, may be empty)
    #[serde(default)]
    pub body_regions: Vec<BodyRegion>,
    /// Optional free-form note
    #[serde(default)]
    pub note: Option<String>,
    /// Weather context at record time, if available
    #[serde(default)]
    pub weather: Option<WeatherSnapshot>,
    /// Health context at record time, if available
    #[serde(default)]
    pub health: Option<HealthSnapshot>,
}

impl PainObservation {
    /// Create a new observation with the current timestamp
    ///
    /// Out-of-range pain levels are clamped to 0-10, never rejected.
    pub fn new(pain_level: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            pain_level: clamp_pain_level(pain_level),
            body_regions: Vec::new(),
            note: None,
            weather: None,
            health: None,
        }
    }

    /// Builder method: set timestamp
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Builder method: set affected body regions (duplicates removed)
    pub fn regions(mut self, regions: &[BodyRegion]) -> Self {
        self.body_regions = dedup_regions(regions);
        self
    }

    /// Builder method: attach a note
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Builder method: attach a weather snapshot
    pub fn weather(mut self, weather: WeatherSnapshot) -> Self {
        self.weather = Some(weather);
        self
    }

    /// Builder method: attach a health snapshot
    pub fn health(mut self, health: HealthSnapshot) -> Self {
        self.health = Some(health);
        self
    }

    /// Get the value of a correlation factor for this observation
    ///
    /// Returns `None` when the backing snapshot or field is absent; missing
    /// values are never coerced to a sentinel number.
    pub fn factor_value(&self, factor: Factor) -> Option<f64> {
        match factor {
            Factor::Pressure => self.weather.as_ref().map(|w| w.pressure),
            Factor::Temperature => self.weather.as_ref().map(|w| w.temperature),
            Factor::Humidity => self.weather.as_ref().map(|w| w.humidity),
            Factor::SleepDuration => self.health.as_ref().and_then(|h| h.sleep_duration),
            Factor::StepCount => self
                .health
                .as_ref()
                .and_then(|h| h.step_count)
                .map(|s| s as f64),
            Factor::HeartRate => self.health.as_ref().and_then(|h| h.heart_rate),
        }
    }
}

/// Clamp a raw pain level into the valid 0-10 range
pub fn clamp_pain_level(level: i64) -> u8 {
    level.clamp(0, 10) as u8
}

/// Remove duplicate regions while preserving first-seen order
fn dedup_regions(regions: &[BodyRegion]) -> Vec<BodyRegion> {
    let mut out = Vec::with_capacity(regions.len());
    for region in regions {
        if !out.contains(region) {
            out.push(*region);
        }
    }
    out
}

/// Weather context captured when an observation is recorded
///
/// The fields are only meaningful together, so the whole snapshot is either
/// present or absent on an observation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSnapshot {
    /// Barometric pressure in hPa
    pub pressure: f64,
    /// Temperature in degrees Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Condition label, e.g. "Rain"
    pub condition: String,
}

/// Health context captured when an observation is recorded
///
/// Partial health data is common; each field is independently optional and a
/// missing field never invalidates the rest of the snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HealthSnapshot {
    /// Steps walked that day
    #[serde(default)]
    pub step_count: Option<u32>,
    /// Hours slept the previous night
    #[serde(default)]
    pub sleep_duration: Option<f64>,
    /// Resting heart rate in bpm
    #[serde(default)]
    pub heart_rate: Option<f64>,
}

/// Body region tags for pain observations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BodyRegion {
    Head,
    Neck,
    Shoulder,
    Elbow,
    Wrist,
    UpperBack,
    LowerBack,
    Hip,
    Knee,
    Ankle,
}

impl BodyRegion {
    /// All regions in stable enumeration order (used for tie-breaking)
    pub fn all() -> &'static [BodyRegion] {
        &[
            BodyRegion::Head,
            BodyRegion::Neck,
            BodyRegion::Shoulder,
            BodyRegion::Elbow,
            BodyRegion::Wrist,
            BodyRegion::UpperBack,
            BodyRegion::LowerBack,
            BodyRegion::Hip,
            BodyRegion::Knee,
            BodyRegion::Ankle,
        ]
    }
}

impl std::fmt::Display for BodyRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BodyRegion::Head => "head",
            BodyRegion::Neck => "neck",
            BodyRegion::Shoulder => "shoulder",
            BodyRegion::Elbow => "elbow",
            BodyRegion::Wrist => "wrist",
            BodyRegion::UpperBack => "upper back",
            BodyRegion::LowerBack => "lower back",
            BodyRegion::Hip => "hip",
            BodyRegion::Knee => "knee",
            BodyRegion::Ankle => "ankle",
        };
        write!(f, "{}", name)
    }
}

/// A measurable quantity tested for correlation with pain level
///
/// Declaration order is the tie-break order when two factors have equal
/// absolute coefficients.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Pressure,
    Temperature,
    Humidity,
    SleepDuration,
    StepCount,
    HeartRate,
}

impl Factor {
    /// All factors in declaration order
    pub fn all() -> &'static [Factor] {
        &[
            Factor::Pressure,
            Factor::Temperature,
            Factor::Humidity,
            Factor::SleepDuration,
            Factor::StepCount,
            Factor::HeartRate,
        ]
    }
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Factor::Pressure => "pressure",
            Factor::Temperature => "temperature",
            Factor::Humidity => "humidity",
            Factor::SleepDuration => "sleep duration",
            Factor::StepCount => "step count",
            Factor::HeartRate => "heart rate",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pain_level_clamped_high() {
        let obs = PainObservation::new(14);
        assert_eq!(obs.pain_level, 10);
    }

    #[test]
    fn test_pain_level_clamped_negative() {
        let obs = PainObservation::new(-3);
        assert_eq!(obs.pain_level, 0);
    }

    #[test]
    fn test_pain_level_in_range_unchanged() {
        let obs = PainObservation::new(7);
        assert_eq!(obs.pain_level, 7);
    }

    #[test]
    fn test_regions_deduplicated() {
        let obs = PainObservation::new(5).regions(&[
            BodyRegion::Knee,
            BodyRegion::Hip,
            BodyRegion::Knee,
        ]);
        assert_eq!(obs.body_regions, vec![BodyRegion::Knee, BodyRegion::Hip]);
    }

    #[test]
    fn test_factor_value_absent_without_snapshot() {
        let obs = PainObservation::new(5);
        for &factor in Factor::all() {
            assert_eq!(obs.factor_value(factor), None);
        }
    }

    #[test]
    fn test_factor_value_partial_health() {
        let obs = PainObservation::new(5).health(HealthSnapshot {
            step_count: Some(8000),
            sleep_duration: None,
            heart_rate: Some(62.0),
        });
        assert_eq!(obs.factor_value(Factor::StepCount), Some(8000.0));
        assert_eq!(obs.factor_value(Factor::SleepDuration), None);
        assert_eq!(obs.factor_value(Factor::HeartRate), Some(62.0));
    }

    #[test]
    fn test_observation_serializes() {
        let obs = PainObservation::new(6)
            .regions(&[BodyRegion::LowerBack])
            .weather(WeatherSnapshot {
                pressure: 1003.2,
                temperature: 18.5,
                humidity: 71.0,
                condition: "Rain".to_string(),
            });

        let json = serde_json::to_string(&obs).unwrap();
        assert!(json.contains("\"pain_level\":6"));
        assert!(json.contains("\"lower_back\""));

        let back: PainObservation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, obs);
    }
}

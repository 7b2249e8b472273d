//! Risk Scorer
//!
//! Combines an aggregated forecast day with the recent pain history into a
//! bounded 0-100 risk percent and a discrete risk level. The level banding
//! operates on the raw pressure delta, while a separate four-tier scale
//! classifies percentages for display context; the two are intentionally
//! distinct and must not be unified.

use crate::forecast::types::ForecastDay;
use crate::store::types::PainObservation;
use serde::{Deserialize, Serialize};

/// Weight applied to the absolute pressure delta
pub const PRESSURE_RISK_MULTIPLIER: f64 = 8.0;

/// Weight applied to the normalized recent pain average
pub const HISTORY_RISK_MULTIPLIER: f64 = 20.0;

/// Score returned when no forecast day is available
pub const FALLBACK_RISK_PERCENT: u8 = 20;

/// How many recent observations feed the historical adjustment
pub const RECENT_HISTORY_WINDOW: usize = 10;

/// Risk level derived from the raw pressure delta
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Classify by absolute pressure delta in hPa
    fn from_pressure_delta(delta: f64) -> Self {
        let abs = delta.abs();
        if abs >= 10.0 {
            RiskLevel::High
        } else if abs >= 5.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Four-tier classification of a risk percentage, used for display context
///
/// Kept separate from [`RiskLevel`]: the scorer's banding works on pressure
/// deltas and only knows three bands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskTier {
    /// Classify a 0-100 risk percentage
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            0..=24 => RiskTier::Low,
            25..=49 => RiskTier::Medium,
            50..=74 => RiskTier::High,
            _ => RiskTier::VeryHigh,
        }
    }
}

/// The scorer's output pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RiskAssessment {
    /// Bounded risk score, 0-100
    pub risk_percent: u8,
    /// Discrete level derived from the pressure delta
    pub level: RiskLevel,
}

/// Score the flare risk for one forecast day
///
/// `recent_pain_average` is the mean pain level of at most the 10 most recent
/// observations (see [`recent_pain_average`]). A missing forecast day yields
/// a fixed fallback of 20 / low so callers always have something to render.
///
/// The base pressure component is left unclamped so a large delta can carry
/// the score; the bound is applied exactly once, at the end.
pub fn score(day: Option<&ForecastDay>, recent_pain_average: f64) -> RiskAssessment {
    let Some(day) = day else {
        return RiskAssessment {
            risk_percent: FALLBACK_RISK_PERCENT,
            level: RiskLevel::Low,
        };
    };

    let base_pressure_risk = (day.pressure_change.abs() * PRESSURE_RISK_MULTIPLIER).round();
    let historical_factor = recent_pain_average / 10.0;
    let historical_risk = (historical_factor * HISTORY_RISK_MULTIPLIER).round();

    let risk_percent = (base_pressure_risk + historical_risk).clamp(0.0, 100.0) as u8;

    RiskAssessment {
        risk_percent,
        level: RiskLevel::from_pressure_delta(day.pressure_change),
    }
}

/// Mean pain level over at most the 10 most recent observations
///
/// Returns 0 when there are none.
pub fn recent_pain_average(observations: &[PainObservation]) -> f64 {
    if observations.is_empty() {
        return 0.0;
    }

    let mut sorted: Vec<&PainObservation> = observations.iter().collect();
    sorted.sort_by_key(|o| o.timestamp);

    let recent = &sorted[sorted.len().saturating_sub(RECENT_HISTORY_WINDOW)..];
    recent.iter().map(|o| o.pain_level as f64).sum::<f64>() / recent.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, Utc};

    fn day_with_delta(delta: f64) -> ForecastDay {
        ForecastDay {
            date: NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
            pressure: 1005.0,
            pressure_change: delta,
            temperature: 14.0,
            humidity: 65.0,
            condition: "Clouds".to_string(),
            precipitation_probability: 30,
        }
    }

    #[test]
    fn test_clamped_to_hundred() {
        // Base risk 160 pre-clamp plus full historical adjustment
        let assessment = score(Some(&day_with_delta(-20.0)), 10.0);
        assert_eq!(assessment.risk_percent, 100);
        assert_eq!(assessment.level, RiskLevel::High);
    }

    #[test]
    fn test_missing_day_fallback() {
        let assessment = score(None, 7.0);
        assert_eq!(assessment.risk_percent, 20);
        assert_eq!(assessment.level, RiskLevel::Low);
    }

    #[test]
    fn test_score_components_add() {
        // |Δ| 3 → base 24; average 5 → +10
        let assessment = score(Some(&day_with_delta(3.0)), 5.0);
        assert_eq!(assessment.risk_percent, 34);
        assert_eq!(assessment.level, RiskLevel::Low);
    }

    #[test]
    fn test_zero_everything() {
        let assessment = score(Some(&day_with_delta(0.0)), 0.0);
        assert_eq!(assessment.risk_percent, 0);
        assert_eq!(assessment.level, RiskLevel::Low);
    }

    #[test]
    fn test_level_bands_on_delta() {
        assert_eq!(score(Some(&day_with_delta(10.0)), 0.0).level, RiskLevel::High);
        assert_eq!(score(Some(&day_with_delta(-10.0)), 0.0).level, RiskLevel::High);
        assert_eq!(score(Some(&day_with_delta(5.0)), 0.0).level, RiskLevel::Medium);
        assert_eq!(score(Some(&day_with_delta(9.9)), 0.0).level, RiskLevel::Medium);
        assert_eq!(score(Some(&day_with_delta(4.9)), 0.0).level, RiskLevel::Low);
    }

    #[test]
    fn test_display_tiers() {
        assert_eq!(RiskTier::from_percent(0), RiskTier::Low);
        assert_eq!(RiskTier::from_percent(24), RiskTier::Low);
        assert_eq!(RiskTier::from_percent(25), RiskTier::Medium);
        assert_eq!(RiskTier::from_percent(49), RiskTier::Medium);
        assert_eq!(RiskTier::from_percent(50), RiskTier::High);
        assert_eq!(RiskTier::from_percent(74), RiskTier::High);
        assert_eq!(RiskTier::from_percent(75), RiskTier::VeryHigh);
        assert_eq!(RiskTier::from_percent(100), RiskTier::VeryHigh);
    }

    #[test]
    fn test_recent_average_empty() {
        assert_eq!(recent_pain_average(&[]), 0.0);
    }

    #[test]
    fn test_recent_average_window() {
        // 15 observations; only the newest 10 (levels 5..=9 twice) count
        let now = Utc::now();
        let observations: Vec<PainObservation> = (0..15i64)
            .map(|i| {
                PainObservation::new(i % 10).timestamp(now - Duration::hours(15 - i))
            })
            .collect();

        // Newest ten have levels 5,6,7,8,9,0,1,2,3,4
        let average = recent_pain_average(&observations);
        assert!((average - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_recent_average_fewer_than_window() {
        let observations = vec![PainObservation::new(4), PainObservation::new(8)];
        let average = recent_pain_average(&observations);
        assert!((average - 6.0).abs() < 1e-9);
    }
}

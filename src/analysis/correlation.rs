//! Correlation Engine
//!
//! Computes Pearson correlation coefficients between recorded pain levels and
//! each environmental/health factor, classifies them by strength, and ranks
//! them. Pure functions over an observation snapshot; no shared state.

use crate::store::types::{Factor, PainObservation};
use serde::{Deserialize, Serialize};

/// Minimum paired sample count for any correlation to be produced
pub const MIN_SAMPLE_SIZE: usize = 3;

/// Coefficient magnitude below which a correlation is described as neutral
pub const DIRECTION_THRESHOLD: f64 = 0.3;

/// Correlation between pain level and one factor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorrelationResult {
    /// The factor tested against pain level
    pub factor: Factor,
    /// Pearson correlation coefficient, -1 to 1
    pub coefficient: f64,
    /// Number of observations with both a pain level and a factor value
    pub sample_size: usize,
    /// Canned directional description chosen by sign and threshold
    pub description: String,
}

impl CorrelationResult {
    /// Strength classification, always recomputed from the coefficient
    pub fn strength(&self) -> Strength {
        Strength::from_coefficient(self.coefficient)
    }
}

/// Strength bands for display
///
/// The cut points (0.2 / 0.4 / 0.7) deliberately differ from the 0.3
/// direction threshold; a coefficient of 0.3 is "weak" yet still neutral.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Strong,
    Moderate,
    Weak,
    Negligible,
}

impl Strength {
    /// Classify a coefficient by absolute value
    pub fn from_coefficient(r: f64) -> Self {
        let abs_r = r.abs();
        if abs_r >= 0.7 {
            Strength::Strong
        } else if abs_r >= 0.4 {
            Strength::Moderate
        } else if abs_r >= 0.2 {
            Strength::Weak
        } else {
            Strength::Negligible
        }
    }
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strength::Strong => write!(f, "strong"),
            Strength::Moderate => write!(f, "moderate"),
            Strength::Weak => write!(f, "weak"),
            Strength::Negligible => write!(f, "negligible"),
        }
    }
}

/// Analyze observations against every factor
///
/// Returns one result per factor with at least [`MIN_SAMPLE_SIZE`] paired
/// points, sorted descending by absolute coefficient; ties keep factor
/// declaration order. Fewer than [`MIN_SAMPLE_SIZE`] observations overall is
/// a hard gate and yields an empty list, never an error.
pub fn analyze(observations: &[PainObservation]) -> Vec<CorrelationResult> {
    if observations.len() < MIN_SAMPLE_SIZE {
        return Vec::new();
    }

    let mut results = Vec::new();

    for &factor in Factor::all() {
        let mut pain = Vec::new();
        let mut values = Vec::new();

        for obs in observations {
            if let Some(value) = obs.factor_value(factor) {
                pain.push(obs.pain_level as f64);
                values.push(value);
            }
        }

        if pain.len() < MIN_SAMPLE_SIZE {
            continue;
        }

        let r = pearson_correlation(&pain, &values);

        results.push(CorrelationResult {
            factor,
            coefficient: r,
            sample_size: pain.len(),
            description: direction_description(factor, r),
        });
    }

    // Stable sort keeps declaration order for equal magnitudes
    results.sort_by(|a, b| {
        b.coefficient
            .abs()
            .partial_cmp(&a.coefficient.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    results
}

/// Calculate Pearson correlation coefficient
///
/// Returns a value between -1 and 1:
/// - 1: perfect positive correlation
/// - 0: no correlation
/// - -1: perfect negative correlation
///
/// Zero variance in either series yields 0 rather than a division by zero.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return 0.0;
    }

    let n = x.len() as f64;

    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y.iter()).map(|(a, b)| a * b).sum();
    let sum_x2: f64 = x.iter().map(|a| a * a).sum();
    let sum_y2: f64 = y.iter().map(|b| b * b).sum();

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x.powi(2)) * (n * sum_y2 - sum_y.powi(2))).sqrt();

    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Pick the canned directional phrase for a factor
///
/// Neutral within [-0.3, 0.3] inclusive, the low-direction phrase below,
/// the high-direction phrase above. The threshold is the same for every
/// factor.
pub fn direction_description(factor: Factor, r: f64) -> String {
    if r.abs() <= DIRECTION_THRESHOLD {
        return format!("No clear relationship between {} and pain", factor);
    }

    let phrase = if r < 0.0 {
        match factor {
            Factor::Pressure => "Pain tends to increase when pressure is low",
            Factor::Temperature => "Pain tends to increase on cold days",
            Factor::Humidity => "Pain tends to increase in dry conditions",
            Factor::SleepDuration => "Pain tends to increase after short sleep",
            Factor::StepCount => "Pain tends to increase on low-activity days",
            Factor::HeartRate => "Pain tends to increase when heart rate is low",
        }
    } else {
        match factor {
            Factor::Pressure => "Pain tends to increase when pressure is high",
            Factor::Temperature => "Pain tends to increase on warm days",
            Factor::Humidity => "Pain tends to increase in humid conditions",
            Factor::SleepDuration => "Pain tends to increase after long sleep",
            Factor::StepCount => "Pain tends to increase on high-activity days",
            Factor::HeartRate => "Pain tends to increase when heart rate is elevated",
        }
    };

    phrase.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::{HealthSnapshot, WeatherSnapshot};
    use chrono::{Duration, Utc};

    fn obs_with_pressure(pain: i64, pressure: f64, offset_hours: i64) -> PainObservation {
        PainObservation::new(pain)
            .timestamp(Utc::now() - Duration::hours(offset_hours))
            .weather(WeatherSnapshot {
                pressure,
                temperature: 15.0,
                humidity: 60.0,
                condition: "Clouds".to_string(),
            })
    }

    #[test]
    fn test_pearson_perfect_positive() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![2.0, 4.0, 6.0, 8.0, 10.0];
        let r = pearson_correlation(&x, &y);
        assert!((r - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_pearson_perfect_negative() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![10.0, 8.0, 6.0, 4.0, 2.0];
        let r = pearson_correlation(&x, &y);
        assert!((r + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_pearson_constant_series_is_zero() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let y = vec![5.0, 5.0, 5.0, 5.0];
        assert_eq!(pearson_correlation(&x, &y), 0.0);
    }

    #[test]
    fn test_pearson_empty() {
        let x: Vec<f64> = vec![];
        let y: Vec<f64> = vec![];
        assert_eq!(pearson_correlation(&x, &y), 0.0);
    }

    #[test]
    fn test_pearson_bounded() {
        let x = vec![3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let y = vec![2.0, 7.0, 1.0, 8.0, 2.0, 8.0, 1.0, 8.0];
        let r = pearson_correlation(&x, &y);
        assert!((-1.0..=1.0).contains(&r));
    }

    #[test]
    fn test_gate_below_three_observations() {
        let observations = vec![
            obs_with_pressure(8, 990.0, 2),
            obs_with_pressure(2, 1020.0, 1),
        ];
        assert!(analyze(&observations).is_empty());
    }

    #[test]
    fn test_three_observations_produce_pressure_result() {
        let observations = vec![
            obs_with_pressure(8, 990.0, 3),
            obs_with_pressure(5, 1005.0, 2),
            obs_with_pressure(2, 1020.0, 1),
        ];

        let results = analyze(&observations);
        let pressure = results
            .iter()
            .find(|r| r.factor == Factor::Pressure)
            .expect("pressure result");
        assert_eq!(pressure.sample_size, 3);
    }

    #[test]
    fn test_factor_with_too_few_pairs_skipped() {
        // Three observations overall, but only two carry sleep data
        let mut observations = vec![
            obs_with_pressure(8, 990.0, 3),
            obs_with_pressure(5, 1005.0, 2),
            obs_with_pressure(2, 1020.0, 1),
        ];
        observations[0].health = Some(HealthSnapshot {
            sleep_duration: Some(5.0),
            ..Default::default()
        });
        observations[1].health = Some(HealthSnapshot {
            sleep_duration: Some(8.0),
            ..Default::default()
        });

        let results = analyze(&observations);
        assert!(results.iter().all(|r| r.factor != Factor::SleepDuration));
        assert!(results.iter().any(|r| r.factor == Factor::Pressure));
    }

    #[test]
    fn test_negative_pressure_correlation_scenario() {
        // High pain on low-pressure days
        let pains = [8, 7, 2, 3, 9];
        let pressures = [990.0, 995.0, 1020.0, 1018.0, 988.0];
        let observations: Vec<PainObservation> = pains
            .iter()
            .zip(pressures.iter())
            .enumerate()
            .map(|(i, (&pain, &pressure))| obs_with_pressure(pain, pressure, i as i64))
            .collect();

        let results = analyze(&observations);
        let pressure = results
            .iter()
            .find(|r| r.factor == Factor::Pressure)
            .expect("pressure result");

        assert!(pressure.coefficient < -0.3);
        assert_eq!(
            pressure.description,
            "Pain tends to increase when pressure is low"
        );
        assert!(matches!(
            pressure.strength(),
            Strength::Moderate | Strength::Strong
        ));
    }

    #[test]
    fn test_boundary_coefficient_neutral_but_weak() {
        // 0.3 is the direction threshold but falls inside the weak band
        let description = direction_description(Factor::Pressure, 0.3);
        assert_eq!(description, "No clear relationship between pressure and pain");
        assert_eq!(Strength::from_coefficient(0.3), Strength::Weak);
        assert_eq!(Strength::from_coefficient(-0.3), Strength::Weak);
    }

    #[test]
    fn test_strength_bands() {
        assert_eq!(Strength::from_coefficient(0.8), Strength::Strong);
        assert_eq!(Strength::from_coefficient(-0.7), Strength::Strong);
        assert_eq!(Strength::from_coefficient(0.5), Strength::Moderate);
        assert_eq!(Strength::from_coefficient(0.4), Strength::Moderate);
        assert_eq!(Strength::from_coefficient(0.25), Strength::Weak);
        assert_eq!(Strength::from_coefficient(0.2), Strength::Weak);
        assert_eq!(Strength::from_coefficient(0.1), Strength::Negligible);
    }

    #[test]
    fn test_results_sorted_by_magnitude() {
        // Pressure tracks pain inversely and perfectly; heart rate only loosely
        let observations: Vec<PainObservation> = [(8, 990.0, 90.0), (5, 1005.0, 60.0), (2, 1020.0, 75.0)]
            .iter()
            .enumerate()
            .map(|(i, &(pain, pressure, hr))| {
                let mut obs = obs_with_pressure(pain, pressure, i as i64);
                obs.health = Some(HealthSnapshot {
                    heart_rate: Some(hr),
                    ..Default::default()
                });
                obs
            })
            .collect();

        let results = analyze(&observations);
        for pair in results.windows(2) {
            assert!(pair[0].coefficient.abs() >= pair[1].coefficient.abs());
        }
    }

    #[test]
    fn test_ties_keep_declaration_order() {
        // Constant weather on every observation: all three weather factors
        // compute r = 0 and must come out in declaration order
        let observations = vec![
            obs_with_pressure(8, 1000.0, 3),
            obs_with_pressure(5, 1000.0, 2),
            obs_with_pressure(2, 1000.0, 1),
        ];

        let results = analyze(&observations);
        let factors: Vec<Factor> = results.iter().map(|r| r.factor).collect();
        assert_eq!(
            factors,
            vec![Factor::Pressure, Factor::Temperature, Factor::Humidity]
        );
    }

    #[test]
    fn test_correlation_result_serializes() {
        let result = CorrelationResult {
            factor: Factor::Pressure,
            coefficient: -0.72,
            sample_size: 12,
            description: "Pain tends to increase when pressure is low".to_string(),
        };

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"factor\":\"pressure\""));
        assert!(json.contains("-0.72"));
    }
}

//! Insight Generator
//!
//! Derives a small set of human-readable findings from an observation
//! snapshot and the correlation engine's output. Insights are regenerated on
//! every run and never persisted.

use crate::analysis::correlation::{CorrelationResult, DIRECTION_THRESHOLD};
use crate::store::types::{BodyRegion, PainObservation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of finding an insight represents
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Pattern,
    Correlation,
    Summary,
    Recommendation,
}

/// A human-readable finding derived from the observation history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
}

impl Insight {
    /// Identity key, stable across runs over the same data
    pub fn key(&self) -> (InsightKind, &str) {
        (self.kind, &self.title)
    }
}

/// Generate insights from observations and already-ranked correlations
///
/// Emits in a fixed order: pattern, summary, correlation. The summary is
/// always present; the others are omitted when there is nothing to say.
pub fn generate(
    observations: &[PainObservation],
    correlations: &[CorrelationResult],
) -> Vec<Insight> {
    let mut insights = Vec::with_capacity(3);

    if let Some(insight) = most_affected_region(observations) {
        insights.push(insight);
    }

    insights.push(average_pain(observations));

    if let Some(insight) = strongest_correlation(correlations) {
        insights.push(insight);
    }

    insights
}

/// Pattern insight: the body region tagged most often
///
/// An observation contributes once per tagged region. Ties break toward the
/// first region in the stable enumeration order. No tagged observations means
/// no insight rather than a zero-count one.
fn most_affected_region(observations: &[PainObservation]) -> Option<Insight> {
    let mut counts: HashMap<BodyRegion, usize> = HashMap::new();
    for obs in observations {
        for &region in &obs.body_regions {
            *counts.entry(region).or_insert(0) += 1;
        }
    }

    let mut top: Option<(BodyRegion, usize)> = None;
    for &region in BodyRegion::all() {
        if let Some(&count) = counts.get(&region) {
            if top.map_or(true, |(_, best)| count > best) {
                top = Some((region, count));
            }
        }
    }

    top.map(|(region, count)| Insight {
        kind: InsightKind::Pattern,
        title: "Most affected area".to_string(),
        description: format!(
            "Your {} was affected in {} of your recorded episodes",
            region, count
        ),
    })
}

/// Summary insight: mean pain level, 0 when there is nothing recorded
fn average_pain(observations: &[PainObservation]) -> Insight {
    let average = if observations.is_empty() {
        0.0
    } else {
        observations.iter().map(|o| o.pain_level as f64).sum::<f64>() / observations.len() as f64
    };

    Insight {
        kind: InsightKind::Summary,
        title: "Average pain".to_string(),
        description: format!("Your average pain level is {:.1}", average),
    }
}

/// Correlation insight: the top-ranked factor, if it clears the threshold
fn strongest_correlation(correlations: &[CorrelationResult]) -> Option<Insight> {
    let top = correlations.first()?;
    if top.coefficient.abs() <= DIRECTION_THRESHOLD {
        return None;
    }

    Some(Insight {
        kind: InsightKind::Correlation,
        title: format!("Strongest link: {}", top.factor),
        description: format!("{} (r = {:.2})", top.description, top.coefficient),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::correlation;
    use crate::store::types::Factor;

    fn tagged(level: i64, regions: &[BodyRegion]) -> PainObservation {
        PainObservation::new(level).regions(regions)
    }

    fn correlation_result(factor: Factor, coefficient: f64) -> CorrelationResult {
        CorrelationResult {
            factor,
            coefficient,
            sample_size: 10,
            description: correlation::direction_description(factor, coefficient),
        }
    }

    #[test]
    fn test_empty_observations_single_summary() {
        let insights = generate(&[], &[]);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Summary);
        assert_eq!(insights[0].description, "Your average pain level is 0.0");
    }

    #[test]
    fn test_average_pain_one_decimal() {
        let observations = vec![tagged(7, &[]), tagged(4, &[]), tagged(3, &[])];
        let insights = generate(&observations, &[]);
        let summary = insights
            .iter()
            .find(|i| i.kind == InsightKind::Summary)
            .unwrap();
        assert!(summary.description.contains("4.7"));
    }

    #[test]
    fn test_most_affected_region_counts_per_tag() {
        let observations = vec![
            tagged(5, &[BodyRegion::Knee, BodyRegion::Hip]),
            tagged(6, &[BodyRegion::Knee]),
            tagged(4, &[BodyRegion::Hip]),
            tagged(4, &[BodyRegion::Knee]),
        ];

        let insights = generate(&observations, &[]);
        let pattern = insights
            .iter()
            .find(|i| i.kind == InsightKind::Pattern)
            .unwrap();
        assert!(pattern.description.contains("knee"));
        assert!(pattern.description.contains('3'));
    }

    #[test]
    fn test_region_tie_breaks_by_enumeration_order() {
        // Knee and head tied; head comes first in enumeration order
        let observations = vec![
            tagged(5, &[BodyRegion::Knee]),
            tagged(6, &[BodyRegion::Head]),
        ];

        let insights = generate(&observations, &[]);
        let pattern = insights
            .iter()
            .find(|i| i.kind == InsightKind::Pattern)
            .unwrap();
        assert!(pattern.description.contains("head"));
    }

    #[test]
    fn test_no_tags_no_pattern_insight() {
        let observations = vec![tagged(5, &[]), tagged(6, &[])];
        let insights = generate(&observations, &[]);
        assert!(insights.iter().all(|i| i.kind != InsightKind::Pattern));
    }

    #[test]
    fn test_correlation_insight_uses_top_entry() {
        let correlations = vec![
            correlation_result(Factor::Pressure, -0.8),
            correlation_result(Factor::Humidity, 0.5),
        ];

        let insights = generate(&[tagged(5, &[])], &correlations);
        let corr = insights
            .iter()
            .find(|i| i.kind == InsightKind::Correlation)
            .unwrap();
        assert_eq!(corr.title, "Strongest link: pressure");
        assert!(corr.description.contains("-0.80"));
    }

    #[test]
    fn test_correlation_insight_omitted_at_threshold() {
        let correlations = vec![correlation_result(Factor::Pressure, 0.3)];
        let insights = generate(&[tagged(5, &[])], &correlations);
        assert!(insights.iter().all(|i| i.kind != InsightKind::Correlation));
    }

    #[test]
    fn test_fixed_emission_order() {
        let observations = vec![
            tagged(5, &[BodyRegion::Neck]),
            tagged(7, &[BodyRegion::Neck]),
            tagged(6, &[]),
        ];
        let correlations = vec![correlation_result(Factor::SleepDuration, -0.6)];

        let insights = generate(&observations, &correlations);
        let kinds: Vec<InsightKind> = insights.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                InsightKind::Pattern,
                InsightKind::Summary,
                InsightKind::Correlation
            ]
        );
    }

    #[test]
    fn test_identity_key_stable_across_runs() {
        let observations = vec![tagged(5, &[BodyRegion::Hip]), tagged(7, &[BodyRegion::Hip])];
        let a = generate(&observations, &[]);
        let b = generate(&observations, &[]);
        let keys_a: Vec<_> = a.iter().map(|i| i.key()).collect();
        let keys_b: Vec<_> = b.iter().map(|i| i.key()).collect();
        assert_eq!(keys_a, keys_b);
    }
}

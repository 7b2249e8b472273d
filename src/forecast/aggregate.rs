//! Daily aggregation
//!
//! Reduces raw per-time-slot weather samples into one `ForecastDay` per
//! calendar day. Days are bucketed in the caller-supplied time zone; bucketing
//! by UTC day would put evening samples in the wrong day for non-UTC users.

use crate::forecast::types::{ForecastDay, RawWeatherSample};
use chrono::{NaiveDate, TimeZone};
use std::collections::HashMap;

/// Aggregate raw samples into per-day summaries
///
/// Groups valid samples by calendar day in `tz`, keeps at most `max_days`
/// earliest days, and computes per-day means, the dominant condition, and the
/// day-over-day pressure delta. Samples missing a required numeric field are
/// dropped individually; an empty input yields an empty output.
pub fn aggregate<Tz: TimeZone>(
    samples: &[RawWeatherSample],
    tz: &Tz,
    max_days: usize,
) -> Vec<ForecastDay> {
    let mut buckets: HashMap<NaiveDate, Vec<&RawWeatherSample>> = HashMap::new();

    for sample in samples.iter().filter(|s| s.is_valid()) {
        let local_date = sample.timestamp_utc.with_timezone(tz).date_naive();
        buckets.entry(local_date).or_default().push(sample);
    }

    let mut dates: Vec<NaiveDate> = buckets.keys().copied().collect();
    dates.sort();
    dates.truncate(max_days);

    let mut days = Vec::with_capacity(dates.len());
    let mut previous_pressure: Option<f64> = None;

    for date in dates {
        let day_samples = &buckets[&date];
        let n = day_samples.len() as f64;

        // is_valid() guarantees the required fields below are present
        let pressure = day_samples
            .iter()
            .map(|s| s.pressure.unwrap_or_default())
            .sum::<f64>()
            / n;
        let temperature = day_samples
            .iter()
            .map(|s| s.temperature.unwrap_or_default())
            .sum::<f64>()
            / n;
        let humidity = day_samples
            .iter()
            .map(|s| s.humidity.unwrap_or_default())
            .sum::<f64>()
            / n;

        // Delta against the previous output day, not the previous calendar
        // day, so a skipped day does not produce a hole
        let pressure_change = previous_pressure.map_or(0.0, |prev| pressure - prev);
        previous_pressure = Some(pressure);

        days.push(ForecastDay {
            date,
            pressure,
            pressure_change,
            temperature,
            humidity,
            condition: dominant_condition(day_samples),
            precipitation_probability: max_precipitation_percent(day_samples),
        });
    }

    days
}

/// Most frequent condition label, ties broken by first occurrence in sample order
fn dominant_condition(samples: &[&RawWeatherSample]) -> String {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();

    for (index, sample) in samples.iter().enumerate() {
        let entry = counts.entry(sample.condition.as_str()).or_insert((0, index));
        entry.0 += 1;
    }

    counts
        .into_iter()
        .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then(b.1 .1.cmp(&a.1 .1)))
        .map(|(label, _)| label.to_string())
        .unwrap_or_default()
}

/// Maximum precipitation probability for the day, rounded to integer percent
fn max_precipitation_percent(samples: &[&RawWeatherSample]) -> u8 {
    let max_pop = samples
        .iter()
        .map(|s| s.precipitation_probability.unwrap_or(0.0))
        .fold(0.0_f64, f64::max);

    (max_pop * 100.0).round().clamp(0.0, 100.0) as u8
}

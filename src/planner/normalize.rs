//! Conversion of provider payloads into forecast days and ranked attractions

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use crate::models::{Attraction, ForecastDay, Location};
use crate::providers::{ForecastSample, RawForecast, RawPlace};
use crate::{Result, TravelPlannerError};

const DEFAULT_CATEGORY: &str = "Attraction";

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Aggregate sub-daily samples into `days` daily summaries.
///
/// Samples are bucketed by the destination's local calendar day. Fails when
/// the series covers fewer than `days` distinct days.
pub fn daily_forecast(raw: &RawForecast, days: u8) -> Result<Vec<ForecastDay>> {
    let offset = FixedOffset::east_opt(raw.utc_offset_seconds)
        .unwrap_or_else(|| Utc.fix());

    let mut buckets: BTreeMap<NaiveDate, Vec<&ForecastSample>> = BTreeMap::new();
    for sample in &raw.samples {
        let local_date = sample.timestamp.with_timezone(&offset).date_naive();
        buckets.entry(local_date).or_default().push(sample);
    }

    if buckets.len() < usize::from(days) {
        return Err(TravelPlannerError::source_unavailable(
            "weather",
            format!("forecast covers {} of {} days", buckets.len(), days),
        ));
    }

    Ok(buckets
        .into_iter()
        .take(usize::from(days))
        .map(|(date, samples)| summarize_day(date, &samples))
        .collect())
}

fn summarize_day(date: NaiveDate, samples: &[&ForecastSample]) -> ForecastDay {
    let temps = || samples.iter().map(|s| s.temperature);
    let temp_min = temps().fold(f64::INFINITY, f64::min);
    let temp_max = temps().fold(f64::NEG_INFINITY, f64::max);
    let humidity = mean(samples.iter().map(|s| s.humidity)).clamp(0.0, 100.0);

    ForecastDay {
        date,
        temp_avg: round1(mean(temps())),
        temp_min: round1(temp_min),
        temp_max: round1(temp_max),
        description: dominant_description(samples),
        humidity: humidity as u8,
        wind_speed: round1(mean(samples.iter().map(|s| s.wind_speed))),
    }
}

/// Most frequent description; the earliest one wins a tie
fn dominant_description(samples: &[&ForecastSample]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for sample in samples {
        match counts.iter_mut().find(|(d, _)| *d == sample.description) {
            Some((_, count)) => *count += 1,
            None => counts.push((sample.description.as_str(), 1)),
        }
    }
    counts
        .iter()
        .fold(None::<(&str, usize)>, |best, &(d, c)| match best {
            Some((_, best_count)) if best_count >= c => best,
            _ => Some((d, c)),
        })
        .map_or_else(String::new, |(d, _)| d.to_string())
}

/// Turn raw places into attractions: compute distances from `origin`,
/// default missing fields and drop duplicates by name + category.
/// Names are made unique later, in [`rank`].
#[must_use]
pub fn attractions(raw: Vec<RawPlace>, origin: &Location) -> Vec<Attraction> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter_map(|place| {
            let name = place.name.trim().to_string();
            if name.is_empty() {
                return None;
            }
            let category = place
                .category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

            if !seen.insert((name.to_lowercase(), category.to_lowercase())) {
                return None;
            }

            let distance = match (place.latitude, place.longitude) {
                (Some(lat), Some(lon)) => origin.distance_km_to(lat, lon),
                _ => None,
            };

            Some(Attraction {
                name,
                category,
                distance,
                address: place
                    .address
                    .map(|a| a.trim().to_string())
                    .filter(|a| !a.is_empty()),
                rating: place.rating.filter(|r| r.is_finite()),
            })
        })
        .collect()
}

/// Rating descending (missing lowest), then distance ascending (missing last)
fn relevance(a: &Attraction, b: &Attraction) -> Ordering {
    let by_rating = match (a.rating, b.rating) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_rating.then_with(|| match (a.distance, b.distance) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    })
}

/// Sort by relevance, keep one attraction per name and the first `top_n`.
///
/// Same-named places in different categories collapse onto the
/// best-ranked one, so a name never shows up twice in a plan.
#[must_use]
pub fn rank(mut attractions: Vec<Attraction>, top_n: usize) -> Vec<Attraction> {
    attractions.sort_by(relevance);
    let mut seen_names = HashSet::new();
    attractions.retain(|a| seen_names.insert(a.name.to_lowercase()));
    attractions.truncate(top_n);
    attractions
}

//! Distance banding of ranked attractions

use crate::models::{Attraction, DistanceCluster, TravelNotes};

const UNKNOWN_BAND: &str = "Distance unknown";

/// Ordered, mutually exclusive distance bands built from increasing thresholds
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceBands {
    thresholds: Vec<f64>,
}

impl DistanceBands {
    /// Thresholds in km. Non-finite and non-increasing values are skipped.
    #[must_use]
    pub fn new(thresholds: &[f64]) -> Self {
        let mut kept: Vec<f64> = Vec::with_capacity(thresholds.len());
        for &t in thresholds {
            if t.is_finite() && t > 0.0 && kept.last().is_none_or(|&last| t > last) {
                kept.push(t);
            }
        }
        Self { thresholds: kept }
    }

    /// Band index for a distance: one per threshold, then "beyond", then "unknown"
    fn band_of(&self, distance: Option<f64>) -> usize {
        match distance {
            Some(d) if d.is_finite() => self
                .thresholds
                .iter()
                .position(|&t| d <= t)
                .unwrap_or(self.thresholds.len()),
            _ => self.thresholds.len() + 1,
        }
    }

    fn label(&self, band: usize) -> String {
        match (self.thresholds.get(band), self.thresholds.last()) {
            (Some(t), _) => format!("Within {}km", format_km(*t)),
            (None, Some(last)) if band == self.thresholds.len() => {
                format!("Beyond {}km", format_km(*last))
            }
            (None, None) if band == 0 => "All distances".to_string(),
            _ => UNKNOWN_BAND.to_string(),
        }
    }

    /// Partition attractions into bands, nearest first, skipping empty bands.
    ///
    /// Every attraction lands in exactly one band, so the counts always add
    /// up to `total_attractions`.
    #[must_use]
    pub fn cluster(&self, attractions: &[Attraction]) -> TravelNotes {
        let mut bands: Vec<Vec<String>> = vec![Vec::new(); self.thresholds.len() + 2];
        for attraction in attractions {
            bands[self.band_of(attraction.distance)].push(attraction.name.clone());
        }

        let distance_clusters = bands
            .into_iter()
            .enumerate()
            .filter(|(_, names)| !names.is_empty())
            .map(|(band, names)| DistanceCluster {
                cluster_name: self.label(band),
                count: names.len(),
                attractions: names,
            })
            .collect();

        TravelNotes {
            distance_clusters,
            total_attractions: attractions.len(),
        }
    }
}

/// `2.0` -> `"2"`, `2.5` -> `"2.5"`
fn format_km(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

//! Location model for geographic coordinates and metadata

use serde::{Deserialize, Serialize};

/// Coordinates as exposed in the trip JSON
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A resolved city
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// City name as reported by the geocoder
    pub name: String,
    /// Country name, when the geocoder knows it
    pub country: Option<String>,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, name: String) -> Self {
        Self {
            name,
            country: None,
            latitude,
            longitude,
        }
    }

    /// Create location with country
    #[must_use]
    pub fn with_country(latitude: f64, longitude: f64, name: String, country: String) -> Self {
        Self {
            name,
            country: Some(country),
            latitude,
            longitude,
        }
    }

    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.latitude,
            lon: self.longitude,
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Great-circle distance in kilometers to the given point.
    ///
    /// Returns `None` when the point is outside the valid lat/lon range.
    #[must_use]
    pub fn distance_km_to(&self, latitude: f64, longitude: f64) -> Option<f64> {
        if !is_valid_coordinate(latitude, longitude) {
            return None;
        }
        let distance = haversine::distance(
            haversine::Location {
                latitude: self.latitude,
                longitude: self.longitude,
            },
            haversine::Location {
                latitude,
                longitude,
            },
            haversine::Units::Kilometers,
        );
        Some((distance * 100.0).round() / 100.0)
    }
}

fn is_valid_coordinate(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coordinates() {
        let location = Location::new(41.902_782, 12.496_366, "Rome".to_string());
        assert_eq!(location.format_coordinates(), "41.9028, 12.4964");
    }

    #[test]
    fn test_distance_to_nearby_point() {
        let location = Location::new(46.0, 8.0, "Test Center".to_string());
        let distance = location.distance_km_to(46.01, 8.01).unwrap();

        // Roughly 1.36 km
        assert!(distance > 1.0 && distance < 2.0);
        assert_eq!(distance, (distance * 100.0).round() / 100.0);
    }

    #[test]
    fn test_distance_to_same_point_is_zero() {
        let location = Location::new(48.8566, 2.3522, "Paris".to_string());
        assert_eq!(location.distance_km_to(48.8566, 2.3522), Some(0.0));
    }

    #[test]
    fn test_distance_rejects_invalid_coordinates() {
        let location = Location::new(48.8566, 2.3522, "Paris".to_string());
        assert_eq!(location.distance_km_to(91.0, 2.0), None);
        assert_eq!(location.distance_km_to(48.0, f64::NAN), None);
    }
}

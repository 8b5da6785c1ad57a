//! Request validation and day clamping

use crate::cache::trip_key;
use crate::{Result, TravelPlannerError};

const MAX_CITY_CHARS: usize = 100;

/// A validated trip request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripQuery {
    /// City text as typed, trimmed
    pub city: String,
    /// Day count clamped into the supported range
    pub days: u8,
}

impl TripQuery {
    /// Validate the city text and clamp `days` into `min_days..=max_days`.
    ///
    /// Out-of-range day counts are accepted and bounded, never rejected.
    pub fn new(city: &str, days: i64, min_days: u8, max_days: u8) -> Result<Self> {
        let city = city.trim();
        if city.is_empty() {
            return Err(TravelPlannerError::invalid_request("city must not be empty"));
        }
        if city.chars().count() > MAX_CITY_CHARS {
            return Err(TravelPlannerError::invalid_request(format!(
                "city must be at most {MAX_CITY_CHARS} characters"
            )));
        }
        if city.chars().any(char::is_control) {
            return Err(TravelPlannerError::invalid_request(
                "city must not contain control characters",
            ));
        }

        // `max_days` wins if the bounds are inverted
        let clamped = days.max(i64::from(min_days)).min(i64::from(max_days));
        let days = u8::try_from(clamped).unwrap_or(max_days);

        Ok(Self {
            city: city.to_string(),
            days,
        })
    }

    #[must_use]
    pub fn cache_key(&self) -> String {
        trip_key(&self.city, self.days)
    }
}

//! Composed trip plan, the unit returned to callers and stored in the cache

use serde::{Deserialize, Serialize};

use super::{Attraction, Coordinates, ForecastDay, Location, TravelNotes};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TripPlan {
    pub city: String,
    pub country: Option<String>,
    pub coordinates: Coordinates,
    /// Day count after clamping
    pub days: u8,
    pub weather_forecast: Vec<ForecastDay>,
    pub top_attractions: Vec<Attraction>,
    pub travel_notes: TravelNotes,
    /// True iff served from the cache without calling any provider
    pub cached: bool,
}

impl TripPlan {
    /// Plan for a resolved location with every enrichment section empty
    #[must_use]
    pub fn location_only(location: Location, days: u8) -> Self {
        Self {
            coordinates: location.coordinates(),
            city: location.name,
            country: location.country,
            days,
            weather_forecast: Vec::new(),
            top_attractions: Vec::new(),
            travel_notes: TravelNotes::default(),
            cached: false,
        }
    }

    /// Binary form stored in the cache
    pub fn to_bytes(&self) -> crate::Result<Vec<u8>> {
        postcard::to_stdvec(self)
            .map_err(|e| crate::TravelPlannerError::cache(format!("Failed to encode plan: {e}")))
    }

    pub fn from_bytes(bytes: &[u8]) -> crate::Result<Self> {
        postcard::from_bytes(bytes)
            .map_err(|e| crate::TravelPlannerError::cache(format!("Failed to decode plan: {e}")))
    }
}

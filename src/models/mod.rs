//! Data models for the travel planner
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates and metadata
//! - Forecast: Daily weather summaries
//! - Attraction: Points of interest and distance clusters
//! - Trip: The composed plan returned to callers

pub mod attraction;
pub mod forecast;
pub mod location;
pub mod trip;

// Re-export all public types for convenient access
pub use attraction::{Attraction, DistanceCluster, TravelNotes};
pub use forecast::ForecastDay;
pub use location::{Coordinates, Location};
pub use trip::TripPlan;

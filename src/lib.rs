//! `TravelPlanner` - multi-source trip aggregation
//!
//! Resolves a city, fetches weather and nearby attractions from independent
//! providers in parallel, and composes them into one cached trip plan.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod planner;
pub mod providers;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use cache::{CacheStore, DisabledCache, PersistentCache};
pub use config::TravelPlannerConfig;
pub use error::TravelPlannerError;
pub use models::{Attraction, DistanceCluster, ForecastDay, Location, TravelNotes, TripPlan};
pub use planner::{PlannerSettings, TripPlanner};
pub use providers::{Geocoder, PlacesProvider, RawForecast, RawPlace, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TravelPlannerError>;

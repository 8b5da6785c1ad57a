//! Trip aggregation engine
//!
//! A plan is built in one pass: validate the query, try the cache, geocode,
//! fetch weather and places concurrently, then compose and cache the result.
//! Only [`TravelPlannerError::InvalidRequest`] and
//! [`TravelPlannerError::LocationNotFound`] ever reach the caller; provider
//! and cache failures degrade the plan instead.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::cache::{CacheStore, DisabledCache, PersistentCache};
use crate::config::TravelPlannerConfig;
use crate::models::{Location, TripPlan};
use crate::providers::{
    FoursquarePlaces, Geocoder, NominatimGeocoder, OpenWeatherProvider, PlacesProvider, RawForecast,
    RawPlace, WeatherProvider,
};
use crate::{Result, TravelPlannerError};

pub mod clustering;
pub mod normalize;
pub mod outcome;
pub mod query;

pub use clustering::DistanceBands;
pub use outcome::{FailureReason, SourceOutcome};
pub use query::TripQuery;

use outcome::{Composition, supervise};

/// Tunables of the engine
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerSettings {
    pub min_days: u8,
    pub max_days: u8,
    /// Day count used when a caller gives none
    pub default_days: u8,
    pub top_attractions: usize,
    pub distance_thresholds_km: Vec<f64>,
    pub geocode_timeout: Duration,
    pub weather_timeout: Duration,
    pub places_timeout: Duration,
    pub cache_ttl: Duration,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self::from(&TravelPlannerConfig::default())
    }
}

impl From<&TravelPlannerConfig> for PlannerSettings {
    fn from(config: &TravelPlannerConfig) -> Self {
        Self {
            min_days: config.planner.min_days,
            max_days: config.planner.max_days,
            default_days: config.planner.default_days,
            top_attractions: config.planner.top_attractions,
            distance_thresholds_km: config.planner.distance_thresholds_km.clone(),
            geocode_timeout: Duration::from_secs(config.geocoder.timeout_seconds.into()),
            weather_timeout: Duration::from_secs(config.weather.timeout_seconds.into()),
            places_timeout: Duration::from_secs(config.places.timeout_seconds.into()),
            cache_ttl: Duration::from_secs(config.cache.ttl_seconds),
        }
    }
}

pub struct TripPlanner {
    geocoder: Arc<dyn Geocoder>,
    weather: Arc<dyn WeatherProvider>,
    places: Arc<dyn PlacesProvider>,
    cache: Arc<dyn CacheStore>,
    bands: DistanceBands,
    settings: PlannerSettings,
}

impl TripPlanner {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        weather: Arc<dyn WeatherProvider>,
        places: Arc<dyn PlacesProvider>,
        cache: Arc<dyn CacheStore>,
        settings: PlannerSettings,
    ) -> Self {
        Self {
            geocoder,
            weather,
            places,
            cache,
            bands: DistanceBands::new(&settings.distance_thresholds_km),
            settings,
        }
    }

    /// Wire the real providers and the on-disk cache from configuration.
    ///
    /// A cache that cannot be opened is not fatal; the planner then runs
    /// without caching.
    pub fn from_config(config: &TravelPlannerConfig) -> anyhow::Result<Self> {
        let geocoder = Arc::new(NominatimGeocoder::new(&config.geocoder)?);
        let weather = Arc::new(OpenWeatherProvider::new(&config.weather)?);
        let places = Arc::new(FoursquarePlaces::new(&config.places)?);

        let cache: Arc<dyn CacheStore> = if config.cache.enabled {
            let dir = config.cache_directory();
            match PersistentCache::open(&dir) {
                Ok(store) => {
                    info!("Trip cache opened at {}", dir.display());
                    Arc::new(store)
                }
                Err(e) => {
                    warn!("Running without cache: {}", e);
                    Arc::new(DisabledCache)
                }
            }
        } else {
            info!("Trip cache disabled by configuration");
            Arc::new(DisabledCache)
        };

        Ok(Self::new(
            geocoder,
            weather,
            places,
            cache,
            PlannerSettings::from(config),
        ))
    }

    #[must_use]
    pub fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    /// Build the trip plan for `city` over `days` days
    #[instrument(skip(self))]
    pub async fn plan_trip(&self, city: &str, days: i64) -> Result<TripPlan> {
        let query = TripQuery::new(city, days, self.settings.min_days, self.settings.max_days)?;
        let key = query.cache_key();

        if let Some(plan) = self.cached_plan(&key).await {
            info!("Serving {} from cache", key);
            return Ok(plan);
        }

        let location = self.geocode(&query.city).await?;
        debug!(
            "Resolved {} to {} ({})",
            query.city,
            location.name,
            location.format_coordinates()
        );

        let (weather, places) = self.fetch_sources(&location, query.days).await;
        debug!(
            weather_ready = weather.is_ready(),
            places_ready = places.is_ready(),
            "Sources settled"
        );

        let plan = outcome::compose(
            Composition {
                location,
                days: query.days,
                top_attractions: self.settings.top_attractions,
                bands: &self.bands,
            },
            weather,
            places,
        );

        self.store_plan(&key, &plan).await;
        Ok(plan)
    }

    /// Drop the cached plan for `city` and `days`; returns whether the
    /// store accepted the removal
    #[instrument(skip(self))]
    pub async fn invalidate(&self, city: &str, days: i64) -> Result<bool> {
        let query = TripQuery::new(city, days, self.settings.min_days, self.settings.max_days)?;
        match self.cache.remove(&query.cache_key()).await {
            Ok(()) => Ok(true),
            Err(e) => {
                warn!("Failed to invalidate {}: {}", query.cache_key(), e);
                Ok(false)
            }
        }
    }

    async fn cached_plan(&self, key: &str) -> Option<TripPlan> {
        let bytes = match self.cache.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                debug!("Cache read skipped: {}", e);
                return None;
            }
        };

        match TripPlan::from_bytes(&bytes) {
            Ok(mut plan) => {
                plan.cached = true;
                Some(plan)
            }
            Err(e) => {
                warn!("Ignoring unreadable cache entry {}: {}", key, e);
                None
            }
        }
    }

    async fn geocode(&self, city: &str) -> Result<Location> {
        match supervise("geocoder", self.settings.geocode_timeout, self.geocoder.resolve(city)).await
        {
            SourceOutcome::Ready(location) => Ok(location),
            SourceOutcome::Unavailable { reason, .. } => {
                warn!("Geocoding '{}' failed: {}", city, reason);
                Err(TravelPlannerError::location_not_found(city))
            }
        }
    }

    /// Weather and places run as separate tasks; neither cancels the other
    async fn fetch_sources(
        &self,
        location: &Location,
        days: u8,
    ) -> (SourceOutcome<RawForecast>, SourceOutcome<Vec<RawPlace>>) {
        let (latitude, longitude) = (location.latitude, location.longitude);

        let weather_task = {
            let provider = Arc::clone(&self.weather);
            let limit = self.settings.weather_timeout;
            tokio::spawn(async move {
                supervise("weather", limit, provider.forecast(latitude, longitude, days)).await
            })
        };
        let places_task = {
            let provider = Arc::clone(&self.places);
            let limit = self.settings.places_timeout;
            tokio::spawn(async move {
                supervise("places", limit, provider.nearby(latitude, longitude)).await
            })
        };

        let (weather, places) = futures::future::join(weather_task, places_task).await;
        (
            SourceOutcome::from_join("weather", weather),
            SourceOutcome::from_join("places", places),
        )
    }

    async fn store_plan(&self, key: &str, plan: &TripPlan) {
        let result = match plan.to_bytes() {
            Ok(bytes) => self.cache.set(key, bytes, self.settings.cache_ttl).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            warn!("Plan for {} not cached: {}", key, e);
        }
    }
}

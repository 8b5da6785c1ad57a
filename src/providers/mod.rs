//! Third-party data providers
//!
//! Each provider translates one upstream API into the neutral shapes below.
//! Any transport error, non-success status, rate limit or undecodable body
//! is reported as [`TravelPlannerError::SourceUnavailable`], so the planner
//! can treat all of them the same way.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::Location;
use crate::{Result, TravelPlannerError};

pub mod foursquare;
pub mod nominatim;
pub mod openweather;

pub use foursquare::FoursquarePlaces;
pub use nominatim::NominatimGeocoder;
pub use openweather::OpenWeatherProvider;

const USER_AGENT: &str = concat!("TravelPlanner/", env!("CARGO_PKG_VERSION"));

/// Resolves free text to a city location
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Fails with `LocationNotFound` when the city is unknown, and with
    /// `SourceUnavailable` when the lookup itself failed.
    async fn resolve(&self, city: &str) -> Result<Location>;
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn forecast(&self, latitude: f64, longitude: f64, days: u8) -> Result<RawForecast>;
}

#[async_trait]
pub trait PlacesProvider: Send + Sync {
    async fn nearby(&self, latitude: f64, longitude: f64) -> Result<Vec<RawPlace>>;
}

/// One sub-daily forecast sample
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    /// Celsius
    pub temperature: f64,
    /// Percent
    pub humidity: f64,
    /// m/s
    pub wind_speed: f64,
    pub description: String,
}

/// Multi-sample forecast series as delivered by a provider
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawForecast {
    /// Offset of the destination's local time from UTC
    pub utc_offset_seconds: i32,
    pub samples: Vec<ForecastSample>,
}

/// Point of interest as delivered by a provider, before normalization
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawPlace {
    pub name: String,
    pub category: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub rating: Option<f64>,
}

/// Shared HTTP client with request timeout and transient-failure retries
pub fn http_client(timeout: Duration, max_retries: u32) -> anyhow::Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);

    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

/// Sends a GET request and decodes the JSON body, mapping every failure
/// onto `SourceUnavailable` for `provider`.
pub(crate) async fn fetch_json<T: serde::de::DeserializeOwned>(
    provider: &'static str,
    request: reqwest_middleware::RequestBuilder,
) -> Result<T> {
    let response = request.send().await.map_err(|e| {
        TravelPlannerError::source_unavailable(provider, format!("request failed: {e}"))
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(match status.as_u16() {
            401 | 403 => TravelPlannerError::source_unavailable(provider, "invalid or missing API key"),
            429 => TravelPlannerError::source_unavailable(provider, "rate limit exceeded"),
            _ => TravelPlannerError::source_unavailable(provider, format!("HTTP {status}")),
        });
    }

    response.json::<T>().await.map_err(|e| {
        TravelPlannerError::source_unavailable(provider, format!("failed to parse response: {e}"))
    })
}

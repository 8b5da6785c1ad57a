use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use super::{PlacesProvider, RawPlace, fetch_json, http_client};
use crate::config::PlacesConfig;
use crate::{Result, TravelPlannerError};

const PROVIDER: &str = "places";

/// Foursquare Places API client
pub struct FoursquarePlaces {
    client: reqwest_middleware::ClientWithMiddleware,
    api_key: Option<String>,
    api_version: String,
    base_url: String,
    limit: u32,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct Place {
    name: Option<String>,
    #[serde(default)]
    categories: Vec<Category>,
    // Current API version puts coordinates at the top level,
    // older versions under `geocodes.main`.
    latitude: Option<f64>,
    longitude: Option<f64>,
    geocodes: Option<Geocodes>,
    location: Option<PlaceLocation>,
    rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Category {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Geocodes {
    main: Option<Point>,
}

#[derive(Debug, Deserialize)]
struct Point {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct PlaceLocation {
    formatted_address: Option<String>,
}

impl FoursquarePlaces {
    pub fn new(config: &PlacesConfig) -> anyhow::Result<Self> {
        let client = http_client(
            Duration::from_secs(config.timeout_seconds.into()),
            config.max_retries,
        )?;
        Ok(Self {
            client,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            api_version: config.api_version.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            limit: config.result_limit,
        })
    }
}

#[async_trait]
impl PlacesProvider for FoursquarePlaces {
    async fn nearby(&self, latitude: f64, longitude: f64) -> Result<Vec<RawPlace>> {
        let Some(api_key) = &self.api_key else {
            return Err(TravelPlannerError::source_unavailable(
                PROVIDER,
                "Foursquare API key not configured",
            ));
        };

        let url = format!(
            "{}/places/search?ll={},{}&limit={}",
            self.base_url, latitude, longitude, self.limit
        );
        info!(
            "Searching Foursquare places near {:.4}, {:.4}",
            latitude, longitude
        );

        let request = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .header("X-Places-Api-Version", self.api_version.as_str())
            .header("Authorization", format!("Bearer {api_key}"));

        let response: SearchResponse = fetch_json(PROVIDER, request).await?;
        let places: Vec<RawPlace> = response.results.into_iter().map(Place::into_raw).collect();
        info!("Found {} places from Foursquare", places.len());
        Ok(places)
    }
}

impl Place {
    fn into_raw(self) -> RawPlace {
        let (latitude, longitude) = match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => (Some(lat), Some(lon)),
            _ => self
                .geocodes
                .and_then(|g| g.main)
                .map_or((None, None), |p| (Some(p.latitude), Some(p.longitude))),
        };

        RawPlace {
            name: self.name.unwrap_or_default(),
            category: self.categories.into_iter().next().map(|c| c.name),
            latitude,
            longitude,
            address: self.location.and_then(|l| l.formatted_address),
            rating: self.rating,
        }
    }
}

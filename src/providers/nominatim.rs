use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::{Geocoder, fetch_json, http_client};
use crate::config::GeocoderConfig;
use crate::models::Location;
use crate::{Result, TravelPlannerError};

const PROVIDER: &str = "geocoder";

/// OpenStreetMap Nominatim geocoding client
pub struct NominatimGeocoder {
    client: reqwest_middleware::ClientWithMiddleware,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    name: Option<String>,
    display_name: Option<String>,
    address: Option<Address>,
}

#[derive(Debug, Deserialize)]
struct Address {
    country: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> anyhow::Result<Self> {
        let client = http_client(
            Duration::from_secs(config.timeout_seconds.into()),
            config.max_retries,
        )?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, city: &str) -> Result<Location> {
        let url = format!(
            "{}/search?q={}&format=json&limit=1&addressdetails=1",
            self.base_url,
            urlencoding::encode(city)
        );
        debug!("Geocoding city: {}", city);

        let results: Vec<SearchResult> = fetch_json(PROVIDER, self.client.get(&url)).await?;
        let Some(result) = results.into_iter().next() else {
            return Err(TravelPlannerError::location_not_found(city));
        };

        let location = result.into_location(city)?;
        info!(
            "Geocoded {} to ({:.4}, {:.4})",
            location.name, location.latitude, location.longitude
        );
        Ok(location)
    }
}

impl SearchResult {
    fn into_location(self, query: &str) -> Result<Location> {
        let parse = |value: &str| {
            value.parse::<f64>().map_err(|_| {
                TravelPlannerError::source_unavailable(PROVIDER, format!("bad coordinate '{value}'"))
            })
        };
        let latitude = parse(&self.lat)?;
        let longitude = parse(&self.lon)?;

        // `name` is missing on older instances; fall back to the first
        // component of the display name, then to the query itself.
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| {
                self.display_name
                    .as_deref()
                    .and_then(|d| d.split(',').next())
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or_else(|| query.trim().to_string());

        let country = self
            .address
            .and_then(|a| a.country)
            .filter(|c| !c.trim().is_empty());

        Ok(Location {
            name,
            country,
            latitude,
            longitude,
        })
    }
}

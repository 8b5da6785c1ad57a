//! OpenWeatherMap 5 day / 3 hour forecast client

use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use super::{ForecastSample, RawForecast, WeatherProvider, fetch_json, http_client};
use crate::config::WeatherConfig;
use crate::{Result, TravelPlannerError};

const PROVIDER: &str = "weather";

pub struct OpenWeatherProvider {
    client: reqwest_middleware::ClientWithMiddleware,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastItem>,
    city: Option<CityInfo>,
}

#[derive(Debug, Deserialize)]
struct CityInfo {
    /// Shift in seconds from UTC
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct ForecastItem {
    dt: i64,
    main: MainReadings,
    #[serde(default)]
    weather: Vec<Condition>,
    wind: Option<Wind>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

impl OpenWeatherProvider {
    pub fn new(config: &WeatherConfig) -> anyhow::Result<Self> {
        let client = http_client(
            Duration::from_secs(config.timeout_seconds.into()),
            config.max_retries,
        )?;
        Ok(Self {
            client,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn forecast(&self, latitude: f64, longitude: f64, days: u8) -> Result<RawForecast> {
        let Some(api_key) = &self.api_key else {
            return Err(TravelPlannerError::source_unavailable(
                PROVIDER,
                "OpenWeatherMap API key not configured",
            ));
        };

        let url = format!(
            "{}/forecast?lat={}&lon={}&appid={}&units=metric",
            self.base_url,
            latitude,
            longitude,
            urlencoding::encode(api_key)
        );
        info!(
            "Fetching {}-day forecast from OpenWeatherMap for {:.4}, {:.4}",
            days, latitude, longitude
        );

        let response: ForecastResponse = fetch_json(PROVIDER, self.client.get(&url)).await?;
        Ok(response.into_raw())
    }
}

impl ForecastResponse {
    fn into_raw(self) -> RawForecast {
        let utc_offset_seconds = self.city.map_or(0, |c| c.timezone);
        let samples = self
            .list
            .into_iter()
            .filter_map(|item| {
                let timestamp = DateTime::from_timestamp(item.dt, 0)?;
                let description = item
                    .weather
                    .into_iter()
                    .next()
                    .map_or_else(|| "unknown".to_string(), |c| c.description);
                Some(ForecastSample {
                    timestamp,
                    temperature: item.main.temp,
                    humidity: item.main.humidity,
                    wind_speed: item.wind.map_or(0.0, |w| w.speed),
                    description,
                })
            })
            .collect();

        RawForecast {
            utc_offset_seconds,
            samples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TravelPlannerConfig;
    use serde_json::json;

    #[test]
    fn test_response_conversion() {
        let raw = json!({
            "list": [
                {
                    "dt": 1_767_268_800,
                    "main": { "temp": 11.5, "humidity": 70 },
                    "weather": [{ "description": "light rain" }],
                    "wind": { "speed": 4.1 }
                },
                {
                    "dt": 1_767_279_600,
                    "main": { "temp": 13.0, "humidity": 64 },
                    "weather": []
                }
            ],
            "city": { "name": "Rome", "timezone": 3600 }
        });
        let response: ForecastResponse = serde_json::from_value(raw).unwrap();
        let forecast = response.into_raw();

        assert_eq!(forecast.utc_offset_seconds, 3600);
        assert_eq!(forecast.samples.len(), 2);
        assert_eq!(forecast.samples[0].description, "light rain");
        assert_eq!(forecast.samples[0].wind_speed, 4.1);
        assert_eq!(forecast.samples[1].description, "unknown");
        assert_eq!(forecast.samples[1].wind_speed, 0.0);
    }

    #[tokio::test]
    async fn test_missing_api_key_is_unavailable() {
        let config = TravelPlannerConfig::default();
        let provider = OpenWeatherProvider::new(&config.weather).unwrap();

        let err = provider.forecast(41.9, 12.5, 3).await.unwrap_err();
        assert!(matches!(err, TravelPlannerError::SourceUnavailable { .. }));
    }
}

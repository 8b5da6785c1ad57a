//! Configuration management for the travel planner
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TravelPlannerError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TravelPlannerConfig {
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub places: PlacesConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Nominatim geocoder settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    #[serde(default = "default_geocoder_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// OpenWeatherMap settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Falls back to `OPENWEATHER_API_KEY` when unset
    pub api_key: Option<String>,
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Foursquare Places settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesConfig {
    /// Falls back to `FOURSQUARE_API_KEY` when unset
    pub api_key: Option<String>,
    #[serde(default = "default_places_base_url")]
    pub base_url: String,
    #[serde(default = "default_places_api_version")]
    pub api_version: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Number of places requested per search
    #[serde(default = "default_places_limit")]
    pub result_limit: u32,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Entry lifetime in seconds
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,
    /// Cache directory; empty means the platform cache dir
    #[serde(default)]
    pub location: String,
}

/// Trip assembly settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default = "default_min_days")]
    pub min_days: u8,
    #[serde(default = "default_max_days")]
    pub max_days: u8,
    /// Used by the HTTP surface when `days` is omitted
    #[serde(default = "default_days")]
    pub default_days: u8,
    #[serde(default = "default_top_attractions")]
    pub top_attractions: usize,
    /// Upper bounds of the distance bands, strictly increasing
    #[serde(default = "default_distance_thresholds")]
    pub distance_thresholds_km: Vec<f64>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

// Default value functions
fn default_geocoder_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_places_base_url() -> String {
    "https://places-api.foursquare.com".to_string()
}

fn default_places_api_version() -> String {
    "2025-06-17".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_max_retries() -> u32 {
    2
}

fn default_places_limit() -> u32 {
    20
}

fn default_true() -> bool {
    true
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_min_days() -> u8 {
    1
}

fn default_max_days() -> u8 {
    5
}

fn default_days() -> u8 {
    3
}

fn default_top_attractions() -> usize {
    10
}

fn default_distance_thresholds() -> Vec<f64> {
    vec![2.0, 5.0, 10.0]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_base_url(),
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_places_base_url(),
            api_version: default_places_api_version(),
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            result_limit: default_places_limit(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: default_cache_ttl(),
            location: String::new(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            min_days: default_min_days(),
            max_days: default_max_days(),
            default_days: default_days(),
            top_attractions: default_top_attractions(),
            distance_thresholds_km: default_distance_thresholds(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl TravelPlannerConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // e.g. TRAVELPLANNER_CACHE__TTL_SECONDS=600
        builder = builder.add_source(
            Environment::with_prefix("TRAVELPLANNER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("planner.distance_thresholds_km"),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TravelPlannerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_api_key_fallbacks();
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the configuration file path: `TRAVELPLANNER_CONFIG`, else the
    /// platform config directory.
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("TRAVELPLANNER_CONFIG") {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("travelplanner").join("config.toml"))
    }

    /// Read the provider keys from their conventional variables when the
    /// config does not set them
    fn apply_api_key_fallbacks(&mut self) {
        if self.weather.api_key.is_none() {
            self.weather.api_key = std::env::var("OPENWEATHER_API_KEY").ok();
        }
        if self.places.api_key.is_none() {
            self.places.api_key = std::env::var("FOURSQUARE_API_KEY").ok();
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        for timeout in [
            &mut self.geocoder.timeout_seconds,
            &mut self.weather.timeout_seconds,
            &mut self.places.timeout_seconds,
        ] {
            if *timeout == 0 {
                *timeout = default_timeout();
            }
        }
        if self.geocoder.base_url.is_empty() {
            self.geocoder.base_url = default_geocoder_base_url();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.places.base_url.is_empty() {
            self.places.base_url = default_places_base_url();
        }
        if self.cache.ttl_seconds == 0 {
            self.cache.ttl_seconds = default_cache_ttl();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_distance_thresholds()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Keys are optional, but a configured key must not be blank
    pub fn validate_api_keys(&self) -> Result<()> {
        for (name, key) in [
            ("Weather", &self.weather.api_key),
            ("Places", &self.places.api_key),
        ] {
            if let Some(key) = key
                && key.trim().is_empty()
            {
                return Err(TravelPlannerError::config(format!(
                    "{name} API key cannot be empty if provided. Either remove it or provide a valid key."
                ))
                .into());
            }
        }
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        for (name, timeout) in [
            ("Geocoder", self.geocoder.timeout_seconds),
            ("Weather", self.weather.timeout_seconds),
            ("Places", self.places.timeout_seconds),
        ] {
            if timeout > 300 {
                return Err(TravelPlannerError::config(format!(
                    "{name} timeout cannot exceed 300 seconds"
                ))
                .into());
            }
        }

        for retries in [
            self.geocoder.max_retries,
            self.weather.max_retries,
            self.places.max_retries,
        ] {
            if retries > 10 {
                return Err(TravelPlannerError::config("Max retries cannot exceed 10").into());
            }
        }

        if self.cache.ttl_seconds > 7 * 24 * 3600 {
            return Err(TravelPlannerError::config(
                "Cache TTL cannot exceed 604800 seconds (1 week)",
            )
            .into());
        }

        let planner = &self.planner;
        if planner.min_days == 0 || planner.min_days > planner.max_days {
            return Err(TravelPlannerError::config(
                "Day range must satisfy 1 <= min_days <= max_days",
            )
            .into());
        }
        if planner.max_days > 16 {
            return Err(TravelPlannerError::config("max_days cannot exceed 16").into());
        }
        if !(planner.min_days..=planner.max_days).contains(&planner.default_days) {
            return Err(TravelPlannerError::config(
                "default_days must lie within min_days..=max_days",
            )
            .into());
        }
        if planner.top_attractions == 0 || planner.top_attractions > 50 {
            return Err(
                TravelPlannerError::config("top_attractions must be between 1 and 50").into(),
            );
        }
        if self.places.result_limit == 0 || self.places.result_limit > 50 {
            return Err(
                TravelPlannerError::config("Places result_limit must be between 1 and 50").into(),
            );
        }

        Ok(())
    }

    fn validate_distance_thresholds(&self) -> Result<()> {
        let thresholds = &self.planner.distance_thresholds_km;
        if thresholds.is_empty() {
            return Err(
                TravelPlannerError::config("At least one distance threshold is required").into(),
            );
        }
        if thresholds.iter().any(|t| !t.is_finite() || *t <= 0.0) {
            return Err(TravelPlannerError::config(
                "Distance thresholds must be positive numbers",
            )
            .into());
        }
        if thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TravelPlannerError::config(
                "Distance thresholds must be strictly increasing",
            )
            .into());
        }
        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TravelPlannerError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TravelPlannerError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Geocoder", &self.geocoder.base_url),
            ("Weather", &self.weather.base_url),
            ("Places", &self.places.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(TravelPlannerError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Directory of the persistent cache, `~/` expanded
    #[must_use]
    pub fn cache_directory(&self) -> PathBuf {
        let location = self.cache.location.trim();
        if location.is_empty() {
            return dirs::cache_dir()
                .map(|dir| dir.join("travelplanner"))
                .unwrap_or_else(|| PathBuf::from(".cache/travelplanner"));
        }
        if let Some(rest) = location.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return home.join(rest);
        }
        PathBuf::from(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TravelPlannerConfig::default();
        assert_eq!(config.geocoder.base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.weather.timeout_seconds, 10);
        assert_eq!(config.cache.ttl_seconds, 3600);
        assert_eq!(config.planner.max_days, 5);
        assert_eq!(config.planner.top_attractions, 10);
        assert_eq!(config.planner.distance_thresholds_km, vec![2.0, 5.0, 10.0]);
        assert_eq!(config.server.port, 8000);
        assert!(config.weather.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_empty_api_key() {
        let mut config = TravelPlannerConfig::default();
        config.places.api_key = Some("  ".to_string());
        let result = config.validate_api_keys();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = TravelPlannerConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = TravelPlannerConfig::default();
        config.weather.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_day_range() {
        let mut config = TravelPlannerConfig::default();
        config.planner.min_days = 4;
        config.planner.max_days = 2;
        assert!(config.validate().is_err());

        let mut config = TravelPlannerConfig::default();
        config.planner.default_days = 9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_thresholds() {
        let mut config = TravelPlannerConfig::default();
        config.planner.distance_thresholds_km = vec![5.0, 2.0];
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("strictly increasing"));

        config.planner.distance_thresholds_km = vec![];
        assert!(config.validate().is_err());

        config.planner.distance_thresholds_km = vec![-1.0, 3.0];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_fills_zero_values() {
        let mut config = TravelPlannerConfig::default();
        config.places.timeout_seconds = 0;
        config.cache.ttl_seconds = 0;
        config.logging.format = String::new();
        config.apply_defaults();

        assert_eq!(config.places.timeout_seconds, 10);
        assert_eq!(config.cache.ttl_seconds, 3600);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[weather]
api_key = "owm_test_key"
timeout_seconds = 4

[planner]
max_days = 7
top_attractions = 5
distance_thresholds_km = [1.0, 3.0]

[cache]
ttl_seconds = 120
"#
        )
        .unwrap();

        let config = TravelPlannerConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();

        assert_eq!(config.weather.api_key.as_deref(), Some("owm_test_key"));
        assert_eq!(config.weather.timeout_seconds, 4);
        assert_eq!(config.planner.max_days, 7);
        assert_eq!(config.planner.top_attractions, 5);
        assert_eq!(config.planner.distance_thresholds_km, vec![1.0, 3.0]);
        assert_eq!(config.cache.ttl_seconds, 120);
        // untouched sections keep their defaults
        assert_eq!(config.geocoder.timeout_seconds, 10);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_cache_directory_resolution() {
        let mut config = TravelPlannerConfig::default();
        config.cache.location = "/var/cache/trips".to_string();
        assert_eq!(config.cache_directory(), PathBuf::from("/var/cache/trips"));

        config.cache.location = String::new();
        assert!(config.cache_directory().ends_with("travelplanner"));
    }
}

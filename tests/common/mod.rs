#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use travelplanner::providers::ForecastSample;
use travelplanner::{
    CacheStore, Geocoder, Location, PlacesProvider, PlannerSettings, RawForecast, RawPlace,
    Result, TravelPlannerError, TripPlanner, WeatherProvider,
};

/// How a fake provider behaves
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Ok,
    Fail,
    Hang,
}

pub struct FakeGeocoder {
    pub mode: Mode,
    pub calls: AtomicUsize,
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn resolve(&self, city: &str) -> Result<Location> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            Mode::Ok => {}
            Mode::Fail => {
                return Err(TravelPlannerError::source_unavailable("geocoder", "HTTP 503"));
            }
            Mode::Hang => tokio::time::sleep(Duration::from_secs(3600)).await,
        }
        match city.to_lowercase().as_str() {
            "rome" => Ok(Location::with_country(
                41.8933,
                12.4829,
                "Roma".to_string(),
                "Italia".to_string(),
            )),
            "paris" => Ok(Location::with_country(
                48.8566,
                2.3522,
                "Paris".to_string(),
                "France".to_string(),
            )),
            _ => Err(TravelPlannerError::location_not_found(city)),
        }
    }
}

pub struct FakeWeather {
    pub mode: Mode,
    pub calls: AtomicUsize,
    pub completed: AtomicUsize,
}

#[async_trait]
impl WeatherProvider for FakeWeather {
    async fn forecast(&self, _latitude: f64, _longitude: f64, _days: u8) -> Result<RawForecast> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = match self.mode {
            Mode::Ok => Ok(five_day_forecast()),
            Mode::Fail => Err(TravelPlannerError::source_unavailable("weather", "HTTP 500")),
            Mode::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(five_day_forecast())
            }
        };
        self.completed.fetch_add(1, Ordering::SeqCst);
        result
    }
}

pub struct FakePlaces {
    pub mode: Mode,
    pub delay: Duration,
    pub calls: AtomicUsize,
    pub completed: AtomicUsize,
}

#[async_trait]
impl PlacesProvider for FakePlaces {
    async fn nearby(&self, _latitude: f64, _longitude: f64) -> Result<Vec<RawPlace>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let result = match self.mode {
            Mode::Ok => Ok(rome_places()),
            Mode::Fail => Err(TravelPlannerError::source_unavailable("places", "rate limit exceeded")),
            Mode::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(Vec::new())
            }
        };
        self.completed.fetch_add(1, Ordering::SeqCst);
        result
    }
}

/// In-memory store; `down` makes every call fail
#[derive(Default)]
pub struct MemoryStore {
    pub entries: Mutex<HashMap<String, Vec<u8>>>,
    pub writes: AtomicUsize,
    pub down: bool,
}

impl MemoryStore {
    fn check(&self) -> Result<()> {
        if self.down {
            Err(TravelPlannerError::cache("connection refused"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.check()?;
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>, _ttl: Duration) -> Result<()> {
        self.check()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.check()?;
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Handles to every fake so tests can inspect call counts
pub struct Harness {
    pub geocoder: Arc<FakeGeocoder>,
    pub weather: Arc<FakeWeather>,
    pub places: Arc<FakePlaces>,
    pub store: Arc<MemoryStore>,
    pub planner: TripPlanner,
}

pub struct HarnessBuilder {
    geocoder: Mode,
    weather: Mode,
    places: Mode,
    places_delay: Duration,
    store: MemoryStore,
    store_override: Option<Arc<dyn CacheStore>>,
    settings: PlannerSettings,
}

impl Default for HarnessBuilder {
    fn default() -> Self {
        Self {
            geocoder: Mode::Ok,
            weather: Mode::Ok,
            places: Mode::Ok,
            places_delay: Duration::ZERO,
            store: MemoryStore::default(),
            store_override: None,
            settings: PlannerSettings::default(),
        }
    }
}

impl HarnessBuilder {
    pub fn geocoder(mut self, mode: Mode) -> Self {
        self.geocoder = mode;
        self
    }

    pub fn weather(mut self, mode: Mode) -> Self {
        self.weather = mode;
        self
    }

    pub fn places(mut self, mode: Mode) -> Self {
        self.places = mode;
        self
    }

    pub fn places_delay(mut self, delay: Duration) -> Self {
        self.places_delay = delay;
        self
    }

    pub fn cache_down(mut self) -> Self {
        self.store.down = true;
        self
    }

    pub fn cache(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store_override = Some(store);
        self
    }

    pub fn timeouts(mut self, limit: Duration) -> Self {
        self.settings.geocode_timeout = limit;
        self.settings.weather_timeout = limit;
        self.settings.places_timeout = limit;
        self
    }

    pub fn build(self) -> Harness {
        let geocoder = Arc::new(FakeGeocoder {
            mode: self.geocoder,
            calls: AtomicUsize::new(0),
        });
        let weather = Arc::new(FakeWeather {
            mode: self.weather,
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        });
        let places = Arc::new(FakePlaces {
            mode: self.places,
            delay: self.places_delay,
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        });
        let store = Arc::new(self.store);
        let cache: Arc<dyn CacheStore> = match self.store_override {
            Some(cache) => cache,
            None => store.clone() as Arc<dyn CacheStore>,
        };

        let planner = TripPlanner::new(
            geocoder.clone(),
            weather.clone(),
            places.clone(),
            cache,
            self.settings,
        );

        Harness {
            geocoder,
            weather,
            places,
            store,
            planner,
        }
    }
}

impl Harness {
    pub fn provider_calls(&self) -> usize {
        self.geocoder.calls.load(Ordering::SeqCst)
            + self.weather.calls.load(Ordering::SeqCst)
            + self.places.calls.load(Ordering::SeqCst)
    }
}

// 2026-05-01T00:00:00Z
const DAY0: i64 = 1_777_593_600;

/// Five full days of 3-hourly samples in UTC
pub fn five_day_forecast() -> RawForecast {
    let samples = (0..40)
        .map(|i| ForecastSample {
            timestamp: DateTime::from_timestamp(DAY0 + i * 3 * 3600, 0).unwrap(),
            temperature: 15.0 + (i % 8) as f64,
            humidity: 60.0,
            wind_speed: 3.5,
            description: if i % 8 < 5 { "clear sky" } else { "few clouds" }.to_string(),
        })
        .collect();
    RawForecast {
        utc_offset_seconds: 0,
        samples,
    }
}

pub fn rome_places() -> Vec<RawPlace> {
    let place = |name: &str, category: &str, lat: f64, lon: f64, rating: Option<f64>| RawPlace {
        name: name.to_string(),
        category: Some(category.to_string()),
        latitude: Some(lat),
        longitude: Some(lon),
        address: None,
        rating,
    };
    vec![
        place("Colosseo", "Monument", 41.8902, 12.4922, Some(9.6)),
        place("Pantheon", "Monument", 41.8986, 12.4769, Some(9.5)),
        place("Musei Vaticani", "Museum", 41.9065, 12.4536, Some(9.4)),
        place("Villa Adriana", "Park", 41.9420, 12.7740, Some(9.0)),
        place("Ostia Antica", "Historic Site", 41.7558, 12.2923, None),
        // duplicate of the first entry
        place("colosseo", "monument", 41.8902, 12.4922, Some(1.0)),
        // same name, different category, far from the centre
        place("Colosseo", "Metro Station", 41.7700, 12.6500, Some(7.0)),
        RawPlace {
            name: "Street Food Tour".to_string(),
            ..Default::default()
        },
    ]
}

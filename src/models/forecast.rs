//! Daily forecast model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Weather summary for one calendar day at the destination
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastDay {
    pub date: NaiveDate,
    /// Mean of the day's samples in Celsius
    pub temp_avg: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Most frequent sample description
    pub description: String,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Wind speed in m/s
    pub wind_speed: f64,
}


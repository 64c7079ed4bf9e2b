use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current conditions as returned by OpenWeather, untouched.
///
/// Temperatures are Kelvin, pressure is hPa and humidity is a percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainConditions {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: i64,
    pub humidity: i64,
}

/// One entry of the upstream `weather[]` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: i64,
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// Snapshot of one successful lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    pub name: String,
    pub main: MainConditions,
    pub weather: Vec<Condition>,
    /// Observation time, unix seconds.
    #[serde(default)]
    pub dt: Option<i64>,
}

impl WeatherData {
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        self.dt.and_then(|ts| DateTime::from_timestamp(ts, 0))
    }
}

/// Error payload OpenWeather sends with non-2xx statuses.
///
/// `cod` arrives as a string for some errors and as a number for others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub cod: serde_json::Value,
    pub message: String,
}

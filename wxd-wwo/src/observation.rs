//! Flat rows produced by the record extractor and persisted by the store.
//!
//! Every row carries its natural key: a location key plus a `datetime`.
//! Daily rows sit at midnight; hourly rows carry the hour. The forecast
//! "current" row carries the provider's local time, minutes included.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Which pair of collections a batch belongs to.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Historical,
    Forecast,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Historical => "historical",
            Mode::Forecast => "forecast",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A past day for one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalDaily {
    pub city: String,
    pub datetime: NaiveDateTime,
    pub sunrise: String,
    pub sunset: String,
    pub moonrise: String,
    pub moonset: String,
    pub moon_phase: String,
    pub moon_illumination: i32,
    pub max_temp_c: i32,
    pub max_temp_f: i32,
    pub min_temp_c: i32,
    pub min_temp_f: i32,
    pub avg_temp_c: i32,
    pub avg_temp_f: i32,
    pub total_snow_cm: f64,
    pub sun_hour: f64,
    pub uv_index: i32,
}

/// A past hour for one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalHourly {
    pub city: String,
    pub datetime: NaiveDateTime,
    pub temp_c: i32,
    pub temp_f: i32,
    pub windspeed_miles: i32,
    pub windspeed_kmph: i32,
    pub winddir_degree: i32,
    pub winddir16_point: String,
    pub weather_desc: String,
    pub precip_mm: f64,
    pub precip_inches: f64,
    pub humidity: i32,
    pub visibility: i32,
    pub visibility_miles: i32,
    pub cloudcover: i32,
    pub uv_index: i32,
}

/// A forecast day. Temperatures are display strings: `"low ~ high"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDaily {
    pub location: String,
    pub datetime: NaiveDateTime,
    pub sunrise: String,
    pub sunset: String,
    pub moonrise: String,
    pub moonset: String,
    pub moon_phase: String,
    pub moon_illumination: i32,
    pub temp_c: String,
    pub temp_f: String,
    pub sun_hour: f64,
    pub uv_index: i32,
}

/// A forecast hour, or the live observation when `current` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastHourly {
    pub location: String,
    pub datetime: NaiveDateTime,
    pub current: bool,
    pub temp_c: i32,
    pub temp_f: i32,
    pub precip_mm: f64,
    pub uv_index: i32,
}

/// Daily and hourly rows extracted from one historical ingestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalBatch {
    pub daily: Vec<HistoricalDaily>,
    pub hourly: Vec<HistoricalHourly>,
}

/// Daily and hourly rows extracted from one forecast call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastBatch {
    pub daily: Vec<ForecastDaily>,
    pub hourly: Vec<ForecastHourly>,
}

impl ForecastBatch {
    /// The live observation row, if the batch has one.
    pub fn current(&self) -> Option<&ForecastHourly> {
        self.hourly.iter().find(|row| row.current)
    }
}

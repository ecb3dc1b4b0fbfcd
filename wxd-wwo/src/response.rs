//! Typed view of the World Weather Online JSON payload.
//!
//! Only the parts that feed persistence are modelled. The provider encodes
//! most numbers as strings (`"maxtempC": "8"`), so numeric fields go through
//! [`number`] / [`optional_number`] and fail at the parse boundary when a
//! value is not numeric.
//!
//! Fields only the historical endpoint needs are optional here; the
//! historical extractor insists on them.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Display;
use std::str::FromStr;

/// Top-level envelope: `{"data": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct WwoResponse {
    pub data: WwoData,
}

impl WwoResponse {
    /// How the provider resolved the query, e.g.
    /// `"City: Providence, United States of America"`.
    pub fn resolved_query(&self) -> Option<String> {
        self.data.request.first().map(|request| {
            if request.kind.is_empty() {
                request.query.clone()
            } else {
                format!("{}: {}", request.kind, request.query)
            }
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WwoData {
    #[serde(default)]
    pub request: Vec<RequestInfo>,
    #[serde(default)]
    pub weather: Vec<DayWeather>,
    #[serde(default)]
    pub current_condition: Vec<CurrentCondition>,
    #[serde(default)]
    pub time_zone: Vec<TimeZone>,
    /// Present when the provider rejects the request with a 200 status.
    #[serde(default)]
    pub error: Vec<TextValue>,
}

/// Echo of the resolved query, e.g. `"Providence, United States of America"`.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestInfo {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub query: String,
}

/// `{"value": "..."}` wrapper used for descriptions; error messages use `msg`.
#[derive(Debug, Clone, Deserialize)]
pub struct TextValue {
    #[serde(alias = "msg")]
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Astronomy {
    pub sunrise: String,
    pub sunset: String,
    pub moonrise: String,
    pub moonset: String,
    pub moon_phase: String,
    #[serde(deserialize_with = "number")]
    pub moon_illumination: i32,
}

/// One element of `data.weather[]`.
#[derive(Debug, Clone, Deserialize)]
pub struct DayWeather {
    pub date: String,
    #[serde(default)]
    pub astronomy: Vec<Astronomy>,
    #[serde(rename = "maxtempC", deserialize_with = "number")]
    pub max_temp_c: i32,
    #[serde(rename = "maxtempF", deserialize_with = "number")]
    pub max_temp_f: i32,
    #[serde(rename = "mintempC", deserialize_with = "number")]
    pub min_temp_c: i32,
    #[serde(rename = "mintempF", deserialize_with = "number")]
    pub min_temp_f: i32,
    #[serde(rename = "avgtempC", default, deserialize_with = "optional_number")]
    pub avg_temp_c: Option<i32>,
    #[serde(rename = "avgtempF", default, deserialize_with = "optional_number")]
    pub avg_temp_f: Option<i32>,
    #[serde(rename = "totalSnow_cm", default, deserialize_with = "optional_number")]
    pub total_snow_cm: Option<f64>,
    #[serde(rename = "sunHour", deserialize_with = "number")]
    pub sun_hour: f64,
    #[serde(rename = "uvIndex", deserialize_with = "number")]
    pub uv_index: i32,
    #[serde(default)]
    pub hourly: Vec<HourWeather>,
}

/// One element of `data.weather[].hourly[]`.
#[derive(Debug, Clone, Deserialize)]
pub struct HourWeather {
    #[serde(rename = "tempC", deserialize_with = "number")]
    pub temp_c: i32,
    #[serde(rename = "tempF", deserialize_with = "number")]
    pub temp_f: i32,
    #[serde(rename = "precipMM", deserialize_with = "number")]
    pub precip_mm: f64,
    #[serde(rename = "uvIndex", deserialize_with = "number")]
    pub uv_index: i32,
    #[serde(rename = "windspeedMiles", default, deserialize_with = "optional_number")]
    pub windspeed_miles: Option<i32>,
    #[serde(rename = "windspeedKmph", default, deserialize_with = "optional_number")]
    pub windspeed_kmph: Option<i32>,
    #[serde(rename = "winddirDegree", default, deserialize_with = "optional_number")]
    pub winddir_degree: Option<i32>,
    #[serde(rename = "winddir16Point", default)]
    pub winddir16_point: Option<String>,
    #[serde(rename = "weatherDesc", default)]
    pub weather_desc: Vec<TextValue>,
    #[serde(rename = "precipInches", default, deserialize_with = "optional_number")]
    pub precip_inches: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub humidity: Option<i32>,
    #[serde(default, deserialize_with = "optional_number")]
    pub visibility: Option<i32>,
    #[serde(rename = "visibilityMiles", default, deserialize_with = "optional_number")]
    pub visibility_miles: Option<i32>,
    #[serde(default, deserialize_with = "optional_number")]
    pub cloudcover: Option<i32>,
}

/// `data.current_condition[0]`: the live observation.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentCondition {
    #[serde(rename = "temp_C", deserialize_with = "number")]
    pub temp_c: i32,
    #[serde(rename = "temp_F", deserialize_with = "number")]
    pub temp_f: i32,
    #[serde(rename = "precipMM", deserialize_with = "number")]
    pub precip_mm: f64,
    #[serde(rename = "uvIndex", deserialize_with = "number")]
    pub uv_index: i32,
}

/// `data.time_zone[0]`, only returned with `showlocaltime=yes`.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeZone {
    pub localtime: String,
}

/// Accept a JSON string or number and parse it into `T`.
pub(crate) fn number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => s.trim().parse().map_err(de::Error::custom),
        Value::Number(n) => n.to_string().parse().map_err(de::Error::custom),
        other => Err(de::Error::custom(format!(
            "expected a number, found {other}"
        ))),
    }
}

/// Like [`number`], but missing, null and blank values become `None`.
pub(crate) fn optional_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(value) => number(value).map(Some).map_err(de::Error::custom),
    }
}

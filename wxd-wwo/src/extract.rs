//! Flatten provider responses into daily and hourly rows.
//!
//! Historical: one call per date, one daily row per date, one hourly row per
//! hourly entry. Forecast: one call for all days; the hourly list opens with
//! the live condition (`current = true`) and continues from the hour after
//! the provider's local hour until the hour budget runs out. Days past the
//! budget still produce daily rows.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use log::{debug, info};
use wxd_utils::dates::{parse_local_time, DATE_FORMAT};

use crate::client::WwoClient;
use crate::error::RequestError;
use crate::observation::{
    ForecastBatch, ForecastDaily, ForecastHourly, HistoricalBatch, HistoricalDaily,
    HistoricalHourly,
};
use crate::response::{Astronomy, DayWeather, WwoResponse};

fn required<T>(value: Option<T>, field: &str) -> Result<T, RequestError> {
    value.ok_or_else(|| RequestError::malformed(format!("missing field `{field}`")))
}

fn astronomy(day: &DayWeather) -> Result<&Astronomy, RequestError> {
    day.astronomy
        .first()
        .ok_or_else(|| RequestError::malformed(format!("no astronomy for {}", day.date)))
}

fn parse_day(day: &DayWeather) -> Result<NaiveDate, RequestError> {
    NaiveDate::parse_from_str(day.date.trim(), DATE_FORMAT)
        .map_err(|e| RequestError::malformed(format!("bad date {:?}: {e}", day.date)))
}

fn hour_of(date: NaiveDate, hour: usize) -> Result<NaiveDateTime, RequestError> {
    u32::try_from(hour)
        .ok()
        .and_then(|h| date.and_hms_opt(h, 0, 0))
        .ok_or_else(|| {
            RequestError::malformed(format!("hourly entry {hour} out of range for {date}"))
        })
}

/// Flatten the response for a single historical date.
///
/// Rows are keyed by `location` and the requested `date`, not by the
/// provider's echo of the query.
pub fn extract_historical_day(
    location: &str,
    date: NaiveDate,
    response: &WwoResponse,
) -> Result<(HistoricalDaily, Vec<HistoricalHourly>), RequestError> {
    let day = response
        .data
        .weather
        .first()
        .ok_or_else(|| RequestError::malformed(format!("no weather returned for {date}")))?;
    let astro = astronomy(day)?;

    let daily = HistoricalDaily {
        city: location.to_string(),
        datetime: date.and_time(NaiveTime::MIN),
        sunrise: astro.sunrise.clone(),
        sunset: astro.sunset.clone(),
        moonrise: astro.moonrise.clone(),
        moonset: astro.moonset.clone(),
        moon_phase: astro.moon_phase.clone(),
        moon_illumination: astro.moon_illumination,
        max_temp_c: day.max_temp_c,
        max_temp_f: day.max_temp_f,
        min_temp_c: day.min_temp_c,
        min_temp_f: day.min_temp_f,
        avg_temp_c: required(day.avg_temp_c, "avgtempC")?,
        avg_temp_f: required(day.avg_temp_f, "avgtempF")?,
        total_snow_cm: required(day.total_snow_cm, "totalSnow_cm")?,
        sun_hour: day.sun_hour,
        uv_index: day.uv_index,
    };

    let mut hourly = Vec::with_capacity(day.hourly.len());
    for (hour, entry) in day.hourly.iter().enumerate() {
        let weather_desc = entry
            .weather_desc
            .first()
            .map(|d| d.value.clone())
            .ok_or_else(|| RequestError::malformed("missing field `weatherDesc`"))?;
        hourly.push(HistoricalHourly {
            city: location.to_string(),
            datetime: hour_of(date, hour)?,
            temp_c: entry.temp_c,
            temp_f: entry.temp_f,
            windspeed_miles: required(entry.windspeed_miles, "windspeedMiles")?,
            windspeed_kmph: required(entry.windspeed_kmph, "windspeedKmph")?,
            winddir_degree: required(entry.winddir_degree, "winddirDegree")?,
            winddir16_point: required(entry.winddir16_point.clone(), "winddir16Point")?,
            weather_desc,
            precip_mm: entry.precip_mm,
            precip_inches: required(entry.precip_inches, "precipInches")?,
            humidity: required(entry.humidity, "humidity")?,
            visibility: required(entry.visibility, "visibility")?,
            visibility_miles: required(entry.visibility_miles, "visibilityMiles")?,
            cloudcover: required(entry.cloudcover, "cloudcover")?,
            uv_index: entry.uv_index,
        });
    }
    Ok((daily, hourly))
}

/// Flatten a forecast response into at most `num_of_hours` hourly rows and
/// one daily row per returned day.
pub fn extract_forecast(
    location: &str,
    response: &WwoResponse,
    num_of_hours: usize,
) -> Result<ForecastBatch, RequestError> {
    let data = &response.data;
    let local_time = data
        .time_zone
        .first()
        .ok_or_else(|| RequestError::malformed("missing time_zone"))?;
    let now = parse_local_time(&local_time.localtime).map_err(|e| {
        RequestError::malformed(format!("bad localtime {:?}: {e}", local_time.localtime))
    })?;
    let live = data
        .current_condition
        .first()
        .ok_or_else(|| RequestError::malformed("missing current_condition"))?;

    let mut batch = ForecastBatch {
        daily: Vec::with_capacity(data.weather.len()),
        hourly: Vec::with_capacity(num_of_hours),
    };

    if num_of_hours > 0 {
        batch.hourly.push(ForecastHourly {
            location: location.to_string(),
            datetime: now,
            current: true,
            temp_c: live.temp_c,
            temp_f: live.temp_f,
            precip_mm: live.precip_mm,
            uv_index: live.uv_index,
        });
    }

    for (day_index, day) in data.weather.iter().enumerate() {
        let date = parse_day(day)?;
        let astro = astronomy(day)?;
        batch.daily.push(ForecastDaily {
            location: location.to_string(),
            datetime: date.and_time(NaiveTime::MIN),
            sunrise: astro.sunrise.clone(),
            sunset: astro.sunset.clone(),
            moonrise: astro.moonrise.clone(),
            moonset: astro.moonset.clone(),
            moon_phase: astro.moon_phase.clone(),
            moon_illumination: astro.moon_illumination,
            temp_c: format!("{} ~ {}", day.min_temp_c, day.max_temp_c),
            temp_f: format!("{} ~ {}", day.min_temp_f, day.max_temp_f),
            sun_hour: day.sun_hour,
            uv_index: day.uv_index,
        });

        if batch.hourly.len() >= num_of_hours {
            continue;
        }
        let start = if day_index == 0 {
            now.hour() as usize + 1
        } else {
            0
        };
        for (hour, entry) in day.hourly.iter().enumerate().skip(start) {
            if batch.hourly.len() >= num_of_hours {
                break;
            }
            batch.hourly.push(ForecastHourly {
                location: location.to_string(),
                datetime: hour_of(date, hour)?,
                current: false,
                temp_c: entry.temp_c,
                temp_f: entry.temp_f,
                precip_mm: entry.precip_mm,
                uv_index: entry.uv_index,
            });
        }
    }
    Ok(batch)
}

fn log_resolved(location: &str, response: &WwoResponse) {
    if let Some(resolved) = response.resolved_query() {
        debug!("{} resolved to {}", location, resolved);
    }
}

/// Fetch and flatten every date in `dates` for `location`, one call per date.
///
/// Stops at the first failing call; nothing is returned for the dates
/// already fetched.
pub async fn load_historical(
    client: &WwoClient,
    location: &str,
    dates: &[NaiveDate],
) -> Result<HistoricalBatch, RequestError> {
    let mut batch = HistoricalBatch::default();
    for date in dates {
        let response = client.past_weather(location, *date).await?;
        log_resolved(location, &response);
        let (daily, hourly) = extract_historical_day(location, *date, &response)?;
        batch.daily.push(daily);
        batch.hourly.extend(hourly);
    }
    info!(
        "Loaded historical weather for {}: days={}, hours={}",
        location,
        batch.daily.len(),
        batch.hourly.len()
    );
    Ok(batch)
}

/// Fetch and flatten the forecast for `location`.
pub async fn load_forecast(
    client: &WwoClient,
    location: &str,
    num_of_days: u32,
    num_of_hours: usize,
) -> Result<ForecastBatch, RequestError> {
    let response = client.forecast(location, num_of_days).await?;
    log_resolved(location, &response);
    let batch = extract_forecast(location, &response, num_of_hours)?;
    info!(
        "Loaded forecast for {}: days={}, hours={}",
        location,
        batch.daily.len(),
        batch.hourly.len()
    );
    Ok(batch)
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Provider payload builders shared by tests.

    use serde_json::{json, Value};

    pub fn astronomy() -> Value {
        json!([{
            "sunrise": "06:31 AM",
            "sunset": "05:38 PM",
            "moonrise": "01:55 AM",
            "moonset": "11:43 AM",
            "moon_phase": "Waning Crescent",
            "moon_illumination": "47"
        }])
    }

    pub fn hour(index: usize) -> Value {
        let temp_c = index as i64 % 10;
        json!({
            "time": format!("{}", index * 100),
            "tempC": temp_c.to_string(),
            "tempF": (32 + temp_c * 9 / 5).to_string(),
            "windspeedMiles": "7",
            "windspeedKmph": "11",
            "winddirDegree": "243",
            "winddir16Point": "WSW",
            "weatherDesc": [{"value": "Sunny"}],
            "precipMM": "0.0",
            "precipInches": "0.0",
            "humidity": "57",
            "visibility": "10",
            "visibilityMiles": "6",
            "cloudcover": "0",
            "uvIndex": "1"
        })
    }

    pub fn day(date: &str, hours: usize) -> Value {
        json!({
            "date": date,
            "astronomy": astronomy(),
            "maxtempC": "8",
            "maxtempF": "46",
            "mintempC": "-2",
            "mintempF": "28",
            "avgtempC": "3",
            "avgtempF": "38",
            "totalSnow_cm": "0.0",
            "sunHour": "8.7",
            "uvIndex": "2",
            "hourly": (0..hours).map(hour).collect::<Vec<_>>()
        })
    }

    pub fn past_weather(date: &str, hours: usize) -> Value {
        json!({
            "data": {
                "request": [{"type": "City", "query": "Providence, United States of America"}],
                "weather": [day(date, hours)]
            }
        })
    }

    /// A forecast payload whose first day is `2019-02-27`.
    pub fn forecast(localtime: &str, days: usize, temp_c: &str) -> Value {
        let first = chrono::NaiveDate::from_ymd_opt(2019, 2, 27).unwrap();
        let weather: Vec<Value> = (0..days)
            .map(|d| {
                let date = first + chrono::Days::new(d as u64);
                day(&date.format("%Y-%m-%d").to_string(), 24)
            })
            .collect();
        json!({
            "data": {
                "request": [{"type": "City", "query": "New York, United States of America"}],
                "current_condition": [{
                    "temp_C": temp_c,
                    "temp_F": "41",
                    "precipMM": "0.1",
                    "uvIndex": "2"
                }],
                "time_zone": [{"localtime": localtime, "utcOffset": "-5.0", "zone": "America/New_York"}],
                "weather": weather
            }
        })
    }
}

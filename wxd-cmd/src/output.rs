//! JSON views handed to the dashboard: stored snapshots, previews and the
//! city selectors.

use serde::Serialize;
use std::io::Write;
use std::time::Duration;
use wxd_db::{Database, ForecastReader, HistoricalReader, StoreError};
use wxd_utils::dates::display_date;
use wxd_wwo::city::{City, CityDirectory};
use wxd_wwo::{ForecastBatch, ForecastHourly, Mode};

/// A forecast day as shown in the daily table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRow {
    /// e.g. "2019-02-27, Wednesday"
    pub date: String,
    pub temp_c: String,
    pub temp_f: String,
    pub sunrise: String,
    pub sunset: String,
    pub moon_phase: String,
    pub sun_hour: f64,
    pub uv_index: i32,
}

/// Unpersisted forecast for one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub location: String,
    pub daily: Vec<DayRow>,
    pub hourly: Vec<ForecastHourly>,
}

impl Preview {
    pub fn from_batch(location: &str, batch: ForecastBatch) -> Self {
        let daily = batch
            .daily
            .iter()
            .map(|row| DayRow {
                date: display_date(&row.datetime),
                temp_c: row.temp_c.clone(),
                temp_f: row.temp_f.clone(),
                sunrise: row.sunrise.clone(),
                sunset: row.sunset.clone(),
                moon_phase: row.moon_phase.clone(),
                sun_hour: row.sun_hour,
                uv_index: row.uv_index,
            })
            .collect();
        Self {
            location: location.to_string(),
            daily,
            hourly: batch.hourly,
        }
    }
}

/// A city option with the location key it selects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityOption {
    pub label: String,
    pub value: String,
}

impl From<&City> for CityOption {
    fn from(city: &City) -> Self {
        Self {
            label: city.city.clone(),
            value: city.location_query(),
        }
    }
}

/// States when `state` is `None`, otherwise that state's cities.
pub fn cities_json(directory: &CityDirectory, state: Option<&str>) -> serde_json::Result<String> {
    match state {
        None => serde_json::to_string_pretty(&directory.states()),
        Some(state) => {
            let options: Vec<CityOption> = directory
                .cities(state)
                .into_iter()
                .map(CityOption::from)
                .collect();
            serde_json::to_string_pretty(&options)
        }
    }
}

/// Stored tables of one mode rendered as JSON through a single cached reader.
///
/// Keep one view alive across renders; a fresh view starts with an empty cache.
pub enum SnapshotView {
    Forecast(ForecastReader),
    Historical(HistoricalReader),
}

impl SnapshotView {
    pub fn new(db: Database, mode: Mode, ttl: Duration) -> Self {
        match mode {
            Mode::Forecast => Self::Forecast(ForecastReader::with_ttl(db, ttl)),
            Mode::Historical => Self::Historical(HistoricalReader::with_ttl(db, ttl)),
        }
    }

    /// Latest tables of `location` as JSON; `null` when nothing is stored yet.
    pub fn render(
        &self,
        location: &str,
        allow_cached: bool,
    ) -> Result<String, SnapshotOutputError> {
        let json = match self {
            Self::Forecast(reader) => {
                serde_json::to_string_pretty(&*reader.read(location, allow_cached)?)?
            }
            Self::Historical(reader) => {
                serde_json::to_string_pretty(&*reader.read(location, allow_cached)?)?
            }
        };
        Ok(json)
    }

    /// Write a render to `out` every `period`, `limit` times or forever.
    pub async fn watch<W: Write>(
        &self,
        location: &str,
        allow_cached: bool,
        period: Duration,
        limit: Option<usize>,
        mut out: W,
    ) -> Result<(), SnapshotOutputError> {
        let mut written = 0;
        loop {
            writeln!(out, "{}", self.render(location, allow_cached)?)?;
            out.flush()?;
            written += 1;
            if limit.is_some_and(|limit| written >= limit) {
                return Ok(());
            }
            tokio::time::sleep(period).await;
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SnapshotOutputError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to serialize snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write snapshot: {0}")]
    Io(#[from] std::io::Error),
}

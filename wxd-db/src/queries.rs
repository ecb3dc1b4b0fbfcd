use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use wxd_utils::dates::parse_datetime;
use wxd_wwo::{ForecastDaily, ForecastHourly, HistoricalDaily, HistoricalHourly};

use crate::models::{ForecastSnapshot, HistoricalSnapshot, Snapshot};
use crate::{Database, StoreError};

/// Read a stored `datetime` column back into a `NaiveDateTime`.
fn datetime_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let text: String = row.get(idx)?;
    parse_datetime(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}

fn historical_daily(
    conn: &Connection,
    city: Option<&str>,
) -> rusqlite::Result<Vec<HistoricalDaily>> {
    let mut stmt = conn.prepare_cached(
        "SELECT city, datetime, sunrise, sunset, moonrise, moonset, moon_phase,
                moon_illumination, max_temp_c, max_temp_f, min_temp_c, min_temp_f,
                avg_temp_c, avg_temp_f, total_snow_cm, sun_hour, uv_index
         FROM historical_daily
         WHERE ?1 IS NULL OR city = ?1
         ORDER BY city, datetime",
    )?;
    let rows = stmt.query_map(params![city], |row| {
        Ok(HistoricalDaily {
            city: row.get(0)?,
            datetime: datetime_column(row, 1)?,
            sunrise: row.get(2)?,
            sunset: row.get(3)?,
            moonrise: row.get(4)?,
            moonset: row.get(5)?,
            moon_phase: row.get(6)?,
            moon_illumination: row.get(7)?,
            max_temp_c: row.get(8)?,
            max_temp_f: row.get(9)?,
            min_temp_c: row.get(10)?,
            min_temp_f: row.get(11)?,
            avg_temp_c: row.get(12)?,
            avg_temp_f: row.get(13)?,
            total_snow_cm: row.get(14)?,
            sun_hour: row.get(15)?,
            uv_index: row.get(16)?,
        })
    })?;
    rows.collect()
}

fn historical_hourly(
    conn: &Connection,
    city: Option<&str>,
) -> rusqlite::Result<Vec<HistoricalHourly>> {
    let mut stmt = conn.prepare_cached(
        "SELECT city, datetime, temp_c, temp_f, windspeed_miles, windspeed_kmph,
                winddir_degree, winddir16_point, weather_desc, precip_mm, precip_inches,
                humidity, visibility, visibility_miles, cloudcover, uv_index
         FROM historical_hourly
         WHERE ?1 IS NULL OR city = ?1
         ORDER BY city, datetime",
    )?;
    let rows = stmt.query_map(params![city], |row| {
        Ok(HistoricalHourly {
            city: row.get(0)?,
            datetime: datetime_column(row, 1)?,
            temp_c: row.get(2)?,
            temp_f: row.get(3)?,
            windspeed_miles: row.get(4)?,
            windspeed_kmph: row.get(5)?,
            winddir_degree: row.get(6)?,
            winddir16_point: row.get(7)?,
            weather_desc: row.get(8)?,
            precip_mm: row.get(9)?,
            precip_inches: row.get(10)?,
            humidity: row.get(11)?,
            visibility: row.get(12)?,
            visibility_miles: row.get(13)?,
            cloudcover: row.get(14)?,
            uv_index: row.get(15)?,
        })
    })?;
    rows.collect()
}

fn forecast_daily(
    conn: &Connection,
    location: Option<&str>,
) -> rusqlite::Result<Vec<ForecastDaily>> {
    let mut stmt = conn.prepare_cached(
        "SELECT location, datetime, sunrise, sunset, moonrise, moonset, moon_phase,
                moon_illumination, temp_c, temp_f, sun_hour, uv_index
         FROM forecast_daily
         WHERE ?1 IS NULL OR location = ?1
         ORDER BY location, datetime",
    )?;
    let rows = stmt.query_map(params![location], |row| {
        Ok(ForecastDaily {
            location: row.get(0)?,
            datetime: datetime_column(row, 1)?,
            sunrise: row.get(2)?,
            sunset: row.get(3)?,
            moonrise: row.get(4)?,
            moonset: row.get(5)?,
            moon_phase: row.get(6)?,
            moon_illumination: row.get(7)?,
            temp_c: row.get(8)?,
            temp_f: row.get(9)?,
            sun_hour: row.get(10)?,
            uv_index: row.get(11)?,
        })
    })?;
    rows.collect()
}

fn forecast_hourly(
    conn: &Connection,
    location: Option<&str>,
) -> rusqlite::Result<Vec<ForecastHourly>> {
    let mut stmt = conn.prepare_cached(
        "SELECT location, datetime, current, temp_c, temp_f, precip_mm, uv_index
         FROM forecast_hourly
         WHERE ?1 IS NULL OR location = ?1
         ORDER BY location, datetime",
    )?;
    let rows = stmt.query_map(params![location], |row| {
        Ok(ForecastHourly {
            location: row.get(0)?,
            datetime: datetime_column(row, 1)?,
            current: row.get(2)?,
            temp_c: row.get(3)?,
            temp_f: row.get(4)?,
            precip_mm: row.get(5)?,
            uv_index: row.get(6)?,
        })
    })?;
    rows.collect()
}

impl Database {
    /// All stored historical days, ordered by (city, datetime).
    pub fn query_historical_daily(&self) -> Result<Vec<HistoricalDaily>, StoreError> {
        Ok(historical_daily(&self.conn.lock(), None)?)
    }

    /// All stored historical hours, ordered by (city, datetime).
    pub fn query_historical_hourly(&self) -> Result<Vec<HistoricalHourly>, StoreError> {
        Ok(historical_hourly(&self.conn.lock(), None)?)
    }

    /// All stored forecast days, ordered by (location, datetime).
    pub fn query_forecast_daily(&self) -> Result<Vec<ForecastDaily>, StoreError> {
        Ok(forecast_daily(&self.conn.lock(), None)?)
    }

    /// All stored forecast hours, the current row included.
    pub fn query_forecast_hourly(&self) -> Result<Vec<ForecastHourly>, StoreError> {
        Ok(forecast_hourly(&self.conn.lock(), None)?)
    }

    /// Both historical tables for one city, read under one lock.
    ///
    /// `None` when either table has no rows for `city`.
    pub fn historical_snapshot(
        &self,
        city: &str,
    ) -> Result<Option<HistoricalSnapshot>, StoreError> {
        let conn = self.conn.lock();
        let daily = historical_daily(&conn, Some(city))?;
        let hourly = historical_hourly(&conn, Some(city))?;
        Ok(Snapshot::from_tables(daily, hourly))
    }

    /// Both forecast tables for one location, read under one lock.
    ///
    /// `None` when either table has no rows for `location`.
    pub fn forecast_snapshot(
        &self,
        location: &str,
    ) -> Result<Option<ForecastSnapshot>, StoreError> {
        let conn = self.conn.lock();
        let daily = forecast_daily(&conn, Some(location))?;
        let hourly = forecast_hourly(&conn, Some(location))?;
        Ok(Snapshot::from_tables(daily, hourly))
    }
}

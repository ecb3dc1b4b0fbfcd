//! Replace-or-insert of extracted rows, matched on the natural key.
//!
//! Each row is one `INSERT ... ON CONFLICT ... DO UPDATE ... RETURNING`
//! statement, so the match and the write are a single atomic step. The
//! returned `revision` is 0 for a fresh insert and positive for a replace.
//!
//! Rows are written one at a time with no transaction spanning a batch: if a
//! write fails, earlier rows stay committed and the rest are skipped.
//!
//! A forecast row flagged `current` gets a second write in the same
//! transaction: any other `current` row is removed, since the newer live
//! observation supersedes it under its own key.

use log::info;
use rusqlite::{params, Connection};
use wxd_utils::dates::format_datetime;
use wxd_wwo::{
    ForecastBatch, ForecastDaily, ForecastHourly, HistoricalBatch, HistoricalDaily,
    HistoricalHourly,
};

use crate::models::UpsertReport;
use crate::{Database, StoreError};

const UPSERT_HISTORICAL_DAILY: &str = "
    INSERT INTO historical_daily
        (city, datetime, sunrise, sunset, moonrise, moonset, moon_phase, moon_illumination,
         max_temp_c, max_temp_f, min_temp_c, min_temp_f, avg_temp_c, avg_temp_f,
         total_snow_cm, sun_hour, uv_index)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
    ON CONFLICT (city, datetime) DO UPDATE SET
        sunrise = excluded.sunrise,
        sunset = excluded.sunset,
        moonrise = excluded.moonrise,
        moonset = excluded.moonset,
        moon_phase = excluded.moon_phase,
        moon_illumination = excluded.moon_illumination,
        max_temp_c = excluded.max_temp_c,
        max_temp_f = excluded.max_temp_f,
        min_temp_c = excluded.min_temp_c,
        min_temp_f = excluded.min_temp_f,
        avg_temp_c = excluded.avg_temp_c,
        avg_temp_f = excluded.avg_temp_f,
        total_snow_cm = excluded.total_snow_cm,
        sun_hour = excluded.sun_hour,
        uv_index = excluded.uv_index,
        revision = historical_daily.revision + 1
    RETURNING revision";

const UPSERT_HISTORICAL_HOURLY: &str = "
    INSERT INTO historical_hourly
        (city, datetime, temp_c, temp_f, windspeed_miles, windspeed_kmph, winddir_degree,
         winddir16_point, weather_desc, precip_mm, precip_inches, humidity, visibility,
         visibility_miles, cloudcover, uv_index)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
    ON CONFLICT (city, datetime) DO UPDATE SET
        temp_c = excluded.temp_c,
        temp_f = excluded.temp_f,
        windspeed_miles = excluded.windspeed_miles,
        windspeed_kmph = excluded.windspeed_kmph,
        winddir_degree = excluded.winddir_degree,
        winddir16_point = excluded.winddir16_point,
        weather_desc = excluded.weather_desc,
        precip_mm = excluded.precip_mm,
        precip_inches = excluded.precip_inches,
        humidity = excluded.humidity,
        visibility = excluded.visibility,
        visibility_miles = excluded.visibility_miles,
        cloudcover = excluded.cloudcover,
        uv_index = excluded.uv_index,
        revision = historical_hourly.revision + 1
    RETURNING revision";

const UPSERT_FORECAST_DAILY: &str = "
    INSERT INTO forecast_daily
        (location, datetime, sunrise, sunset, moonrise, moonset, moon_phase,
         moon_illumination, temp_c, temp_f, sun_hour, uv_index)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
    ON CONFLICT (location, datetime) DO UPDATE SET
        sunrise = excluded.sunrise,
        sunset = excluded.sunset,
        moonrise = excluded.moonrise,
        moonset = excluded.moonset,
        moon_phase = excluded.moon_phase,
        moon_illumination = excluded.moon_illumination,
        temp_c = excluded.temp_c,
        temp_f = excluded.temp_f,
        sun_hour = excluded.sun_hour,
        uv_index = excluded.uv_index,
        revision = forecast_daily.revision + 1
    RETURNING revision";

const UPSERT_FORECAST_HOURLY: &str = "
    INSERT INTO forecast_hourly
        (location, datetime, current, temp_c, temp_f, precip_mm, uv_index)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    ON CONFLICT (location, datetime) DO UPDATE SET
        current = excluded.current,
        temp_c = excluded.temp_c,
        temp_f = excluded.temp_f,
        precip_mm = excluded.precip_mm,
        uv_index = excluded.uv_index,
        revision = forecast_hourly.revision + 1
    RETURNING revision";

/// Drop every `current` row except the one at the incoming row's key.
const SUPERSEDE_CURRENT: &str = "
    DELETE FROM forecast_hourly
    WHERE current = 1 AND NOT (location = ?1 AND datetime = ?2)";

/// Runs an upsert statement; true when an existing row was replaced.
fn matched(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> rusqlite::Result<bool> {
    let revision: i64 = conn
        .prepare_cached(sql)?
        .query_row(params, |row| row.get(0))?;
    Ok(revision > 0)
}

fn upsert_historical_daily(conn: &Connection, row: &HistoricalDaily) -> rusqlite::Result<bool> {
    matched(
        conn,
        UPSERT_HISTORICAL_DAILY,
        params![
            row.city,
            format_datetime(&row.datetime),
            row.sunrise,
            row.sunset,
            row.moonrise,
            row.moonset,
            row.moon_phase,
            row.moon_illumination,
            row.max_temp_c,
            row.max_temp_f,
            row.min_temp_c,
            row.min_temp_f,
            row.avg_temp_c,
            row.avg_temp_f,
            row.total_snow_cm,
            row.sun_hour,
            row.uv_index,
        ],
    )
}

fn upsert_historical_hourly(conn: &Connection, row: &HistoricalHourly) -> rusqlite::Result<bool> {
    matched(
        conn,
        UPSERT_HISTORICAL_HOURLY,
        params![
            row.city,
            format_datetime(&row.datetime),
            row.temp_c,
            row.temp_f,
            row.windspeed_miles,
            row.windspeed_kmph,
            row.winddir_degree,
            row.winddir16_point,
            row.weather_desc,
            row.precip_mm,
            row.precip_inches,
            row.humidity,
            row.visibility,
            row.visibility_miles,
            row.cloudcover,
            row.uv_index,
        ],
    )
}

fn upsert_forecast_daily(conn: &Connection, row: &ForecastDaily) -> rusqlite::Result<bool> {
    matched(
        conn,
        UPSERT_FORECAST_DAILY,
        params![
            row.location,
            format_datetime(&row.datetime),
            row.sunrise,
            row.sunset,
            row.moonrise,
            row.moonset,
            row.moon_phase,
            row.moon_illumination,
            row.temp_c,
            row.temp_f,
            row.sun_hour,
            row.uv_index,
        ],
    )
}

fn upsert_forecast_hourly(conn: &Connection, row: &ForecastHourly) -> rusqlite::Result<bool> {
    matched(
        conn,
        UPSERT_FORECAST_HOURLY,
        params![
            row.location,
            format_datetime(&row.datetime),
            row.current,
            row.temp_c,
            row.temp_f,
            row.precip_mm,
            row.uv_index,
        ],
    )
}

impl Database {
    /// Upsert a historical batch into `historical_daily` / `historical_hourly`.
    pub fn upsert_historical(&self, batch: &HistoricalBatch) -> Result<UpsertReport, StoreError> {
        let conn = self.conn.lock();
        let mut report = UpsertReport::default();

        for row in &batch.daily {
            report.daily.record(upsert_historical_daily(&conn, row)?);
        }
        info!(
            "Daily weather: rows={}, update={}, insert={}",
            report.daily.rows, report.daily.updated, report.daily.inserted
        );

        for row in &batch.hourly {
            report.hourly.record(upsert_historical_hourly(&conn, row)?);
        }
        info!(
            "Hourly weather: rows={}, update={}, insert={}",
            report.hourly.rows, report.hourly.updated, report.hourly.inserted
        );
        Ok(report)
    }

    /// Upsert a forecast batch into `forecast_daily` / `forecast_hourly`,
    /// keeping a single `current` row.
    pub fn upsert_forecast(&self, batch: &ForecastBatch) -> Result<UpsertReport, StoreError> {
        let mut conn = self.conn.lock();
        let mut report = UpsertReport::default();

        for row in &batch.daily {
            report.daily.record(upsert_forecast_daily(&conn, row)?);
        }
        info!(
            "Daily forecast weather: rows={}, update={}, insert={}",
            report.daily.rows, report.daily.updated, report.daily.inserted
        );

        for row in &batch.hourly {
            let matched = if row.current {
                let tx = conn.transaction()?;
                let superseded = tx.execute(
                    SUPERSEDE_CURRENT,
                    params![row.location, format_datetime(&row.datetime)],
                )?;
                let matched = upsert_forecast_hourly(&tx, row)?;
                tx.commit()?;
                report.superseded_current += superseded;
                matched
            } else {
                upsert_forecast_hourly(&conn, row)?
            };
            report.hourly.record(matched);
        }
        info!(
            "Hourly forecast weather: rows={}, update={}, insert={}, superseded current={}",
            report.hourly.rows,
            report.hourly.updated,
            report.hourly.inserted,
            report.superseded_current
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_rows::{forecast_batch, historical_batch};
    use crate::{Database, StoreError};
    use std::collections::HashSet;

    fn count(db: &Database, table: &str) -> i64 {
        db.conn
            .lock()
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })
            .unwrap()
    }

    #[test]
    fn upsert_historical_inserts_then_matches() {
        let db = Database::new().unwrap();
        let batch = historical_batch("providence,rhode+island", "2019-02-27", 2, 3);

        let first = db.upsert_historical(&batch).unwrap();
        assert_eq!(first.daily.inserted, 2);
        assert_eq!(first.hourly.inserted, 48);
        assert_eq!(first.daily.updated + first.hourly.updated, 0);

        let second = db.upsert_historical(&batch).unwrap();
        assert_eq!(second.daily.updated, 2);
        assert_eq!(second.hourly.updated, 48);
        assert_eq!(second.daily.inserted + second.hourly.inserted, 0);

        assert_eq!(count(&db, "historical_daily"), 2);
        assert_eq!(count(&db, "historical_hourly"), 48);
    }

    #[test]
    fn upsert_historical_replaces_values() {
        let db = Database::new().unwrap();
        db.upsert_historical(&historical_batch("providence,rhode+island", "2019-02-27", 1, 3))
            .unwrap();
        db.upsert_historical(&historical_batch("providence,rhode+island", "2019-02-27", 1, 9))
            .unwrap();

        let daily = db.query_historical_daily().unwrap();
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].avg_temp_c, 9);
        let revision: i64 = db
            .conn
            .lock()
            .query_row("SELECT revision FROM historical_daily", [], |row| row.get(0))
            .unwrap();
        assert_eq!(revision, 1);
    }

    #[test]
    fn natural_keys_stay_unique_across_overlapping_batches() {
        let db = Database::new().unwrap();
        db.upsert_historical(&historical_batch("providence,rhode+island", "2019-02-25", 3, 1))
            .unwrap();
        db.upsert_historical(&historical_batch("providence,rhode+island", "2019-02-26", 3, 2))
            .unwrap();
        db.upsert_historical(&historical_batch("boston,massachusetts", "2019-02-26", 2, 2))
            .unwrap();

        let hourly = db.query_historical_hourly().unwrap();
        let keys: HashSet<_> = hourly.iter().map(|r| (r.city.clone(), r.datetime)).collect();
        assert_eq!(keys.len(), hourly.len());
        assert_eq!(db.query_historical_daily().unwrap().len(), 4 + 2);
    }

    #[test]
    fn newer_current_row_supersedes_previous() {
        let db = Database::new().unwrap();
        let first = db
            .upsert_forecast(&forecast_batch("2019-02-27 14:32", 5, 7))
            .unwrap();
        assert_eq!(first.superseded_current, 0);
        assert_eq!(first.hourly.inserted, 5);

        let second = db
            .upsert_forecast(&forecast_batch("2019-02-27 14:47", 6, 7))
            .unwrap();
        assert_eq!(second.superseded_current, 1);
        assert_eq!(second.daily.updated, 7);
        // The live row has a new key; the four future hours match.
        assert_eq!(second.hourly.inserted, 1);
        assert_eq!(second.hourly.updated, 4);

        let hourly = db.query_forecast_hourly().unwrap();
        let current: Vec<_> = hourly.iter().filter(|r| r.current).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0], &forecast_batch("2019-02-27 14:47", 6, 7).hourly[0]);
        assert_eq!(hourly.len(), 5);
    }

    #[test]
    fn current_row_can_land_on_a_forecast_hour() {
        let db = Database::new().unwrap();
        db.upsert_forecast(&forecast_batch("2019-02-27 14:32", 5, 1))
            .unwrap();
        // 15:00 was stored as a future hour by the first batch.
        let report = db
            .upsert_forecast(&forecast_batch("2019-02-27 15:00", 6, 1))
            .unwrap();
        assert_eq!(report.superseded_current, 1);
        assert_eq!(report.hourly.updated, 4);
        assert_eq!(report.hourly.inserted, 1);

        let hourly = db.query_forecast_hourly().unwrap();
        let current: Vec<_> = hourly.iter().filter(|r| r.current).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].temp_c, 6);
        assert_eq!(current[0].datetime.to_string(), "2019-02-27 15:00:00");
    }

    #[test]
    fn repeated_identical_forecast_is_idempotent() {
        let db = Database::new().unwrap();
        let batch = forecast_batch("2019-02-27 14:32", 5, 7);
        db.upsert_forecast(&batch).unwrap();
        let again = db.upsert_forecast(&batch).unwrap();
        assert_eq!(again.daily.inserted + again.hourly.inserted, 0);
        assert_eq!(again.superseded_current, 0);
        assert_eq!(count(&db, "forecast_daily"), 7);
        assert_eq!(count(&db, "forecast_hourly"), 5);
    }

    #[test]
    fn failure_mid_batch_keeps_earlier_rows() {
        let db = Database::new().unwrap();
        db.conn
            .lock()
            .execute_batch(
                "CREATE TRIGGER reject_noon BEFORE INSERT ON historical_hourly
                 WHEN NEW.datetime LIKE '% 12:00:00'
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )
            .unwrap();

        let err = db
            .upsert_historical(&historical_batch("providence,rhode+island", "2019-02-27", 1, 3))
            .unwrap_err();
        assert!(matches!(err, StoreError::Sqlite(_)));
        assert_eq!(count(&db, "historical_daily"), 1);
        assert_eq!(count(&db, "historical_hourly"), 12);
    }

    #[test]
    fn failure_in_hourly_collection_keeps_daily_rows() {
        let db = Database::new().unwrap();
        db.conn
            .lock()
            .execute_batch("DROP TABLE forecast_hourly")
            .unwrap();
        assert!(db
            .upsert_forecast(&forecast_batch("2019-02-27 14:32", 5, 3))
            .is_err());
        assert_eq!(count(&db, "forecast_daily"), 3);
    }
}

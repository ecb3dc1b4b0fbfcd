//! SQL schema for the weather store.
//!
//! Two collection pairs, one per mode. Each table's primary key is its
//! natural key: (location key, datetime). `revision` counts how many times a
//! row was replaced; it is internal bookkeeping and never read back into rows.

/// Returns the full SQL schema as a single batch string.
///
/// **Historical:** `historical_daily`, `historical_hourly` keyed by (city, datetime).
///
/// **Forecast:** `forecast_daily`, `forecast_hourly` keyed by (location, datetime).
/// A partial unique index allows at most one `forecast_hourly` row with `current = 1`.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS historical_daily (
        city TEXT NOT NULL,
        datetime TEXT NOT NULL,
        sunrise TEXT NOT NULL,
        sunset TEXT NOT NULL,
        moonrise TEXT NOT NULL,
        moonset TEXT NOT NULL,
        moon_phase TEXT NOT NULL,
        moon_illumination INTEGER NOT NULL,
        max_temp_c INTEGER NOT NULL,
        max_temp_f INTEGER NOT NULL,
        min_temp_c INTEGER NOT NULL,
        min_temp_f INTEGER NOT NULL,
        avg_temp_c INTEGER NOT NULL,
        avg_temp_f INTEGER NOT NULL,
        total_snow_cm REAL NOT NULL,
        sun_hour REAL NOT NULL,
        uv_index INTEGER NOT NULL,
        revision INTEGER NOT NULL DEFAULT 0,
        PRIMARY KEY (city, datetime)
    );

    CREATE TABLE IF NOT EXISTS historical_hourly (
        city TEXT NOT NULL,
        datetime TEXT NOT NULL,
        temp_c INTEGER NOT NULL,
        temp_f INTEGER NOT NULL,
        windspeed_miles INTEGER NOT NULL,
        windspeed_kmph INTEGER NOT NULL,
        winddir_degree INTEGER NOT NULL,
        winddir16_point TEXT NOT NULL,
        weather_desc TEXT NOT NULL,
        precip_mm REAL NOT NULL,
        precip_inches REAL NOT NULL,
        humidity INTEGER NOT NULL,
        visibility INTEGER NOT NULL,
        visibility_miles INTEGER NOT NULL,
        cloudcover INTEGER NOT NULL,
        uv_index INTEGER NOT NULL,
        revision INTEGER NOT NULL DEFAULT 0,
        PRIMARY KEY (city, datetime)
    );

    CREATE TABLE IF NOT EXISTS forecast_daily (
        location TEXT NOT NULL,
        datetime TEXT NOT NULL,
        sunrise TEXT NOT NULL,
        sunset TEXT NOT NULL,
        moonrise TEXT NOT NULL,
        moonset TEXT NOT NULL,
        moon_phase TEXT NOT NULL,
        moon_illumination INTEGER NOT NULL,
        temp_c TEXT NOT NULL,
        temp_f TEXT NOT NULL,
        sun_hour REAL NOT NULL,
        uv_index INTEGER NOT NULL,
        revision INTEGER NOT NULL DEFAULT 0,
        PRIMARY KEY (location, datetime)
    );

    CREATE TABLE IF NOT EXISTS forecast_hourly (
        location TEXT NOT NULL,
        datetime TEXT NOT NULL,
        current INTEGER NOT NULL DEFAULT 0,
        temp_c INTEGER NOT NULL,
        temp_f INTEGER NOT NULL,
        precip_mm REAL NOT NULL,
        uv_index INTEGER NOT NULL,
        revision INTEGER NOT NULL DEFAULT 0,
        PRIMARY KEY (location, datetime)
    );
    CREATE UNIQUE INDEX IF NOT EXISTS idx_forecast_hourly_current
        ON forecast_hourly(current) WHERE current = 1;
    "#
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn schema_is_valid_sql() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema())
            .expect("Schema SQL should be valid");
    }

    #[test]
    fn schema_creates_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();

        let expected_tables = [
            "historical_daily",
            "historical_hourly",
            "forecast_daily",
            "forecast_hourly",
        ];

        for table in &expected_tables {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "Table '{}' should exist", table);
        }
    }

    #[test]
    fn schema_rejects_second_current_row() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();
        let insert = "INSERT INTO forecast_hourly
             (location, datetime, current, temp_c, temp_f, precip_mm, uv_index)
             VALUES ('x', ?1, ?2, 0, 32, 0.0, 1)";
        conn.execute(insert, rusqlite::params!["2019-02-27 14:32:00", true])
            .unwrap();
        conn.execute(insert, rusqlite::params!["2019-02-27 15:00:00", false])
            .unwrap();
        assert!(conn
            .execute(insert, rusqlite::params!["2019-02-27 16:00:00", true])
            .is_err());
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();
        // Applying schema a second time should not fail due to IF NOT EXISTS.
        conn.execute_batch(create_schema())
            .expect("Applying schema twice should succeed due to IF NOT EXISTS");
    }
}

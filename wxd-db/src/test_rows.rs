//! Row builders shared by the store tests.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use wxd_utils::dates::parse_local_time;
use wxd_wwo::{
    ForecastBatch, ForecastDaily, ForecastHourly, HistoricalBatch, HistoricalDaily,
    HistoricalHourly,
};

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// `days` daily rows from `first`, 24 hourly rows per day.
pub(crate) fn historical_batch(
    city: &str,
    first: &str,
    days: usize,
    temp_c: i32,
) -> HistoricalBatch {
    let first = NaiveDate::parse_from_str(first, "%Y-%m-%d").unwrap();
    let mut batch = HistoricalBatch::default();
    for d in 0..days {
        let date = first + chrono::Days::new(d as u64);
        batch.daily.push(HistoricalDaily {
            city: city.to_string(),
            datetime: midnight(date),
            sunrise: "06:31 AM".into(),
            sunset: "05:38 PM".into(),
            moonrise: "01:55 AM".into(),
            moonset: "11:43 AM".into(),
            moon_phase: "Waning Crescent".into(),
            moon_illumination: 47,
            max_temp_c: temp_c + 5,
            max_temp_f: 46,
            min_temp_c: temp_c - 5,
            min_temp_f: 28,
            avg_temp_c: temp_c,
            avg_temp_f: 38,
            total_snow_cm: 0.0,
            sun_hour: 8.7,
            uv_index: 2,
        });
        for hour in 0..24 {
            batch.hourly.push(HistoricalHourly {
                city: city.to_string(),
                datetime: date.and_hms_opt(hour, 0, 0).unwrap(),
                temp_c,
                temp_f: 41,
                windspeed_miles: 7,
                windspeed_kmph: 11,
                winddir_degree: 243,
                winddir16_point: "WSW".into(),
                weather_desc: "Sunny".into(),
                precip_mm: 0.0,
                precip_inches: 0.0,
                humidity: 57,
                visibility: 10,
                visibility_miles: 6,
                cloudcover: 0,
                uv_index: 1,
            });
        }
    }
    batch
}

/// `days` daily rows, the live row at `localtime`, then four future hours.
pub(crate) fn forecast_batch(localtime: &str, current_temp_c: i32, days: usize) -> ForecastBatch {
    let now = parse_local_time(localtime).unwrap();
    let mut batch = ForecastBatch::default();
    for d in 0..days {
        let date = now.date() + chrono::Days::new(d as u64);
        batch.daily.push(ForecastDaily {
            location: "new+york".into(),
            datetime: midnight(date),
            sunrise: "06:31 AM".into(),
            sunset: "05:38 PM".into(),
            moonrise: "01:55 AM".into(),
            moonset: "11:43 AM".into(),
            moon_phase: "Waning Crescent".into(),
            moon_illumination: 47,
            temp_c: "-2 ~ 8".into(),
            temp_f: "28 ~ 46".into(),
            sun_hour: 8.7,
            uv_index: 2,
        });
    }
    batch.hourly.push(ForecastHourly {
        location: "new+york".into(),
        datetime: now,
        current: true,
        temp_c: current_temp_c,
        temp_f: 41,
        precip_mm: 0.1,
        uv_index: 2,
    });
    let top_of_hour = now.with_minute(0).unwrap();
    for h in 1..=4 {
        batch.hourly.push(ForecastHourly {
            location: "new+york".into(),
            datetime: top_of_hour + Duration::hours(h),
            current: false,
            temp_c: 3,
            temp_f: 37,
            precip_mm: 0.0,
            uv_index: 1,
        });
    }
    batch
}

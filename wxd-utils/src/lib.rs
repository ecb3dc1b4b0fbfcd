//! Shared utility functions for WXD crates.

/// Date utility functions
pub mod dates {
    use chrono::{NaiveDate, NaiveDateTime};

    /// Date format used for provider query parameters and daily rows: "YYYY-MM-DD"
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Storage format for row timestamps. Sorts lexically in chronological order.
    pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Daily table label: date plus full weekday name.
    pub const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d, %A";

    /// Local time as reported by the provider in `time_zone[0].localtime`.
    pub const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }

    /// Format a row timestamp for storage.
    pub fn format_datetime(datetime: &NaiveDateTime) -> String {
        datetime.format(DATETIME_FORMAT).to_string()
    }

    /// Parse a stored row timestamp.
    pub fn parse_datetime(s: &str) -> anyhow::Result<NaiveDateTime> {
        Ok(NaiveDateTime::parse_from_str(s.trim(), DATETIME_FORMAT)?)
    }

    /// Parse the provider's "YYYY-MM-DD HH:MM" local time.
    pub fn parse_local_time(s: &str) -> anyhow::Result<NaiveDateTime> {
        Ok(NaiveDateTime::parse_from_str(s.trim(), LOCAL_TIME_FORMAT)?)
    }

    /// Render a daily row's timestamp for tables, e.g. "2019-02-27, Wednesday".
    pub fn display_date(datetime: &NaiveDateTime) -> String {
        datetime.format(DISPLAY_DATE_FORMAT).to_string()
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2019, 2, 27).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2019-02-27");
            assert_eq!(NaiveDate::parse_from_str(&formatted, DATE_FORMAT).unwrap(), date);
        }

        #[test]
        fn test_datetime_roundtrip_sorts_lexically() {
            let early = NaiveDate::from_ymd_opt(2019, 2, 27)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap();
            let late = NaiveDate::from_ymd_opt(2019, 2, 27)
                .unwrap()
                .and_hms_opt(13, 0, 0)
                .unwrap();
            let (a, b) = (format_datetime(&early), format_datetime(&late));
            assert_eq!(a, "2019-02-27 09:00:00");
            assert!(a < b);
            assert_eq!(parse_datetime(&b).unwrap(), late);
        }

        #[test]
        fn test_parse_local_time() {
            let parsed = parse_local_time("2019-02-27 14:32").unwrap();
            assert_eq!(format_datetime(&parsed), "2019-02-27 14:32:00");
            assert!(parse_local_time("2019-02-27").is_err());
        }

        #[test]
        fn test_display_date() {
            let dt = NaiveDate::from_ymd_opt(2019, 2, 27)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap();
            assert_eq!(display_date(&dt), "2019-02-27, Wednesday");
            let sunday = NaiveDate::from_ymd_opt(2019, 3, 3)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap();
            assert_eq!(display_date(&sunday), "2019-03-03, Sunday");
        }
    }
}

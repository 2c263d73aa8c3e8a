//! Date and timestamp utilities
//!
//! All calendar bucketing in zdash is done on [`NaiveDate`]: an item's day is
//! the date of its `dateAdded` timestamp in the offset it was recorded with.

use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate, Utc};

use crate::{Error, Result};

/// Day format used in query parameters and titles (`2024-03-05`)
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Day format used for heatmap cell labels (`05 Mar, 2024`)
pub const LABEL_FORMAT: &str = "%d %b, %Y";

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current calendar year in local time
pub fn current_year() -> i32 {
    Local::now().year()
}

/// Parse an ISO-8601 timestamp with offset (`2024-03-05T14:02:11Z`,
/// `2024-03-05T14:02:11+02:00`)
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value.trim()).map_err(|e| Error::invalid_date(value, e))
}

/// Parse a `YYYY-MM-DD` day
pub fn parse_day(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DAY_FORMAT).map_err(|e| Error::invalid_date(value, e))
}

/// Format a day as a heatmap label (`05 Mar, 2024`)
pub fn format_label(day: NaiveDate) -> String {
    day.format(LABEL_FORMAT).to_string()
}

/// Parse a heatmap label (`05 Mar, 2024`) back into a day
pub fn parse_label(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), LABEL_FORMAT).map_err(|e| Error::invalid_date(value, e))
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// 365 or 366
pub fn days_in_year(year: i32) -> usize {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Number of days in each month of `year`
pub fn month_lengths(year: i32) -> [u32; 12] {
    let february = if is_leap_year(year) { 29 } else { 28 };
    [31, february, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
}

/// 1 January of `year`
pub fn year_start(year: i32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| Error::InvalidInput(format!("year out of range: {}", year)))
}

/// 31 December of `year`
pub fn year_end(year: i32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 12, 31)
        .ok_or_else(|| Error::InvalidInput(format!("year out of range: {}", year)))
}

/// Every day from `start` to `end`, both inclusive. Empty if `end < start`.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if end < start {
        return Vec::new();
    }
    start.iter_days().take_while(|d| *d <= end).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
    }

    #[test]
    fn test_parse_timestamp_keeps_offset() {
        let utc = parse_timestamp("2024-03-05T14:02:11Z").unwrap();
        assert_eq!(utc.date_naive(), day(2024, 3, 5));

        // Late evening west of UTC stays on the local calendar day
        let local = parse_timestamp("2024-03-05T23:30:00-05:00").unwrap();
        assert_eq!(local.date_naive(), day(2024, 3, 5));
        assert_eq!(local.with_timezone(&Utc).date_naive(), day(2024, 3, 6));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(matches!(
            parse_timestamp("2024-03-05"),
            Err(Error::InvalidDate { .. })
        ));
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn test_parse_day() {
        assert_eq!(parse_day("2024-02-29").unwrap(), day(2024, 2, 29));
        assert!(parse_day("2023-02-29").is_err());
        assert!(parse_day("05/03/2024").is_err());
    }

    #[test]
    fn test_label_round_trip() {
        let d = day(2024, 3, 5);
        assert_eq!(format_label(d), "05 Mar, 2024");
        assert_eq!(parse_label("05 Mar, 2024").unwrap(), d);
    }

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert_eq!(days_in_year(2024), 366);
        assert_eq!(days_in_year(2023), 365);
        assert_eq!(month_lengths(2024).iter().sum::<u32>(), 366);
        assert_eq!(month_lengths(2023).iter().sum::<u32>(), 365);
    }

    #[test]
    fn test_date_range_inclusive() {
        let range = date_range(day(2024, 2, 27), day(2024, 3, 1));
        assert_eq!(
            range,
            vec![day(2024, 2, 27), day(2024, 2, 28), day(2024, 2, 29), day(2024, 3, 1)]
        );
        assert_eq!(date_range(day(2024, 3, 1), day(2024, 3, 1)).len(), 1);
        assert!(date_range(day(2024, 3, 2), day(2024, 3, 1)).is_empty());
    }
}

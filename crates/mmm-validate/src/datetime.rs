//! Timestamp parsing for the `date` column.
//!
//! Dates are timezone-naive calendar values. A polars `Datetime` is only
//! accepted without a timezone or in UTC, where the stored instant already is
//! the wall time; any other zone would shift rows to a different day.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::{AnyValue, Column, DataType, PolarsResult, TimeUnit};

use mmm_model::polars_utils::any_to_string;

use crate::error::DateViolation;

/// Days between 0001-01-01 (CE day 1) and 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Parse a timestamp string. Only unambiguous year-first (or month-name)
/// formats are accepted; `01/02/2024` is rejected rather than guessed.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    try_parse_datetime(trimmed).or_else(|| try_parse_date(trimmed).map(start_of_day))
}

/// Parse a calendar date (a timestamp is truncated to its day).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    parse_timestamp(value).map(|timestamp| timestamp.date())
}

/// Read a cell of the `date` column as a timestamp.
pub fn any_to_timestamp(value: AnyValue<'_>) -> Option<NaiveDateTime> {
    match value {
        AnyValue::Null => None,
        AnyValue::Date(days) => days
            .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .map(start_of_day),
        AnyValue::Datetime(value, unit, tz) => {
            let tz = tz.map(ToString::to_string);
            if zone_violation(tz.as_deref()).is_some() {
                return None;
            }
            from_epoch(value, unit)
        }
        AnyValue::String(s) => parse_timestamp(s),
        other => parse_timestamp(&any_to_string(other)),
    }
}

/// Timezones whose wall time equals the stored UTC instant.
const UTC_ZONES: [&str; 2] = ["UTC", "Etc/UTC"];

/// A `date` column in a zone other than UTC cannot be read as naive dates.
pub fn zone_violation(timezone: Option<&str>) -> Option<DateViolation> {
    timezone
        .filter(|tz| !UTC_ZONES.contains(tz))
        .map(|tz| DateViolation::TimezoneAware {
            timezone: tz.to_string(),
        })
}

/// True when `timestamp` cannot be stored in a millisecond column unchanged.
pub fn is_sub_millisecond(timestamp: &NaiveDateTime) -> bool {
    timestamp.and_utc().timestamp_subsec_nanos() % 1_000_000 != 0
}

/// Build a timezone-naive millisecond `Datetime` column.
pub fn timestamps_to_column(name: &str, timestamps: &[NaiveDateTime]) -> PolarsResult<Column> {
    let millis: Vec<i64> = timestamps
        .iter()
        .map(|timestamp| timestamp.and_utc().timestamp_millis())
        .collect();
    Column::new(name.into(), millis).cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn from_epoch(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let instant = match unit {
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(value)),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value),
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value),
    };
    instant.map(|instant| instant.naive_utc())
}

fn try_parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

fn try_parse_date(value: &str) -> Option<NaiveDate> {
    let formats = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%Y%m%d",   // Compact: 20240115
        "%d-%b-%Y", // 15-Jan-2024
    ];
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_time(NaiveTime::MIN)
    }

    #[test]
    fn parses_supported_formats() {
        assert_eq!(parse_timestamp("2024-01-15"), Some(day(2024, 1, 15)));
        assert_eq!(parse_timestamp("2024/01/15"), Some(day(2024, 1, 15)));
        assert_eq!(parse_timestamp("20240115"), Some(day(2024, 1, 15)));
        assert_eq!(parse_timestamp("15-Jan-2024"), Some(day(2024, 1, 15)));
        assert_eq!(
            parse_timestamp("2024-01-15T10:30:00"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(10, 30, 0)
        );
    }

    #[test]
    fn rejects_ambiguous_or_invalid_values() {
        assert_eq!(parse_timestamp("01/02/2024"), None);
        assert_eq!(parse_timestamp("2024-02-30"), None);
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp("  "), None);
    }

    #[test]
    fn reads_polars_temporal_values() {
        assert_eq!(any_to_timestamp(AnyValue::Date(0)), Some(day(1970, 1, 1)));
        assert_eq!(any_to_timestamp(AnyValue::Date(19_723)), Some(day(2024, 1, 1)));
        assert_eq!(
            any_to_timestamp(AnyValue::Datetime(86_400_000, TimeUnit::Milliseconds, None)),
            Some(day(1970, 1, 2))
        );
        assert_eq!(any_to_timestamp(AnyValue::Null), None);
    }

    #[test]
    fn only_utc_zones_are_naive() {
        assert_eq!(zone_violation(None), None);
        assert_eq!(zone_violation(Some("UTC")), None);
        assert_eq!(
            zone_violation(Some("Asia/Tokyo")),
            Some(DateViolation::TimezoneAware {
                timezone: "Asia/Tokyo".to_string()
            })
        );
    }

    #[test]
    fn detects_sub_millisecond_precision() {
        let precise = parse_timestamp("2024-01-01T00:00:00.0001").unwrap();
        assert!(is_sub_millisecond(&precise));
        let millis = parse_timestamp("2024-01-01T00:00:00.123").unwrap();
        assert!(!is_sub_millisecond(&millis));
        assert!(!is_sub_millisecond(&day(2024, 1, 1)));
    }

    #[test]
    fn round_trips_through_datetime_column() {
        let stamps = vec![day(2023, 1, 1), day(2023, 1, 2)];
        let column = timestamps_to_column("date", &stamps).unwrap();
        assert_eq!(
            column.dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        let read: Vec<_> = (0..column.len())
            .map(|idx| any_to_timestamp(column.get(idx).unwrap()))
            .collect();
        assert_eq!(read, vec![Some(stamps[0]), Some(stamps[1])]);
    }
}

//! Temporal invariants of the `date` column.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use polars::prelude::{AnyValue, DataFrame, DataType};

use mmm_model::DATE_COLUMN;
use mmm_model::polars_utils::any_to_string;

use crate::datetime::{any_to_timestamp, is_sub_millisecond, zone_violation};
use crate::error::DateViolation;

/// Parse the `date` column and check it is strictly increasing without
/// duplicates. Returns the parsed timestamps, or every violation found.
///
/// Timestamps must survive storage in a millisecond column: a non-UTC zone
/// or sub-millisecond precision is rejected rather than silently changed.
pub fn check(df: &DataFrame) -> Result<Vec<NaiveDateTime>, Vec<DateViolation>> {
    let Ok(column) = df.column(DATE_COLUMN) else {
        return Err(vec![DateViolation::MissingColumn]);
    };
    if let DataType::Datetime(_, Some(tz)) = column.dtype() {
        let tz = tz.to_string();
        if let Some(violation) = zone_violation(Some(&tz)) {
            return Err(vec![violation]);
        }
    }

    let mut violations = Vec::new();
    let mut timestamps = Vec::with_capacity(df.height());
    let mut first_seen: HashMap<NaiveDateTime, usize> = HashMap::new();
    let mut previous: Option<NaiveDateTime> = None;

    for row in 0..df.height() {
        let value = column.get(row).unwrap_or(AnyValue::Null);
        let Some(timestamp) = any_to_timestamp(value.clone()) else {
            let raw = any_to_string(value);
            violations.push(DateViolation::Unparseable {
                row,
                value: if raw.is_empty() { "null".to_string() } else { raw },
            });
            continue;
        };
        if is_sub_millisecond(&timestamp) {
            violations.push(DateViolation::SubMillisecond {
                row,
                value: timestamp,
            });
            continue;
        }

        if let Some(&first_row) = first_seen.get(&timestamp) {
            violations.push(DateViolation::Duplicate {
                row,
                first_row,
                value: timestamp,
            });
        } else {
            if let Some(prev) = previous
                && timestamp < prev
            {
                violations.push(DateViolation::NotIncreasing {
                    row,
                    previous: prev,
                    value: timestamp,
                });
            }
            first_seen.insert(timestamp, row);
        }
        previous = Some(timestamp);
        timestamps.push(timestamp);
    }

    if violations.is_empty() {
        Ok(timestamps)
    } else {
        Err(violations)
    }
}

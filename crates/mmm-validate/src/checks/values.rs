//! Per-role value rules.

use polars::prelude::{DataFrame, PolarsResult};
use tracing::debug;

use mmm_model::infer_role;
use mmm_model::polars_utils::column_f64_values;

use crate::error::{MAX_SAMPLES, ValueRule, ValueViolation};

/// Check every role-constrained column. Assumes the type check passed.
pub fn check(df: &DataFrame) -> PolarsResult<Vec<ValueViolation>> {
    let mut violations = Vec::new();

    for column in df.get_columns() {
        let name = column.name().as_str();
        let Some(role) = infer_role(name) else {
            continue;
        };
        let Some(rule) = ValueRule::for_role(role) else {
            continue;
        };

        let values = column_f64_values(column)?;
        let offending: Vec<usize> = values
            .iter()
            .enumerate()
            .filter(|(_, value)| breaks(rule, **value))
            .map(|(row, _)| row)
            .collect();

        if offending.is_empty() {
            continue;
        }
        debug!(column = name, ?rule, count = offending.len(), "Value rule violated");
        violations.push(ValueViolation {
            column: name.to_string(),
            role,
            rule,
            count: offending.len(),
            rows: offending.into_iter().take(MAX_SAMPLES).collect(),
        });
    }

    Ok(violations)
}

fn breaks(rule: ValueRule, value: Option<f64>) -> bool {
    match (rule, value) {
        (ValueRule::NoMissing, None) => true,
        (ValueRule::NoMissing, Some(v)) => v.is_nan(),
        // Nulls are tolerated outside targets.
        (_, None) => false,
        (ValueRule::NonNegative, Some(v)) => v.is_nan() || v < 0.0,
        (ValueRule::UnitInterval, Some(v)) => !(0.0..=1.0).contains(&v),
    }
}

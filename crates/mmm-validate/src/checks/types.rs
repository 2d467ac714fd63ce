//! Every non-date column must be numeric.

use polars::prelude::DataFrame;

use mmm_model::DATE_COLUMN;
use mmm_model::polars_utils::is_numeric_dtype;

use crate::error::TypeViolation;

pub fn check(df: &DataFrame) -> Vec<TypeViolation> {
    df.get_columns()
        .iter()
        .filter(|column| column.name().as_str() != DATE_COLUMN)
        .filter(|column| !is_numeric_dtype(column.dtype()))
        .map(|column| TypeViolation {
            column: column.name().to_string(),
            dtype: column.dtype().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use polars::prelude::Column;

    use super::*;

    #[test]
    fn flags_string_columns_only() {
        let df = DataFrame::new(vec![
            Column::new(DATE_COLUMN.into(), vec!["2024-01-01"]),
            Column::new("target__sales".into(), vec![1i64]),
            Column::new("control__price".into(), vec![1.5f32]),
            Column::new("control__region".into(), vec!["north"]),
        ])
        .unwrap();
        let violations = check(&df);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].column, "control__region");
    }
}

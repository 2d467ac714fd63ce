//! Contract construction against hand-built tables.

use chrono::NaiveDate;
use mmm_model::{ErrorKind, Role};
use mmm_validate::{ContractError, DatasetContract, DateViolation, ValueRule};
use polars::prelude::{Column, DataFrame, DataType, TimeUnit};

fn table(dates: &[&str], columns: Vec<Column>) -> DataFrame {
    let mut all = vec![Column::new("date".into(), dates.to_vec())];
    all.extend(columns);
    DataFrame::new(all).unwrap()
}

fn week() -> Vec<&'static str> {
    vec![
        "2023-01-01",
        "2023-01-02",
        "2023-01-03",
        "2023-01-04",
        "2023-01-05",
        "2023-01-06",
        "2023-01-07",
    ]
}

fn sales(values: &[f64]) -> Column {
    Column::new("target__sales".into(), values.to_vec())
}

#[test]
fn builds_dataset_and_role_index() {
    let df = table(
        &week(),
        vec![
            sales(&[10.0, 12.0, 11.0, 13.0, 15.0, 14.0, 16.0]),
            Column::new("media__tv__spend".into(), vec![0i64, 5, 3, 0, 1, 2, 9]),
            Column::new("control__price".into(), vec![1.0; 7]),
        ],
    );
    let dataset = DatasetContract::from_table(df).unwrap();

    assert_eq!(dataset.height(), 7);
    assert_eq!(
        dataset.column_names(),
        vec!["date", "target__sales", "media__tv__spend", "control__price"]
    );
    assert_eq!(dataset.columns_by_role(Role::Target), ["target__sales"]);
    assert_eq!(dataset.columns_by_role(Role::Media), ["media__tv__spend"]);
    assert_eq!(dataset.columns_by_role(Role::Date), ["date"]);
    assert!(dataset.columns_by_role(Role::Event).is_empty());
    assert_eq!(
        dataset.table().column("date").unwrap().dtype(),
        &DataType::Datetime(TimeUnit::Milliseconds, None)
    );
    assert_eq!(
        dataset.dates()[2].date(),
        NaiveDate::from_ymd_opt(2023, 1, 3).unwrap()
    );
}

#[test]
fn decreasing_dates_fail() {
    let df = table(&["2024-01-02", "2024-01-01"], vec![sales(&[1.0, 2.0])]);
    let err = DatasetContract::from_table(df).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Contract);
    match err {
        ContractError::DateContract { violations } => {
            assert_eq!(violations.len(), 1);
            assert!(matches!(violations[0], DateViolation::NotIncreasing { row: 1, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn duplicate_dates_fail() {
    let df = table(&["2024-01-01", "2024-01-01"], vec![sales(&[1.0, 2.0])]);
    match DatasetContract::from_table(df).unwrap_err() {
        ContractError::DateContract { violations } => {
            assert!(matches!(
                violations[..],
                [DateViolation::Duplicate {
                    row: 1,
                    first_row: 0,
                    ..
                }]
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_date_column_fails() {
    let df = DataFrame::new(vec![sales(&[1.0])]).unwrap();
    let err = DatasetContract::from_table(df).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"date contract violated: missing required 'date' column"
    );
}

#[test]
fn non_canonical_names_fail_as_schema_errors() {
    let df = table(
        &["2024-01-01"],
        vec![sales(&[1.0]), Column::new("TV Spend".into(), vec![1.0])],
    );
    let err = DatasetContract::from_table(df).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
    match err {
        ContractError::NamingContract { invalid } => {
            assert_eq!(invalid.len(), 1);
            assert_eq!(invalid[0].name, "TV Spend");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn target_is_required() {
    let df = table(
        &["2024-01-01"],
        vec![Column::new("media__tv__spend".into(), vec![1.0])],
    );
    assert!(matches!(
        DatasetContract::from_table(df).unwrap_err(),
        ContractError::MissingTarget
    ));
}

#[test]
fn non_numeric_columns_fail() {
    let df = table(
        &["2024-01-01"],
        vec![
            sales(&[1.0]),
            Column::new("control__region".into(), vec!["north"]),
        ],
    );
    match DatasetContract::from_table(df).unwrap_err() {
        ContractError::TypeContract { violations } => {
            assert_eq!(violations[0].column, "control__region");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn negative_media_fails_and_non_negative_passes() {
    let dates = ["2024-01-01", "2024-01-02", "2024-01-03"];
    let bad = table(
        &dates,
        vec![
            sales(&[1.0, 2.0, 3.0]),
            Column::new("media__tv__spend".into(), vec![0.0, -1.0, 4.0]),
        ],
    );
    match DatasetContract::from_table(bad).unwrap_err() {
        ContractError::ValueContract { violations } => {
            assert_eq!(violations.len(), 1);
            assert_eq!(violations[0].column, "media__tv__spend");
            assert_eq!(violations[0].role, Role::Media);
            assert_eq!(violations[0].rule, ValueRule::NonNegative);
            assert_eq!(violations[0].rows, vec![1]);
        }
        other => panic!("unexpected error: {other}"),
    }

    let good = table(
        &dates,
        vec![
            sales(&[1.0, 2.0, 3.0]),
            Column::new("media__tv__spend".into(), vec![0.0, 2.5, 4.0]),
        ],
    );
    assert!(DatasetContract::from_table(good).is_ok());
}

#[test]
fn missing_targets_and_out_of_range_events_fail() {
    let df = table(
        &["2024-01-01", "2024-01-02"],
        vec![
            Column::new("target__sales".into(), vec![Some(1.0), None]),
            Column::new("event__promo".into(), vec![0.0, 2.0]),
        ],
    );
    match DatasetContract::from_table(df).unwrap_err() {
        ContractError::ValueContract { violations } => {
            let rules: Vec<ValueRule> = violations.iter().map(|v| v.rule).collect();
            assert_eq!(rules, vec![ValueRule::NoMissing, ValueRule::UnitInterval]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn between_keeps_inclusive_range() {
    let df = table(&week(), vec![sales(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0])]);
    let dataset = DatasetContract::from_table(df).unwrap();

    let slice = dataset
        .between(
            NaiveDate::from_ymd_opt(2023, 1, 3).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 5).unwrap(),
        )
        .unwrap();
    assert_eq!(slice.height(), 3);
    assert_eq!(
        slice.dates()[0].date(),
        NaiveDate::from_ymd_opt(2023, 1, 3).unwrap()
    );
    assert_eq!(dataset.height(), 7);
}

#[test]
fn with_columns_revalidates_and_leaves_original_untouched() {
    let df = table(&["2024-01-01", "2024-01-02"], vec![sales(&[1.0, 2.0])]);
    let dataset = DatasetContract::from_table(df).unwrap();

    let enriched = dataset
        .with_columns(vec![Column::new("event__promo".into(), vec![0.0, 1.0])])
        .unwrap();
    assert_eq!(enriched.columns_by_role(Role::Event), ["event__promo"]);
    assert!(!dataset.has_column("event__promo"));

    let err = dataset
        .with_columns(vec![Column::new("target__sales".into(), vec![0.0, 1.0])])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Collision);

    let err = dataset
        .with_columns(vec![Column::new("event__promo".into(), vec![0.0, 3.0])])
        .unwrap_err();
    assert!(matches!(err, ContractError::ValueContract { .. }));
}

#[test]
fn value_violations_serialize() {
    let df = table(
        &["2024-01-01"],
        vec![sales(&[1.0]), Column::new("media__tv__spend".into(), vec![-2.0])],
    );
    let ContractError::ValueContract { violations } = DatasetContract::from_table(df).unwrap_err()
    else {
        panic!("expected a value contract error");
    };
    insta::assert_json_snapshot!(violations, @r#"
    [
      {
        "column": "media__tv__spend",
        "role": "media",
        "rule": "non_negative",
        "count": 1,
        "rows": [
          0
        ]
      }
    ]
    "#);
}

#[test]
fn stored_table_satisfies_the_contract_again() {
    let df = table(
        &["2024-01-01T00:00:00.001", "2024-01-01T00:00:00.002", "2024-01-02"],
        vec![sales(&[1.0, 2.0, 3.0])],
    );
    let dataset = DatasetContract::from_table(df).unwrap();

    let again = DatasetContract::from_table(dataset.table().clone()).unwrap();
    assert_eq!(again.dates(), dataset.dates());
    assert!(again.table().equals(dataset.table()));
}

#[test]
fn sub_millisecond_dates_are_rejected_before_storage() {
    let df = table(
        &["2024-01-01T00:00:00.0001", "2024-01-01T00:00:00.0002"],
        vec![sales(&[1.0, 2.0])],
    );
    match DatasetContract::from_table(df).unwrap_err() {
        ContractError::DateContract { violations } => {
            assert!(
                violations
                    .iter()
                    .all(|v| matches!(v, DateViolation::SubMillisecond { .. }))
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

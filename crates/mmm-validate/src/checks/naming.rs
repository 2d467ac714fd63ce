//! Every column must carry a canonical name.

use polars::prelude::DataFrame;

use mmm_model::InvalidName;
use mmm_model::naming;

pub fn check(df: &DataFrame) -> Vec<InvalidName> {
    df.get_column_names()
        .into_iter()
        .filter_map(|name| {
            naming::validate(name.as_str())
                .err()
                .map(|violation| InvalidName {
                    name: name.to_string(),
                    violation,
                })
        })
        .collect()
}

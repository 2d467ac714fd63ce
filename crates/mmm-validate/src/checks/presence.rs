//! At least one target column.

use polars::prelude::DataFrame;

use mmm_model::{Role, infer_role};

pub fn has_target(df: &DataFrame) -> bool {
    df.get_column_names()
        .into_iter()
        .any(|name| infer_role(name.as_str()) == Some(Role::Target))
}

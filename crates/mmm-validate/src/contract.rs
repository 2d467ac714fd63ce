//! Dataset contract: the gate between a renamed table and a [`Dataset`].

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use tracing::{debug, info, warn};

use mmm_model::{DATE_COLUMN, Role, infer_role};

use crate::checks;
use crate::dataset::Dataset;
use crate::datetime::timestamps_to_column;
use crate::error::ContractError;

/// Validates canonically named tables.
///
/// Classes are checked in a fixed order: dates, naming, target presence,
/// column types, per-role values. The first class with offenders fails the
/// call, listing all of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatasetContract;

impl DatasetContract {
    /// Validate `table` and build a [`Dataset`] from it.
    ///
    /// On success the `date` column is rewritten as a timezone-naive
    /// millisecond `Datetime` column.
    pub fn from_table(table: DataFrame) -> Result<Dataset, ContractError> {
        let dates = checks::dates::check(&table).map_err(|violations| {
            warn!(count = violations.len(), "Date contract violated");
            ContractError::DateContract { violations }
        })?;

        let invalid = checks::naming::check(&table);
        if !invalid.is_empty() {
            warn!(count = invalid.len(), "Non-canonical column names");
            return Err(ContractError::NamingContract { invalid });
        }

        if !checks::presence::has_target(&table) {
            return Err(ContractError::MissingTarget);
        }

        let violations = checks::types::check(&table);
        if !violations.is_empty() {
            return Err(ContractError::TypeContract { violations });
        }

        let violations = checks::values::check(&table)?;
        if !violations.is_empty() {
            return Err(ContractError::ValueContract { violations });
        }

        let mut table = table;
        table.with_column(timestamps_to_column(DATE_COLUMN, &dates)?)?;
        let role_index = build_role_index(&table);

        debug!(roles = ?role_index, "Built role index");
        info!(
            rows = table.height(),
            columns = table.width(),
            "Dataset contract satisfied"
        );
        Ok(Dataset::new(table, dates, role_index))
    }
}

fn build_role_index(table: &DataFrame) -> BTreeMap<Role, Vec<String>> {
    let mut index: BTreeMap<Role, Vec<String>> = BTreeMap::new();
    for name in table.get_column_names() {
        if let Some(role) = infer_role(name.as_str()) {
            index.entry(role).or_default().push(name.to_string());
        }
    }
    index
}

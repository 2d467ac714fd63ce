//! The validated table handed to transformers and downstream consumers.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::{BooleanChunked, Column, DataFrame, NewChunkedArray};
use tracing::debug;

use mmm_model::Role;

use crate::contract::DatasetContract;
use crate::error::ContractError;

/// A table that satisfies the dataset contract.
///
/// Immutable: every operation that changes columns or rows returns a new,
/// re-validated value.
#[derive(Debug, Clone)]
pub struct Dataset {
    table: DataFrame,
    dates: Vec<NaiveDateTime>,
    role_index: BTreeMap<Role, Vec<String>>,
}

impl Dataset {
    pub(crate) fn new(
        table: DataFrame,
        dates: Vec<NaiveDateTime>,
        role_index: BTreeMap<Role, Vec<String>>,
    ) -> Self {
        Self {
            table,
            dates,
            role_index,
        }
    }

    pub fn table(&self) -> &DataFrame {
        &self.table
    }

    /// Parsed `date` values, strictly increasing.
    pub fn dates(&self) -> &[NaiveDateTime] {
        &self.dates
    }

    pub fn height(&self) -> usize {
        self.table.height()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.table
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Column names grouped by role, in table order within each role.
    pub fn role_index(&self) -> &BTreeMap<Role, Vec<String>> {
        &self.role_index
    }

    pub fn columns_by_role(&self, role: Role) -> &[String] {
        self.role_index
            .get(&role)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.table.column(name).is_ok()
    }

    pub fn into_table(self) -> DataFrame {
        self.table
    }

    /// Rows whose calendar day lies in `start..=end`.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Result<Dataset, ContractError> {
        let mask: Vec<bool> = self
            .dates
            .iter()
            .map(|timestamp| (start..=end).contains(&timestamp.date()))
            .collect();
        let mask = BooleanChunked::from_slice("keep".into(), &mask);
        let table = self.table.filter(&mask)?;
        debug!(%start, %end, rows = table.height(), "Sliced dataset by date");
        DatasetContract::from_table(table)
    }

    /// Append `columns` and re-validate the result. `self` is untouched.
    pub fn with_columns(&self, columns: Vec<Column>) -> Result<Dataset, ContractError> {
        let mut seen: BTreeSet<String> = BTreeSet::new();
        for column in &columns {
            let name = column.name().to_string();
            if self.has_column(&name) || !seen.insert(name.clone()) {
                return Err(ContractError::DuplicateColumn { column: name });
            }
        }

        let mut table = self.table.clone();
        for column in columns {
            table.with_column(column)?;
        }
        DatasetContract::from_table(table)
    }
}

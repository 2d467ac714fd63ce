//! Error types for dataset contract validation.

use std::fmt;

use chrono::NaiveDateTime;
use mmm_model::{ErrorKind, InvalidName, Role};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of offending rows quoted per violation.
pub const MAX_SAMPLES: usize = 5;

/// One breach of the `date` column invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DateViolation {
    /// No column named `date`.
    MissingColumn,
    /// Timezone-aware `Datetime` column outside UTC.
    TimezoneAware { timezone: String },
    /// Null or a value in no accepted format.
    Unparseable { row: usize, value: String },
    /// Precision that a millisecond column would truncate.
    SubMillisecond { row: usize, value: NaiveDateTime },
    /// Same timestamp as an earlier row.
    Duplicate {
        row: usize,
        first_row: usize,
        value: NaiveDateTime,
    },
    /// Earlier than the previous row.
    NotIncreasing {
        row: usize,
        previous: NaiveDateTime,
        value: NaiveDateTime,
    },
}

impl fmt::Display for DateViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumn => write!(f, "missing required 'date' column"),
            Self::TimezoneAware { timezone } => write!(
                f,
                "'date' column is in timezone '{timezone}'; convert it to naive local dates"
            ),
            Self::Unparseable { row, value } => {
                write!(f, "row {row}: '{value}' cannot be parsed as a date")
            }
            Self::SubMillisecond { row, value } => {
                write!(f, "row {row}: {value} is more precise than one millisecond")
            }
            Self::Duplicate {
                row,
                first_row,
                value,
            } => write!(f, "row {row}: duplicate date {value} (first seen at row {first_row})"),
            Self::NotIncreasing {
                row,
                previous,
                value,
            } => write!(f, "row {row}: {value} is not after previous date {previous}"),
        }
    }
}

/// A non-`date` column whose type is not numeric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeViolation {
    pub column: String,
    pub dtype: String,
}

impl fmt::Display for TypeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' has type {}", self.column, self.dtype)
    }
}

/// Per-role value rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueRule {
    /// `target__*`: no null or NaN entries.
    NoMissing,
    /// `media__*`: every value >= 0.
    NonNegative,
    /// `event__*`: every value in [0, 1].
    UnitInterval,
}

impl ValueRule {
    pub fn for_role(role: Role) -> Option<Self> {
        match role {
            Role::Target => Some(Self::NoMissing),
            Role::Media => Some(Self::NonNegative),
            Role::Event => Some(Self::UnitInterval),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::NoMissing => "must not contain missing values",
            Self::NonNegative => "must be >= 0",
            Self::UnitInterval => "must be in [0, 1]",
        }
    }
}

/// A column breaking its role's value rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueViolation {
    pub column: String,
    pub role: Role,
    pub rule: ValueRule,
    /// Total offending rows.
    pub count: usize,
    /// First offending row positions (at most [`MAX_SAMPLES`]).
    pub rows: Vec<usize>,
}

impl fmt::Display for ValueViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} column '{}' {} ({} row(s), e.g. rows {:?})",
            self.role,
            self.column,
            self.rule.description(),
            self.count,
            self.rows
        )
    }
}

/// Errors from [`crate::DatasetContract::from_table`].
///
/// Validation stops at the first failing class; the variant lists every
/// offender of that class.
#[derive(Debug, Error)]
pub enum ContractError {
    // === Contract Errors ===
    /// Missing, unparseable, duplicate or out-of-order dates.
    #[error("date contract violated: {}", summarize(.violations))]
    DateContract { violations: Vec<DateViolation> },

    /// Columns whose names do not parse under the naming grammar.
    #[error("column name(s) do not follow the naming convention: {}", summarize(.invalid))]
    NamingContract { invalid: Vec<InvalidName> },

    /// No `target__*` column.
    #[error("no target column found (expected at least one 'target__*' column)")]
    MissingTarget,

    /// Non-`date` columns that are not integer or floating point.
    #[error("non-numeric column(s): {}", summarize(.violations))]
    TypeContract { violations: Vec<TypeViolation> },

    /// Columns breaking their role's value rule.
    #[error("value contract violated: {}", summarize(.violations))]
    ValueContract { violations: Vec<ValueViolation> },

    // === Enrichment Errors ===
    /// An appended column reuses an existing name.
    #[error("column '{column}' already exists in the dataset")]
    DuplicateColumn { column: String },

    // === Polars Errors ===
    /// Unexpected failure of the underlying table engine.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl ContractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NamingContract { .. } => ErrorKind::Schema,
            Self::DuplicateColumn { .. } => ErrorKind::Collision,
            Self::DataFrame { .. } => ErrorKind::Internal,
            Self::DateContract { .. }
            | Self::MissingTarget
            | Self::TypeContract { .. }
            | Self::ValueContract { .. } => ErrorKind::Contract,
        }
    }
}

impl From<polars::prelude::PolarsError> for ContractError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

fn summarize<T: fmt::Display>(items: &[T]) -> String {
    let mut out = items
        .iter()
        .take(MAX_SAMPLES)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    if items.len() > MAX_SAMPLES {
        out.push_str(&format!("; ... and {} more", items.len() - MAX_SAMPLES));
    }
    out
}

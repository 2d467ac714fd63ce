//! Error types for column mapping.

use std::fmt;

use mmm_model::{ErrorKind, InvalidName};
use thiserror::Error;

/// Two distinct raw labels that normalize to the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationCollision {
    pub first: String,
    pub second: String,
    pub normalized: String,
}

impl fmt::Display for NormalizationCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' & '{}' -> '{}'",
            self.first, self.second, self.normalized
        )
    }
}

/// A mapping target that cannot be assigned unambiguously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetConflict {
    /// Several sources map to the same target.
    DuplicateTarget {
        target: String,
        sources: Vec<String>,
    },
    /// The target equals a kept, unmapped column that would be shadowed.
    ShadowsUnmapped { target: String, source: String },
}

impl fmt::Display for TargetConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateTarget { target, sources } => {
                write!(f, "{sources:?} -> '{target}'")
            }
            Self::ShadowsUnmapped { target, source } => write!(
                f,
                "'{source}' -> '{target}' shadows the existing unmapped column '{target}'"
            ),
        }
    }
}

/// Errors from [`crate::ColumnMapper::apply`]. No variant leaves a partial result.
#[derive(Debug, Error)]
pub enum MappingError {
    // === Normalization ===
    /// Distinct raw columns (or mapping keys) normalize to the same name.
    #[error("normalization produced column collisions: {}", join(.collisions))]
    NormalizationCollision {
        collisions: Vec<NormalizationCollision>,
    },

    // === Sources ===
    /// Mapping sources absent from the (possibly normalized) table.
    #[error("missing source column(s) in dataset: {missing:?}")]
    SourceMissing { missing: Vec<String> },

    // === Targets ===
    /// Targets shared by several sources or shadowing a kept column.
    #[error(
        "target column collision(s): {}; map/rename the shadowed column too, or disable keep_unmapped",
        join(.conflicts)
    )]
    TargetCollision { conflicts: Vec<TargetConflict> },

    /// Targets that do not follow the naming grammar.
    #[error("invalid target column name(s): {}", join(.invalid))]
    InvalidTargetName { invalid: Vec<InvalidName> },

    // === Polars Errors ===
    /// Unexpected failure while building the renamed table.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl MappingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NormalizationCollision { .. } | Self::TargetCollision { .. } => {
                ErrorKind::Collision
            }
            Self::SourceMissing { .. } | Self::InvalidTargetName { .. } => ErrorKind::Schema,
            Self::DataFrame { .. } => ErrorKind::Internal,
        }
    }
}

impl From<polars::prelude::PolarsError> for MappingError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

//! Error types for feature transformers and the pipeline.

use mmm_model::ErrorKind;
use mmm_validate::ContractError;
use thiserror::Error;

/// Errors from feature transformers and [`crate::FeaturePipeline::run`].
#[derive(Debug, Error)]
pub enum FeatureError {
    // === Collision Errors ===
    /// A transformer would emit a column the dataset (or an earlier step)
    /// already has.
    #[error("{transformer}: column '{column}' already exists")]
    ColumnCollision { transformer: String, column: String },

    // === Parameter Errors ===
    /// Out-of-range numeric parameter or non-canonical output column.
    #[error("{transformer}: invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        transformer: String,
        parameter: String,
        reason: String,
    },

    /// Event name outside the lowercase snake_case charset.
    #[error("invalid event name '{name}' (must be lowercase snake_case without '__')")]
    InvalidEventName { name: String },

    /// Event date in no accepted format.
    #[error("event '{event}': cannot parse date '{value}'")]
    InvalidEventDate { event: String, value: String },

    // === Dataset Errors ===
    /// Unexpected failure of the underlying table engine.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    /// The enriched table fails re-validation.
    #[error("enriched dataset violates the contract: {0}")]
    Contract(#[from] ContractError),
}

impl FeatureError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ColumnCollision { .. } => ErrorKind::Collision,
            Self::InvalidParameter { .. }
            | Self::InvalidEventName { .. }
            | Self::InvalidEventDate { .. } => ErrorKind::Parameter,
            Self::DataFrame { .. } => ErrorKind::Internal,
            Self::Contract(err) => err.kind(),
        }
    }

    pub(crate) fn collision(transformer: &str, column: impl Into<String>) -> Self {
        Self::ColumnCollision {
            transformer: transformer.to_string(),
            column: column.into(),
        }
    }

    pub(crate) fn parameter(
        transformer: &str,
        parameter: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            transformer: transformer.to_string(),
            parameter: parameter.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<polars::prelude::PolarsError> for FeatureError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

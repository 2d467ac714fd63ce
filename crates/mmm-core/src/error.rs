//! Error type for the end-to-end preparation.

use mmm_map::MappingError;
use mmm_model::ErrorKind;
use mmm_transform::FeatureError;
use mmm_validate::ContractError;
use thiserror::Error;

/// Failure of one [`crate::prepare_dataset`] stage.
#[derive(Debug, Error)]
pub enum PrepareError {
    /// Renaming client columns failed.
    #[error("column mapping failed: {0}")]
    Mapping(#[from] MappingError),

    /// The renamed table is not a valid dataset.
    #[error("dataset contract failed: {0}")]
    Contract(#[from] ContractError),

    /// A transformer or the enriched dataset failed.
    #[error("feature pipeline failed: {0}")]
    Feature(#[from] FeatureError),
}

impl PrepareError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Mapping(err) => err.kind(),
            Self::Contract(err) => err.kind(),
            Self::Feature(err) => err.kind(),
        }
    }

    /// Stage that failed: `map`, `validate` or `features`.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Mapping(_) => "map",
            Self::Contract(_) => "validate",
            Self::Feature(_) => "features",
        }
    }
}

//! The transformer capability shared by built-in and third-party features.

use mmm_model::FeatureStep;
use mmm_validate::Dataset;
use polars::prelude::Column;

use crate::error::FeatureError;

/// Columns produced by one transformer invocation plus its lineage record.
#[derive(Debug, Clone)]
pub struct FeatureOutput {
    pub columns: Vec<Column>,
    pub step: FeatureStep,
}

/// A stateless feature generator.
///
/// Implementations read only their own parameters and the given dataset, and
/// must never emit a column name the dataset already has.
pub trait FeatureTransformer: Send + Sync {
    /// Name recorded in the [`FeatureStep`].
    fn name(&self) -> &str;

    /// Check parameters without touching any data.
    ///
    /// Default implementation accepts everything.
    fn validate(&self) -> Result<(), FeatureError> {
        Ok(())
    }

    fn transform(&self, dataset: &Dataset) -> Result<FeatureOutput, FeatureError>;
}

/// Fail with a column collision if `column` is already in `dataset`.
pub fn ensure_absent(
    transformer: &str,
    dataset: &Dataset,
    column: &str,
) -> Result<(), FeatureError> {
    if dataset.has_column(column) {
        Err(FeatureError::collision(transformer, column))
    } else {
        Ok(())
    }
}

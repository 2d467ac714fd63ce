//! Linear time trend.

use mmm_model::{FeatureStep, naming};
use mmm_validate::Dataset;
use polars::prelude::Column;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FeatureError;
use crate::transformer::{FeatureOutput, FeatureTransformer, ensure_absent};

pub const TREND_COLUMN: &str = "baseline__trend";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Rescale the row rank to [0, 1]. Default: true.
    pub normalize: bool,
    /// Output column. Default: `baseline__trend`.
    pub column: String,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            normalize: true,
            column: TREND_COLUMN.to_string(),
        }
    }
}

impl TrendConfig {
    #[must_use]
    pub fn with_normalize(mut self, enable: bool) -> Self {
        self.normalize = enable;
        self
    }

    #[must_use]
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }
}

/// One column holding each row's 0-based temporal rank, optionally
/// rescaled so the first row is 0 and the last is 1.
#[derive(Debug, Clone, Default)]
pub struct TrendTransformer {
    config: TrendConfig,
}

impl TrendTransformer {
    pub fn new(config: TrendConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrendConfig {
        &self.config
    }
}

impl FeatureTransformer for TrendTransformer {
    fn name(&self) -> &str {
        "TrendTransformer"
    }

    fn validate(&self) -> Result<(), FeatureError> {
        naming::validate(&self.config.column).map_err(|violation| {
            FeatureError::parameter(self.name(), "column", violation.to_string())
        })
    }

    fn transform(&self, dataset: &Dataset) -> Result<FeatureOutput, FeatureError> {
        self.validate()?;
        ensure_absent(self.name(), dataset, &self.config.column)?;

        let values = trend_values(dataset.height(), self.config.normalize);
        debug!(rows = values.len(), normalize = self.config.normalize, "Computed trend");

        let step = FeatureStep::new(self.name())
            .with_param("normalize", self.config.normalize)
            .with_param("column", self.config.column.as_str())
            .with_added_features(vec![self.config.column.clone()]);
        Ok(FeatureOutput {
            columns: vec![Column::new(self.config.column.as_str().into(), values)],
            step,
        })
    }
}

fn trend_values(n: usize, normalize: bool) -> Vec<f64> {
    let last = n.saturating_sub(1) as f64;
    (0..n)
        .map(|rank| {
            let rank = rank as f64;
            if normalize && n > 1 { rank / last } else { rank }
        })
        .collect()
}

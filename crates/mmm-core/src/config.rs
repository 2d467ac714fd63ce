//! Ingestion configuration.

use mmm_map::MappingSpec;
use mmm_transform::FeatureConfig;
use serde::{Deserialize, Serialize};

/// Everything [`crate::prepare_dataset`] needs besides the raw table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestConfig {
    #[serde(default)]
    pub mapping: MappingSpec,
    /// Transformers to run, in order.
    #[serde(default)]
    pub features: Vec<FeatureConfig>,
}

impl IngestConfig {
    pub fn new(mapping: MappingSpec) -> Self {
        Self {
            mapping,
            features: Vec::new(),
        }
    }

    /// Append a transformer to the feature list.
    #[must_use]
    pub fn with_feature(mut self, feature: impl Into<FeatureConfig>) -> Self {
        self.features.push(feature.into());
        self
    }

    #[must_use]
    pub fn with_features(mut self, features: Vec<FeatureConfig>) -> Self {
        self.features = features;
        self
    }
}

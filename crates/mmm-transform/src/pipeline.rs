//! Ordered feature enrichment with lineage.

use std::collections::BTreeSet;

use mmm_model::FeatureReport;
use mmm_validate::Dataset;
use tracing::{debug, info};

use crate::config::FeatureConfig;
use crate::error::FeatureError;
use crate::transformer::FeatureTransformer;

/// Runs transformers in order and folds their steps into a [`FeatureReport`].
///
/// Holds no per-run state; one pipeline may serve any number of runs.
#[derive(Default)]
pub struct FeaturePipeline {
    transformers: Vec<Box<dyn FeatureTransformer>>,
}

impl FeaturePipeline {
    pub fn new(transformers: Vec<Box<dyn FeatureTransformer>>) -> Self {
        Self { transformers }
    }

    pub fn from_configs(configs: &[FeatureConfig]) -> Self {
        Self::new(configs.iter().map(FeatureConfig::build).collect())
    }

    /// Add a transformer to the end of the pipeline.
    #[must_use]
    pub fn add_transformer(mut self, transformer: Box<dyn FeatureTransformer>) -> Self {
        self.transformers.push(transformer);
        self
    }

    /// Transformer names in execution order.
    pub fn transformer_names(&self) -> Vec<&str> {
        self.transformers.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    /// Enrich `dataset`. All-or-nothing: any failure discards every column
    /// computed so far, and `dataset` itself is never modified.
    ///
    /// Every transformer's parameters are validated before any column is
    /// computed. Each step's columns are checked against the original
    /// columns plus all columns added earlier in this run, then appended
    /// through [`Dataset::with_columns`], which re-validates the contract.
    pub fn run(&self, dataset: &Dataset) -> Result<(Dataset, FeatureReport), FeatureError> {
        for transformer in &self.transformers {
            transformer.validate()?;
        }

        let mut known: BTreeSet<String> = dataset.column_names().into_iter().collect();
        let mut current = dataset.clone();
        let mut steps = Vec::with_capacity(self.transformers.len());

        for transformer in &self.transformers {
            let output = transformer.transform(&current)?;
            for column in &output.columns {
                let name = column.name().to_string();
                if !known.insert(name.clone()) {
                    return Err(FeatureError::ColumnCollision {
                        transformer: transformer.name().to_string(),
                        column: name,
                    });
                }
            }
            debug!(
                transformer = transformer.name(),
                added = ?output.step.added_features,
                "Feature step complete"
            );
            current = current.with_columns(output.columns)?;
            steps.push(output.step);
        }

        let report = FeatureReport::from_steps(steps);
        info!(
            steps = report.steps().len(),
            added = report.added_features().len(),
            columns = current.column_names().len(),
            "Feature pipeline complete"
        );
        Ok((current, report))
    }
}

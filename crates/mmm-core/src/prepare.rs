//! Mapping, contract and enrichment in one call.

use mmm_map::{ColumnMapper, MappingReport};
use mmm_model::FeatureReport;
use mmm_transform::FeaturePipeline;
use mmm_validate::{Dataset, DatasetContract};
use polars::prelude::DataFrame;
use tracing::{info, info_span};

use crate::config::IngestConfig;
use crate::error::PrepareError;

/// A validated, enriched dataset with the reports of every stage.
#[derive(Debug, Clone)]
pub struct PreparedDataset {
    pub dataset: Dataset,
    pub mapping_report: MappingReport,
    pub feature_report: FeatureReport,
}

/// Run mapper, contract and feature pipeline over a raw client table.
///
/// The first failing stage aborts the call; `raw` is never modified.
pub fn prepare_dataset(
    raw: &DataFrame,
    config: &IngestConfig,
) -> Result<PreparedDataset, PrepareError> {
    let span = info_span!("prepare", rows = raw.height(), columns = raw.width());
    let _guard = span.enter();

    let (mapped, mapping_report) =
        info_span!("map").in_scope(|| ColumnMapper::new(config.mapping.clone()).apply(raw))?;

    let dataset = info_span!("validate").in_scope(|| DatasetContract::from_table(mapped))?;

    let pipeline = FeaturePipeline::from_configs(&config.features);
    let (dataset, feature_report) =
        info_span!("features", transformers = pipeline.len()).in_scope(|| pipeline.run(&dataset))?;

    info!(
        rows = dataset.height(),
        columns = dataset.column_names().len(),
        features = feature_report.added_features().len(),
        "Dataset prepared"
    );
    Ok(PreparedDataset {
        dataset,
        mapping_report,
        feature_report,
    })
}

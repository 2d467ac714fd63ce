//! Explicit renaming of client columns into canonical names.

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use mmm_model::InvalidName;
use mmm_model::naming;
use polars::prelude::{Column, DataFrame};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{MappingError, NormalizationCollision, TargetConflict};
use crate::normalize::normalize_column_name;

/// Caller-supplied renaming rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingSpec {
    /// Raw source column -> canonical target, in declaration order.
    pub mapping: IndexMap<String, String>,

    /// Normalize source column names (and mapping keys) before matching.
    /// Default: false.
    #[serde(default)]
    pub normalize_source_columns: bool,

    /// Keep columns that are not mapping sources. Default: true.
    #[serde(default = "default_keep_unmapped")]
    pub keep_unmapped: bool,
}

fn default_keep_unmapped() -> bool {
    true
}

impl MappingSpec {
    pub fn new<I, S, T>(mapping: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            mapping: mapping
                .into_iter()
                .map(|(source, target)| (source.into(), target.into()))
                .collect(),
            normalize_source_columns: false,
            keep_unmapped: true,
        }
    }

    #[must_use]
    pub fn with_normalize_source_columns(mut self, enable: bool) -> Self {
        self.normalize_source_columns = enable;
        self
    }

    #[must_use]
    pub fn with_keep_unmapped(mut self, enable: bool) -> Self {
        self.keep_unmapped = enable;
        self
    }
}

impl Default for MappingSpec {
    fn default() -> Self {
        Self::new(Vec::<(String, String)>::new())
    }
}

/// What a single [`ColumnMapper::apply`] call did. Purely descriptive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingReport {
    /// Input column names, in input order.
    pub original_columns: Vec<String>,
    /// Raw -> normalized name; empty when normalization is disabled.
    pub normalized_columns: IndexMap<String, String>,
    /// Mapping as matched against the (possibly normalized) columns.
    pub applied_mapping: IndexMap<String, String>,
    /// Raw input column -> canonical name actually applied.
    pub renamed_columns: IndexMap<String, String>,
    /// Columns kept verbatim because they were not mapping sources.
    pub unmapped_columns: Vec<String>,
    /// Columns removed because `keep_unmapped` is false.
    pub dropped_columns: Vec<String>,
}

/// Renames a raw table into canonical names, failing on any ambiguity.
///
/// Stateless after construction; one mapper may serve any number of calls.
#[derive(Debug, Clone)]
pub struct ColumnMapper {
    spec: MappingSpec,
    normalizer: fn(&str) -> String,
}

impl ColumnMapper {
    pub fn new(spec: MappingSpec) -> Self {
        Self {
            spec,
            normalizer: normalize_column_name,
        }
    }

    /// Replace the default [`normalize_column_name`] function.
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: fn(&str) -> String) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn spec(&self) -> &MappingSpec {
        &self.spec
    }

    /// Rename `df` according to the spec.
    ///
    /// Checks run in a fixed order (normalization collisions, missing sources,
    /// target collisions, target names); the first failing class aborts the
    /// call with every offender of that class. `df` is never modified.
    pub fn apply(&self, df: &DataFrame) -> Result<(DataFrame, MappingReport), MappingError> {
        let original_columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let mut normalized_columns = IndexMap::new();
        let (working_columns, working_mapping) = if self.spec.normalize_source_columns {
            let normalized: Vec<String> = original_columns
                .iter()
                .map(|name| (self.normalizer)(name))
                .collect();
            check_normalization_collisions(&original_columns, &normalized)?;
            let mapping = self.normalized_mapping()?;
            normalized_columns = original_columns
                .iter()
                .cloned()
                .zip(normalized.iter().cloned())
                .collect();
            (normalized, mapping)
        } else {
            (original_columns.clone(), self.spec.mapping.clone())
        };

        let present: BTreeSet<&str> = working_columns.iter().map(String::as_str).collect();
        let missing: Vec<String> = working_mapping
            .keys()
            .filter(|source| !present.contains(source.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(MappingError::SourceMissing { missing });
        }

        let unmapped: Vec<String> = working_columns
            .iter()
            .filter(|name| !working_mapping.contains_key(name.as_str()))
            .cloned()
            .collect();
        check_target_collisions(&working_mapping, &unmapped, self.spec.keep_unmapped)?;

        let invalid: Vec<InvalidName> = working_mapping
            .values()
            .filter_map(|target| {
                naming::validate(target).err().map(|violation| InvalidName {
                    name: target.clone(),
                    violation,
                })
            })
            .collect();
        if !invalid.is_empty() {
            return Err(MappingError::InvalidTargetName { invalid });
        }

        let mut columns: Vec<Column> = Vec::with_capacity(working_columns.len());
        let mut renamed_columns = IndexMap::new();
        let mut dropped_columns = Vec::new();
        for ((raw, working), column) in original_columns
            .iter()
            .zip(working_columns.iter())
            .zip(df.get_columns())
        {
            if let Some(target) = working_mapping.get(working) {
                renamed_columns.insert(raw.clone(), target.clone());
                columns.push(column.clone().with_name(target.as_str().into()));
            } else if self.spec.keep_unmapped {
                columns.push(column.clone().with_name(working.as_str().into()));
            } else {
                dropped_columns.push(working.clone());
            }
        }
        let mapped = DataFrame::new(columns)?;

        debug!(
            renamed = ?renamed_columns,
            dropped = ?dropped_columns,
            "Applied column mapping"
        );
        info!(
            input_columns = original_columns.len(),
            renamed = renamed_columns.len(),
            unmapped = if self.spec.keep_unmapped { unmapped.len() } else { 0 },
            dropped = dropped_columns.len(),
            "Mapped client columns"
        );

        let report = MappingReport {
            original_columns,
            normalized_columns,
            applied_mapping: working_mapping,
            renamed_columns,
            unmapped_columns: if self.spec.keep_unmapped {
                unmapped
            } else {
                Vec::new()
            },
            dropped_columns,
        };
        Ok((mapped, report))
    }

    /// Mapping with normalized source keys. Two keys that normalize to the
    /// same source are a collision.
    fn normalized_mapping(&self) -> Result<IndexMap<String, String>, MappingError> {
        let mut seen: IndexMap<String, &str> = IndexMap::new();
        let mut mapping = IndexMap::new();
        let mut collisions = Vec::new();
        for (source, target) in &self.spec.mapping {
            let normalized = (self.normalizer)(source);
            if let Some(first) = seen.get(&normalized) {
                collisions.push(NormalizationCollision {
                    first: (*first).to_string(),
                    second: source.clone(),
                    normalized,
                });
                continue;
            }
            seen.insert(normalized.clone(), source.as_str());
            mapping.insert(normalized, target.clone());
        }
        if collisions.is_empty() {
            Ok(mapping)
        } else {
            Err(MappingError::NormalizationCollision { collisions })
        }
    }
}

fn check_normalization_collisions(
    original: &[String],
    normalized: &[String],
) -> Result<(), MappingError> {
    let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
    let mut collisions = Vec::new();
    for (before, after) in original.iter().zip(normalized) {
        match seen.get(after.as_str()) {
            Some(first) => collisions.push(NormalizationCollision {
                first: (*first).to_string(),
                second: before.clone(),
                normalized: after.clone(),
            }),
            None => {
                seen.insert(after.as_str(), before.as_str());
            }
        }
    }
    if collisions.is_empty() {
        Ok(())
    } else {
        Err(MappingError::NormalizationCollision { collisions })
    }
}

fn check_target_collisions(
    mapping: &IndexMap<String, String>,
    unmapped: &[String],
    keep_unmapped: bool,
) -> Result<(), MappingError> {
    let mut by_target: IndexMap<&str, Vec<String>> = IndexMap::new();
    for (source, target) in mapping {
        by_target
            .entry(target.as_str())
            .or_default()
            .push(source.clone());
    }

    let mut conflicts: Vec<TargetConflict> = by_target
        .iter()
        .filter(|(_, sources)| sources.len() > 1)
        .map(|(target, sources)| TargetConflict::DuplicateTarget {
            target: (*target).to_string(),
            sources: sources.clone(),
        })
        .collect();

    if keep_unmapped {
        let kept: BTreeSet<&str> = unmapped.iter().map(String::as_str).collect();
        for (source, target) in mapping {
            if kept.contains(target.as_str()) {
                conflicts.push(TargetConflict::ShadowsUnmapped {
                    target: target.clone(),
                    source: source.clone(),
                });
            }
        }
    }

    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(MappingError::TargetCollision { conflicts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_table() -> DataFrame {
        DataFrame::new(vec![
            Column::new("Date".into(), vec!["2024-01-01", "2024-01-02"]),
            Column::new("Sales".into(), vec![10.0, 12.0]),
            Column::new("TV Spend".into(), vec![1.0, 2.0]),
        ])
        .unwrap()
    }

    #[test]
    fn collects_every_missing_source() {
        let mapper = ColumnMapper::new(MappingSpec::new([
            ("Revenue", "target__revenue"),
            ("Radio", "media__radio__spend"),
        ]));
        let err = mapper.apply(&raw_table()).unwrap_err();
        match err {
            MappingError::SourceMissing { missing } => {
                assert_eq!(missing, vec!["Revenue".to_string(), "Radio".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn normalized_mapping_keys_can_collide() {
        let mapper = ColumnMapper::new(
            MappingSpec::new([("Sales", "target__sales"), ("sales ", "target__revenue")])
                .with_normalize_source_columns(true),
        );
        let err = mapper.apply(&raw_table()).unwrap_err();
        assert!(matches!(err, MappingError::NormalizationCollision { .. }));
    }

    #[test]
    fn custom_normalizer_is_used() {
        fn upper(raw: &str) -> String {
            raw.trim().to_uppercase()
        }
        let mapper = ColumnMapper::new(
            MappingSpec::new([("date", "date"), ("sales", "target__sales")])
                .with_normalize_source_columns(true),
        )
        .with_normalizer(upper);
        let (mapped, report) = mapper.apply(&raw_table()).unwrap();

        let names: Vec<String> = mapped
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, vec!["date", "target__sales", "TV SPEND"]);
        assert_eq!(report.normalized_columns["TV Spend"], "TV SPEND");
        assert_eq!(report.applied_mapping["SALES"], "target__sales");
        assert_eq!(report.renamed_columns["Sales"], "target__sales");
        assert_eq!(report.unmapped_columns, vec!["TV SPEND".to_string()]);
    }
}

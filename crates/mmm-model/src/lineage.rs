//! Feature lineage records.
//!
//! Every transformer invocation yields one immutable [`FeatureStep`]; a
//! pipeline run folds its steps, in execution order, into one
//! [`FeatureReport`]. Reports from separate runs are never merged.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A transformer parameter as recorded for lineage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

impl ParamValue {
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(value) => Value::Bool(*value),
            Self::Int(value) => Value::from(*value),
            Self::Float(value) => Value::from(*value),
            Self::Text(value) => Value::String(value.clone()),
            Self::List(values) => Value::Array(values.iter().cloned().map(Value::String).collect()),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

/// Traceability for a single transformer invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStep {
    /// Name of the transformer that produced the columns.
    pub transformer: String,
    /// Parameters the transformer ran with, in declaration order.
    pub params: IndexMap<String, ParamValue>,
    /// Canonical names of the columns added, in output order.
    pub added_features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl FeatureStep {
    pub fn new(transformer: impl Into<String>) -> Self {
        Self {
            transformer: transformer.into(),
            params: IndexMap::new(),
            added_features: Vec::new(),
            notes: None,
        }
    }

    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_added_features(mut self, features: Vec<String>) -> Self {
        self.added_features = features;
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    fn to_json(&self) -> Value {
        let params: Map<String, Value> = self
            .params
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect();
        let mut step = Map::new();
        step.insert("transformer".into(), Value::String(self.transformer.clone()));
        step.insert("params".into(), Value::Object(params));
        step.insert(
            "added_features".into(),
            Value::Array(
                self.added_features
                    .iter()
                    .cloned()
                    .map(Value::String)
                    .collect(),
            ),
        );
        step.insert(
            "notes".into(),
            self.notes.clone().map_or(Value::Null, Value::String),
        );
        Value::Object(step)
    }
}

/// Ordered lineage of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureReport {
    steps: Vec<FeatureStep>,
}

impl FeatureReport {
    pub fn from_steps(steps: Vec<FeatureStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[FeatureStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// All added features across steps, in execution order.
    pub fn added_features(&self) -> Vec<&str> {
        self.steps
            .iter()
            .flat_map(|step| step.added_features.iter().map(String::as_str))
            .collect()
    }

    /// Serializable snapshot: `{"steps": [{transformer, params, added_features, notes}, ...]}`.
    pub fn to_structured_form(&self) -> Value {
        let mut root = Map::new();
        root.insert(
            "steps".into(),
            Value::Array(self.steps.iter().map(FeatureStep::to_json).collect()),
        );
        Value::Object(root)
    }
}

impl FromIterator<FeatureStep> for FeatureReport {
    fn from_iter<I: IntoIterator<Item = FeatureStep>>(iter: I) -> Self {
        Self::from_steps(iter.into_iter().collect())
    }
}

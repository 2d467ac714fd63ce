//! Feature transformers and the feature pipeline.
//!
//! Transformers append derived `baseline__*` and `event__*` columns to a
//! [`mmm_validate::Dataset`]; the pipeline runs them in order and records
//! each invocation in a [`mmm_model::FeatureReport`].

pub mod config;
pub mod error;
pub mod events;
pub mod pipeline;
pub mod seasonality;
pub mod transformer;
pub mod trend;

pub use config::FeatureConfig;
pub use error::FeatureError;
pub use events::{EventConfig, EventDates, EventTransformer};
pub use pipeline::FeaturePipeline;
pub use seasonality::{SeasonalityConfig, SeasonalityTransformer};
pub use transformer::{FeatureOutput, FeatureTransformer};
pub use trend::{TrendConfig, TrendTransformer};

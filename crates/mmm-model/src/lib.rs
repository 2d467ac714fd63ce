//! Shared model for the ingestion contract: canonical naming grammar,
//! error kinds, feature lineage records and polars value helpers.

pub mod error;
pub mod lineage;
pub mod naming;
pub mod polars_utils;

pub use error::ErrorKind;
pub use lineage::{FeatureReport, FeatureStep, ParamValue};
pub use naming::{
    DATE_COLUMN, InvalidName, NameViolation, ParsedName, ROLE_SEPARATOR, Role, infer_role,
};

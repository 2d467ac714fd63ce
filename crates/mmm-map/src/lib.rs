//! Client column normalization and explicit renaming.
//!
//! - **normalize**: deterministic snake_case normalization of raw labels
//! - **mapper**: [`ColumnMapper`] renames a raw table into canonical names and
//!   reports what it did in a [`MappingReport`]
//! - **error**: [`MappingError`], one variant per collision/schema class

pub mod error;
pub mod mapper;
pub mod normalize;

pub use error::{MappingError, NormalizationCollision, TargetConflict};
pub use mapper::{ColumnMapper, MappingReport, MappingSpec};
pub use normalize::normalize_column_name;

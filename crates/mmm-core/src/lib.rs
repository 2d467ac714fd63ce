//! Ingestion entry point.
//!
//! [`prepare_dataset`] takes a raw client table through the three stages:
//!
//! 1. **Map**: normalize and rename client columns ([`mmm_map`])
//! 2. **Validate**: enforce the dataset contract ([`mmm_validate`])
//! 3. **Features**: append trend, seasonality and event columns
//!    ([`mmm_transform`])

pub mod config;
pub mod error;
pub mod logging;
pub mod prepare;

pub use config::IngestConfig;
pub use error::PrepareError;
pub use prepare::{PreparedDataset, prepare_dataset};

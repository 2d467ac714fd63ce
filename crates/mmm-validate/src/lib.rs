//! Dataset contract validation.
//!
//! [`DatasetContract::from_table`] turns a canonically named table into a
//! [`Dataset`] or explains precisely which invariant class it breaks.

pub mod checks;
pub mod contract;
pub mod dataset;
pub mod datetime;
pub mod error;

pub use contract::DatasetContract;
pub use dataset::Dataset;
pub use datetime::{parse_date, parse_timestamp};
pub use error::{ContractError, DateViolation, TypeViolation, ValueRule, ValueViolation};

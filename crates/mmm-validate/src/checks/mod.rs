//! Per-class contract checks.
//!
//! Each check inspects one invariant class and returns every offender it
//! finds; [`crate::DatasetContract`] decides the order and stops at the first
//! class with offenders.

pub mod dates;
pub mod naming;
pub mod presence;
pub mod types;
pub mod values;

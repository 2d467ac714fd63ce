//! Error classification shared by every stage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse error class, so callers can branch without matching every
/// stage-specific variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing source column, invalid canonical name, reserved-name misuse.
    Schema,
    /// Two inputs resolve to the same output identifier.
    Collision,
    /// Date, type or value invariant of the dataset contract.
    Contract,
    /// Invalid transformer parameter (period, order, event name or date).
    Parameter,
    /// Unexpected failure of the underlying table engine.
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Schema => "schema",
            Self::Collision => "collision",
            Self::Contract => "contract",
            Self::Parameter => "parameter",
            Self::Internal => "internal",
        }
    }

    /// Schema, collision and parameter errors are fixed by correcting the input.
    pub fn is_caller_fixable(&self) -> bool {
        !matches!(self, Self::Internal)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_internal_errors_are_not_caller_fixable() {
        assert!(ErrorKind::Schema.is_caller_fixable());
        assert!(ErrorKind::Parameter.is_caller_fixable());
        assert!(!ErrorKind::Internal.is_caller_fixable());
        assert_eq!(ErrorKind::Collision.to_string(), "collision");
    }
}

//! Canonical column naming grammar.
//!
//! Canonical names follow `<role>__<entity>__<metric>__<qualifiers...>`:
//!
//! - Separator: `__`
//! - Case: snake_case, charset `[a-z0-9_]`
//! - Reserved: `date` (the single temporal column, no further segments)
//! - Allowed roles: `target`, `media`, `control`, `event`, `baseline`, `id`
//!
//! At least the role and one further segment are required
//! (e.g. `target__sales`, `media__tv__spend`).

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator between name segments.
pub const ROLE_SEPARATOR: &str = "__";

/// Reserved name of the temporal column.
pub const DATE_COLUMN: &str = "date";

/// A non-role segment: leading lowercase letter, then `[a-z0-9_]`.
static SEGMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("Invalid segment regex"));

/// Role segment of a canonical column name.
///
/// `Date` is the reserved temporal column; it never carries further segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Date,
    Target,
    Media,
    Control,
    Event,
    Baseline,
    Id,
}

impl Role {
    /// Roles accepted as the first segment of a non-date name.
    pub const ALLOWED: [Role; 6] = [
        Role::Target,
        Role::Media,
        Role::Control,
        Role::Event,
        Role::Baseline,
        Role::Id,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Date => "date",
            Role::Target => "target",
            Role::Media => "media",
            Role::Control => "control",
            Role::Event => "event",
            Role::Baseline => "baseline",
            Role::Id => "id",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = NameViolation;

    /// Parse a role segment. `date` is rejected here because it is only
    /// valid as a whole name, never as a prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALLOWED
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| NameViolation::UnknownRole {
                role: s.to_string(),
            })
    }
}

/// Reason a name does not satisfy the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum NameViolation {
    #[error("name is empty")]
    Empty,

    /// `date` used as a prefix (`date__x`).
    #[error("'date' is reserved and cannot carry further segments")]
    ReservedName,

    #[error("segment '{segment}' must start with a lowercase letter and contain only [a-z0-9_]")]
    InvalidCharset { segment: String },

    /// Empty segment or a segment starting/ending with `_` (e.g. `media___tv`).
    #[error("malformed '__' separator")]
    MalformedSeparator,

    #[error("unknown role '{role}' (expected one of target, media, control, event, baseline, id)")]
    UnknownRole { role: String },

    #[error("expected '<role>__<entity>...', found a single segment")]
    TooFewSegments,
}

/// A name rejected by the grammar, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidName {
    pub name: String,
    pub violation: NameViolation,
}

impl fmt::Display for InvalidName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}': {}", self.name, self.violation)
    }
}

/// Structured view of a canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedName {
    pub role: Role,
    /// First segment after the role; `None` only for `date`.
    pub entity: Option<String>,
    pub metric: Option<String>,
    pub qualifiers: Vec<String>,
}

impl ParsedName {
    /// Segments after the role, in order.
    pub fn parts(&self) -> Vec<&str> {
        self.entity
            .iter()
            .chain(self.metric.iter())
            .chain(self.qualifiers.iter())
            .map(String::as_str)
            .collect()
    }
}

/// Parse a name against the grammar.
pub fn parse(name: &str) -> Result<ParsedName, NameViolation> {
    if name.is_empty() {
        return Err(NameViolation::Empty);
    }

    let segments: Vec<&str> = name.split(ROLE_SEPARATOR).collect();
    if segments[0] == DATE_COLUMN {
        return if segments.len() == 1 {
            Ok(ParsedName {
                role: Role::Date,
                entity: None,
                metric: None,
                qualifiers: Vec::new(),
            })
        } else {
            Err(NameViolation::ReservedName)
        };
    }

    if let Some(bad) = segments.iter().find(|segment| {
        !segment
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_')
    }) {
        return Err(NameViolation::InvalidCharset {
            segment: (*bad).to_string(),
        });
    }

    if segments
        .iter()
        .any(|segment| segment.is_empty() || segment.starts_with('_') || segment.ends_with('_'))
    {
        return Err(NameViolation::MalformedSeparator);
    }

    let role: Role = segments[0].parse()?;
    if segments.len() < 2 {
        return Err(NameViolation::TooFewSegments);
    }

    if let Some(bad) = segments[1..]
        .iter()
        .find(|segment| !SEGMENT_REGEX.is_match(segment))
    {
        return Err(NameViolation::InvalidCharset {
            segment: (*bad).to_string(),
        });
    }

    let mut rest = segments[1..].iter().map(|segment| (*segment).to_string());
    Ok(ParsedName {
        role,
        entity: rest.next(),
        metric: rest.next(),
        qualifiers: rest.collect(),
    })
}

/// Validate a name against the grammar.
pub fn validate(name: &str) -> Result<(), NameViolation> {
    parse(name).map(|_| ())
}

pub fn is_valid(name: &str) -> bool {
    parse(name).is_ok()
}

/// Role of a canonical name, or `None` if the name is not canonical.
pub fn infer_role(name: &str) -> Option<Role> {
    parse(name).ok().map(|parsed| parsed.role)
}

/// True for a single snake_case token usable inside a segment
/// (leading letter, `[a-z0-9_]`, no `__`).
pub fn is_snake_case_token(token: &str) -> bool {
    !token.contains(ROLE_SEPARATOR) && !token.ends_with('_') && SEGMENT_REGEX.is_match(token)
}

//! Identifier types for arrivals and their documents
//!
//! Identifiers are ULIDs behind a short uppercase prefix, rendered as
//! `ARV-01KCWY20F01B21V0G4E835NW3J`. The ULID component makes ids unique for
//! the lifetime of the store and roughly sortable by creation time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ulid::Ulid;

/// Errors that can occur when parsing an identifier from a string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    #[error("missing '-' separator in id '{value}'")]
    MissingSeparator { value: String },

    #[error("expected '{expected}' prefix, found '{found}'")]
    WrongPrefix { expected: &'static str, found: String },

    #[error("invalid ULID component in id '{value}'")]
    InvalidUlid { value: String },
}

fn parse_prefixed(expected: &'static str, value: &str) -> Result<Ulid, IdParseError> {
    let (prefix, rest) = value
        .split_once('-')
        .ok_or_else(|| IdParseError::MissingSeparator {
            value: value.to_string(),
        })?;

    if prefix != expected {
        return Err(IdParseError::WrongPrefix {
            expected,
            found: prefix.to_string(),
        });
    }

    Ulid::from_string(rest).map_err(|_| IdParseError::InvalidUlid {
        value: value.to_string(),
    })
}

/// Unique identifier for an arrival record
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct ArrivalId(Ulid);

impl ArrivalId {
    pub const PREFIX: &'static str = "ARV";

    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for ArrivalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ArrivalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", Self::PREFIX, self.0)
    }
}

impl FromStr for ArrivalId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_prefixed(Self::PREFIX, s).map(Self)
    }
}

impl TryFrom<String> for ArrivalId {
    type Error = IdParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ArrivalId> for String {
    fn from(id: ArrivalId) -> Self {
        id.to_string()
    }
}

/// Unique identifier for a document attached to an arrival
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(Ulid);

impl DocumentId {
    pub const PREFIX: &'static str = "DOC";

    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", Self::PREFIX, self.0)
    }
}

impl FromStr for DocumentId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_prefixed(Self::PREFIX, s).map(Self)
    }
}

impl TryFrom<String> for DocumentId {
    type Error = IdParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.to_string()
    }
}

//! Target profiles

use crate::error::MappingError;
use crate::protocol::Record;
use serde::{Deserialize, Serialize};

/// Identifier of a target platform/board configuration known to ruyi
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile(String);

impl Profile {
    /// Create a profile from its identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Take the first whitespace-delimited token of the line
    ///
    /// Works on raw and structured lines alike; `list profiles` prints plain
    /// text such as `generic (needs quirks: [])`.
    pub fn from_record(record: &Record) -> Result<Self, MappingError> {
        record
            .first_token()
            .map(Self::new)
            .ok_or(MappingError::Empty { entity: "profile" })
    }

    /// The identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Profile {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Profile {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

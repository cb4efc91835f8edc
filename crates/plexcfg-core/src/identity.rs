//! Identifier type for purchase configurations

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_-]+$").expect("identifier pattern compiles"));

/// Identifier of a product or subscription
///
/// Doubles as the exported file name and as the target of `dependency`
/// references. Imported identifiers are not checked against the pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigId(String);

impl ConfigId {
    /// Create a new configuration ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the ID only uses lowercase letters, digits, `_` and `-`
    pub fn is_valid_pattern(&self) -> bool {
        ID_PATTERN.is_match(&self.0)
    }
}

impl fmt::Display for ConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ConfigId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ConfigId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for ConfigId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

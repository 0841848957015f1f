//! Newtype wrapper for registry identifiers.
//!
//! Identifiers are generated at upload/import time and are never derived from
//! a filename, so two assets sharing an `originalFilename` still have distinct
//! ids.

use std::fmt;
use std::sync::Arc;

/// A stable, opaque identifier for an image held by the asset registry.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct AssetId(Arc<str>);

impl AssetId {
    /// Creates a new AssetId from a string
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AssetId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for AssetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

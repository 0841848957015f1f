//! Error types for registry mutations and package import/export.

use quire_traits::ArchiveError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Font family '{0}' already exists or the name is empty")]
    NameConflict(String),
    #[error("Font family name '{name}' {reason}")]
    InvalidName { name: String, reason: &'static str },
    #[error("Unknown font family: '{0}'")]
    UnknownFamily(String),
    #[error("Font family '{family}' has no variant at index {index}")]
    VariantOutOfRange { family: String, index: usize },
}

/// The main error enum for package import and export.
#[derive(Error, Debug)]
pub enum PackageError {
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),
    #[error("Invalid archive entry name '{path}': {reason}")]
    InvalidEntryName { path: String, reason: String },
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("Archive entry '{path}' could not be loaded: {message}")]
    EntryFailed { path: String, message: String },
}

/// How an orchestration reacts to a failing unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Any failure aborts the operation and nothing is produced (export).
    AllOrNothing,
    /// Entry failures are logged and skipped; only a whole-archive load
    /// failure aborts (import).
    BestEffort,
}

impl FailurePolicy {
    /// Whether one failed unit of work fails the whole operation.
    pub fn aborts_on_entry_failure(&self) -> bool {
        matches!(self, FailurePolicy::AllOrNothing)
    }
}

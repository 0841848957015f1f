// src/error.rs
use quire_core::{PackageError, RegistryError};
use quire_traits::{ArchiveError, PaginationError};
use thiserror::Error;

/// Errors surfaced by the studio's orchestration entry points.
#[derive(Error, Debug)]
pub enum StudioError {
    #[error("Packaging failed: {0}")]
    Package(#[from] PackageError),

    #[error("{0}")]
    Registry(#[from] RegistryError),

    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("Render failed: {0}")]
    Render(#[from] PaginationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for StudioError {
    fn from(e: serde_json::Error) -> Self {
        StudioError::Config(e.to_string())
    }
}

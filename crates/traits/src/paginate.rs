//! Pagination engine seam.
//!
//! The engine lays out a self-contained HTML document into printed pages. It
//! works asynchronously: after [`PaginationEngine::load`] returns, page
//! containers appear over time and are observed by count.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    #[error("Pagination engine failed to load document: {0}")]
    LoadFailed(String),

    #[error("Pagination engine produced no pages within {waited_ms} ms")]
    Timeout { waited_ms: u64 },

    #[error("Pagination engine unavailable: {0}")]
    Unavailable(String),
}

pub trait PaginationEngine {
    /// Replaces whatever the engine is showing with `document` and starts
    /// laying it out. The document carries inline assets only.
    fn load(&mut self, document: &str) -> Result<(), PaginationError>;

    /// Page containers produced so far for the last loaded document.
    fn page_count(&self) -> usize;

    /// Whether the fonts the document declares have finished loading.
    fn fonts_ready(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str;
}

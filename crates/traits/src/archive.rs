//! Archive codec seam.
//!
//! The packaging pipeline never touches a container format directly. It builds
//! an [`ArchiveEntries`] map in memory and hands it to an [`ArchiveCodec`], and
//! it reads archives back through an [`ArchiveReader`] one entry at a time so a
//! single unreadable entry does not poison the rest.

use std::collections::HashSet;
use std::fmt::Debug;
use thiserror::Error;

/// Error type for archive operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArchiveError {
    #[error("Archive entry not found: {0}")]
    NotFound(String),

    #[error("Failed to read archive entry '{path}': {message}")]
    EntryUnreadable { path: String, message: String },

    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    #[error("Failed to write archive: {0}")]
    WriteFailed(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ArchiveError {
    fn from(err: std::io::Error) -> Self {
        ArchiveError::Io(err.to_string())
    }
}

/// Deflate compression level applied to every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionPolicy {
    level: u8,
}

impl CompressionPolicy {
    pub const MAX_LEVEL: u8 = 9;

    /// Maximum compression, the level used for exported documents.
    pub fn maximum() -> Self {
        Self {
            level: Self::MAX_LEVEL,
        }
    }

    /// Returns `None` for levels above [`Self::MAX_LEVEL`].
    pub fn with_level(level: u8) -> Option<Self> {
        (level <= Self::MAX_LEVEL).then_some(Self { level })
    }

    pub fn level(&self) -> u8 {
        self.level
    }
}

impl Default for CompressionPolicy {
    fn default() -> Self {
        Self::maximum()
    }
}

/// An ordered mapping of entry path to content.
///
/// Insertion order is preserved so that the same registry state always yields
/// the same entry sequence. Inserting an existing path replaces its content in
/// place, which is how a container behaves when two files share a name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveEntries {
    entries: Vec<(String, Vec<u8>)>,
}

impl ArchiveEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, returning the previous content if the path was taken.
    pub fn insert(&mut self, path: impl Into<String>, data: Vec<u8>) -> Option<Vec<u8>> {
        let path = path.into();
        match self.entries.iter_mut().find(|(p, _)| *p == path) {
            Some((_, existing)) => Some(std::mem::replace(existing, data)),
            None => {
                self.entries.push((path, data));
                None
            }
        }
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, data)| data.as_slice())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(p, _)| p.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries.iter().map(|(p, d)| (p.as_str(), d.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Random access to the entries of a loaded archive.
pub trait ArchiveReader: Debug {
    /// All entry names, in container order. Directory entries end with `/`.
    fn entry_names(&self) -> Vec<String>;

    /// Reads one entry fully into memory.
    fn read_entry(&mut self, path: &str) -> Result<Vec<u8>, ArchiveError>;

    fn contains(&self, path: &str) -> bool {
        self.entry_names().iter().any(|n| n == path)
    }

    /// Reads an entry as UTF-8 text. Returns `Ok(None)` when the entry is absent.
    fn read_text(&mut self, path: &str) -> Result<Option<String>, ArchiveError> {
        if !self.contains(path) {
            return Ok(None);
        }
        let bytes = self.read_entry(path)?;
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| ArchiveError::EntryUnreadable {
                path: path.to_string(),
                message: e.to_string(),
            })
    }
}

/// A compressed container of named byte streams.
///
/// # Implementations
///
/// - `ZipArchiveCodec` in `quire-resource`: deflate-compressed zip files
pub trait ArchiveCodec: Send + Sync + Debug {
    /// Serializes all entries into one container. Either the whole archive is
    /// produced or an error is returned; nothing partial escapes.
    fn encode(&self, entries: &ArchiveEntries, policy: CompressionPolicy) -> Result<Vec<u8>, ArchiveError>;

    /// Loads a whole container. Failing here is a whole-operation failure.
    fn open(&self, bytes: Vec<u8>) -> Result<Box<dyn ArchiveReader>, ArchiveError>;

    /// Returns a human-readable name for this codec (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// An archive held entirely in memory.
///
/// Entries can be marked unreadable to exercise per-entry failure handling.
#[derive(Debug, Clone, Default)]
pub struct InMemoryArchive {
    entries: ArchiveEntries,
    unreadable: HashSet<String>,
}

impl InMemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: ArchiveEntries) -> Self {
        Self {
            entries,
            unreadable: HashSet::new(),
        }
    }

    pub fn with_entry(mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.entries.insert(path, data.into());
        self
    }

    /// Keeps the entry listed but makes every read of it fail.
    pub fn with_unreadable(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        if !self.entries.contains(&path) {
            self.entries.insert(path.clone(), Vec::new());
        }
        self.unreadable.insert(path);
        self
    }

    pub fn entries(&self) -> &ArchiveEntries {
        &self.entries
    }
}

impl ArchiveReader for InMemoryArchive {
    fn entry_names(&self) -> Vec<String> {
        self.entries.paths().map(str::to_string).collect()
    }

    fn read_entry(&mut self, path: &str) -> Result<Vec<u8>, ArchiveError> {
        if self.unreadable.contains(path) {
            return Err(ArchiveError::EntryUnreadable {
                path: path.to_string(),
                message: "entry marked unreadable".to_string(),
            });
        }
        self.entries
            .get(path)
            .map(<[u8]>::to_vec)
            .ok_or_else(|| ArchiveError::NotFound(path.to_string()))
    }
}

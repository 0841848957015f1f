//! Zip container codec.

use log::debug;
use quire_traits::{ArchiveCodec, ArchiveEntries, ArchiveError, ArchiveReader, CompressionPolicy};
use std::io::{Cursor, Read, Write};
use zip::read::ZipArchive;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Reads and writes deflate-compressed zip containers entirely in memory.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipArchiveCodec;

impl ZipArchiveCodec {
    pub fn new() -> Self {
        Self
    }
}

impl ArchiveCodec for ZipArchiveCodec {
    fn encode(&self, entries: &ArchiveEntries, policy: CompressionPolicy) -> Result<Vec<u8>, ArchiveError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        // Level 0 means "no compression"; deflate itself starts at 1.
        let options = match policy.level() {
            0 => SimpleFileOptions::default().compression_method(CompressionMethod::Stored),
            level => SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(Some(i64::from(level))),
        };

        for (path, data) in entries.iter() {
            zip.start_file(path, options)
                .map_err(|e| ArchiveError::WriteFailed(format!("{}: {}", path, e)))?;
            zip.write_all(data)?;
        }

        let cursor = zip
            .finish()
            .map_err(|e| ArchiveError::WriteFailed(e.to_string()))?;
        let bytes = cursor.into_inner();
        debug!("Encoded {} entries into {} bytes", entries.len(), bytes.len());
        Ok(bytes)
    }

    fn open(&self, bytes: Vec<u8>) -> Result<Box<dyn ArchiveReader>, ArchiveError> {
        let archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ArchiveError::InvalidArchive(e.to_string()))?;
        Ok(Box::new(ZipReader { archive }))
    }

    fn name(&self) -> &'static str {
        "ZipArchiveCodec"
    }
}

struct ZipReader {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl std::fmt::Debug for ZipReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipReader")
            .field("entries", &self.archive.len())
            .finish()
    }
}

impl ArchiveReader for ZipReader {
    fn entry_names(&self) -> Vec<String> {
        (0..self.archive.len())
            .filter_map(|i| self.archive.name_for_index(i))
            .map(str::to_string)
            .collect()
    }

    fn contains(&self, path: &str) -> bool {
        self.archive.index_for_name(path).is_some()
    }

    fn read_entry(&mut self, path: &str) -> Result<Vec<u8>, ArchiveError> {
        let mut file = self.archive.by_name(path).map_err(|e| match e {
            zip::result::ZipError::FileNotFound => ArchiveError::NotFound(path.to_string()),
            other => ArchiveError::EntryUnreadable {
                path: path.to_string(),
                message: other.to_string(),
            },
        })?;
        let mut data = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
        file.read_to_end(&mut data)
            .map_err(|e| ArchiveError::EntryUnreadable {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        Ok(data)
    }
}

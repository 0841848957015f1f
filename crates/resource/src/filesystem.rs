//! Unpacked archives on the local filesystem.
//!
//! A [`DirectoryArchive`] treats a directory as an archive: it can be read
//! back through [`ArchiveReader`] (so an unpacked project can be re-imported)
//! and it can receive the entries of another archive.
//!
//! # Security
//!
//! Entry names come from untrusted archives. Every resolved path must stay
//! within the base directory, so names like `../../etc/passwd` or absolute
//! paths are rejected on both read and write.

use log::{debug, warn};
use quire_traits::{ArchiveEntries, ArchiveError, ArchiveReader};
use std::fs;
use std::path::{Component, Path, PathBuf};

#[derive(Debug)]
pub struct DirectoryArchive {
    base_path: PathBuf,
    /// Canonicalized base path for security checks
    canonical_base: Option<PathBuf>,
}

impl DirectoryArchive {
    /// All entry paths resolve relative to `base_path`. The directory does not
    /// have to exist yet when the archive is only used as an extraction target.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base = base_path.as_ref().to_path_buf();
        let canonical = base.canonicalize().ok();
        Self {
            base_path: base,
            canonical_base: canonical,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base_path
    }

    /// Resolves an entry name relative to the base path.
    ///
    /// Returns `None` if the path would escape the base directory.
    fn resolve_path_safe(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path);
        if path.is_empty() || relative.is_absolute() {
            return None;
        }
        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
        {
            return None;
        }

        let full_path = self.base_path.join(relative);

        // Existing files may still be symlinks pointing elsewhere.
        if let Ok(canonical) = full_path.canonicalize()
            && let Some(ref base) = self.canonical_base
        {
            return canonical.starts_with(base).then_some(canonical);
        }

        Some(full_path)
    }

    /// Writes every entry below the base directory, creating it if needed.
    /// Returns the number of files written.
    pub fn write_entries(&self, entries: &ArchiveEntries) -> Result<usize, ArchiveError> {
        fs::create_dir_all(&self.base_path)?;
        let mut written = 0;
        for (path, data) in entries.iter() {
            if path.ends_with('/') {
                continue;
            }
            let target = self.resolve_path_safe(path).ok_or_else(|| {
                ArchiveError::WriteFailed(format!("{} (path traversal blocked)", path))
            })?;
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, data)?;
            written += 1;
        }
        debug!("Wrote {} entries to {}", written, self.base_path.display());
        Ok(written)
    }

    /// Copies every entry of `reader` into the base directory.
    pub fn extract(&self, reader: &mut dyn ArchiveReader) -> Result<usize, ArchiveError> {
        let mut entries = ArchiveEntries::new();
        for name in reader.entry_names() {
            if name.ends_with('/') {
                continue;
            }
            let data = reader.read_entry(&name)?;
            entries.insert(name, data);
        }
        self.write_entries(&entries)
    }

    fn collect_files(&self, dir: &Path, prefix: &str, names: &mut Vec<String>) {
        let read_dir = match fs::read_dir(dir) {
            Ok(read_dir) => read_dir,
            Err(e) => {
                warn!("Cannot list {}: {}", dir.display(), e);
                return;
            }
        };
        let mut children: Vec<_> = read_dir.filter_map(Result::ok).collect();
        children.sort_by_key(|entry| entry.file_name());

        for child in children {
            let Some(name) = child.file_name().to_str().map(str::to_string) else {
                warn!("Skipping non UTF-8 file name in {}", dir.display());
                continue;
            };
            let entry_name = if prefix.is_empty() {
                name
            } else {
                format!("{}/{}", prefix, name)
            };
            match child.file_type() {
                Ok(ft) if ft.is_dir() => self.collect_files(&child.path(), &entry_name, names),
                Ok(ft) if ft.is_file() => names.push(entry_name),
                _ => {}
            }
        }
    }
}

impl ArchiveReader for DirectoryArchive {
    /// Relative file paths with `/` separators, sorted per directory.
    fn entry_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_files(&self.base_path, "", &mut names);
        names
    }

    fn contains(&self, path: &str) -> bool {
        self.resolve_path_safe(path)
            .map(|p| p.is_file())
            .unwrap_or(false)
    }

    fn read_entry(&mut self, path: &str) -> Result<Vec<u8>, ArchiveError> {
        let full_path = self
            .resolve_path_safe(path)
            .ok_or_else(|| ArchiveError::NotFound(format!("{} (path traversal blocked)", path)))?;

        fs::read(&full_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ArchiveError::NotFound(path.to_string())
            } else {
                ArchiveError::EntryUnreadable {
                    path: path.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_traits::InMemoryArchive;
    use tempfile::tempdir;

    #[test]
    fn test_directory_lists_nested_entries() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("document.html"), b"<p>x</p>").unwrap();
        fs::create_dir_all(dir.path().join("fonts/Foo")).unwrap();
        fs::write(dir.path().join("fonts/Foo/Foo-Bold.ttf"), b"ttf").unwrap();
        fs::create_dir_all(dir.path().join("images")).unwrap();
        fs::write(dir.path().join("images/a.png"), b"png").unwrap();

        let archive = DirectoryArchive::new(dir.path());
        assert_eq!(
            archive.entry_names(),
            ["document.html", "fonts/Foo/Foo-Bold.ttf", "images/a.png"]
        );
    }

    #[test]
    fn test_directory_read_entry() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("styles.css"), b"p{}").unwrap();

        let mut archive = DirectoryArchive::new(dir.path());
        assert!(archive.contains("styles.css"));
        assert_eq!(archive.read_entry("styles.css").unwrap(), b"p{}");
        assert!(matches!(
            archive.read_entry("script.js"),
            Err(ArchiveError::NotFound(_))
        ));
    }

    #[test]
    fn test_extract_writes_every_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out");
        let mut source = InMemoryArchive::new()
            .with_entry("document.html", "<p>Hi</p>")
            .with_entry("images/", Vec::new())
            .with_entry("images/x(1).jpg", vec![1, 2, 3]);

        let written = DirectoryArchive::new(&target).extract(&mut source).unwrap();

        assert_eq!(written, 2);
        assert_eq!(fs::read(target.join("images/x(1).jpg")).unwrap(), vec![1, 2, 3]);
        assert_eq!(fs::read_to_string(target.join("document.html")).unwrap(), "<p>Hi</p>");
    }

    // Security tests for path traversal prevention

    #[test]
    fn test_extract_blocks_path_traversal() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out");
        let mut entries = ArchiveEntries::new();
        entries.insert("../escaped.txt", b"nope".to_vec());

        let result = DirectoryArchive::new(&target).write_entries(&entries);

        assert!(matches!(result, Err(ArchiveError::WriteFailed(_))));
        assert!(!dir.path().join("escaped.txt").exists());
    }

    #[test]
    fn test_blocks_absolute_paths() {
        let dir = tempdir().unwrap();
        let mut archive = DirectoryArchive::new(dir.path());

        assert!(archive.read_entry("/etc/passwd").is_err());
        assert!(!archive.contains("/etc/passwd"));
    }

    #[test]
    fn test_blocks_double_dots() {
        let dir = tempdir().unwrap();
        let archive = DirectoryArchive::new(dir.path());

        assert!(!archive.contains(".."));
        assert!(!archive.contains("fonts/../../../bar"));
        assert!(!archive.contains("./../../secret"));
    }
}

//! Packaging of a whole document into an archive and back.
//!
//! Archive layout:
//!
//! ```text
//! document.html                 structure, images in path form
//! styles.css                    @font-face rules (path form) + user style
//! script.js                     behavior
//! fonts/<family>/<filename>     one entry per font variant
//! images/<originalFilename>     one entry per image
//! ```

mod export;
mod import;

pub use export::PackageExporter;
pub use import::{
    EntryFailure, ImportReport, PackageImporter, extract_body_fragment, import_from_reader, import_with_policy,
    strip_font_faces,
};

pub const FONTS_DIR: &str = "fonts";
pub use quire_types::asset::IMAGES_DIR;

/// Prefix of exported archive names unless configured otherwise.
pub const DEFAULT_ARCHIVE_PREFIX: &str = "paged";

/// Why `name` cannot be one segment of an archive entry path, if it cannot.
pub fn segment_problem(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        Some("is empty")
    } else if name.contains('/') || name.contains('\\') {
        Some("contains a path separator")
    } else if name == "." || name == ".." {
        Some("is a relative path component")
    } else {
        None
    }
}

/// `<prefix>-<unix millis>.zip`
pub fn archive_file_name(prefix: &str) -> String {
    archive_file_name_at(prefix, chrono::Utc::now().timestamp_millis())
}

pub fn archive_file_name_at(prefix: &str, unix_millis: i64) -> String {
    format!("{}-{}.zip", prefix, unix_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_file_name() {
        assert_eq!(archive_file_name_at("paged", 1_700_000_000_123), "paged-1700000000123.zip");
        let name = archive_file_name("book");
        assert!(name.starts_with("book-") && name.ends_with(".zip"));
    }

    #[test]
    fn test_segment_problem() {
        assert_eq!(segment_problem("Foo Bold.ttf"), None);
        assert_eq!(segment_problem(""), Some("is empty"));
        assert_eq!(segment_problem("a\\b"), Some("contains a path separator"));
        assert_eq!(segment_problem(".."), Some("is a relative path component"));
    }
}

//! Binary assets owned by the registry.

use crate::font::{FontFormat, FontStyle, FontWeight};
use crate::ids::AssetId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared payload bytes (reference-counted so summaries and exports never copy).
pub type SharedPayload = Arc<Vec<u8>>;

/// Directory under which images live in an archive, and the prefix of every
/// image path token.
pub const IMAGES_DIR: &str = "images";

/// Returns the text after the last `.` of a filename, if any.
pub fn file_extension(filename: &str) -> Option<&str> {
    filename.rsplit_once('.').map(|(_, ext)| ext)
}

/// Image formats accepted for upload and import.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Webp,
    Svg,
}

impl ImageFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "bmp" => Some(ImageFormat::Bmp),
            "webp" => Some(ImageFormat::Webp),
            "svg" => Some(ImageFormat::Svg),
            _ => None,
        }
    }

    pub fn from_filename(filename: &str) -> Option<Self> {
        file_extension(filename).and_then(Self::from_extension)
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Webp => "image/webp",
            ImageFormat::Svg => "image/svg+xml",
        }
    }
}

/// An uploaded or imported image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    pub id: AssetId,
    pub original_filename: String,
    pub format: ImageFormat,
    pub payload: SharedPayload,
    pub byte_size: usize,
}

impl ImageAsset {
    pub fn new(id: AssetId, original_filename: impl Into<String>, format: ImageFormat, payload: Vec<u8>) -> Self {
        let byte_size = payload.len();
        Self {
            id,
            original_filename: original_filename.into(),
            format,
            payload: Arc::new(payload),
            byte_size,
        }
    }

    /// The externalized form of this image: `images/<originalFilename>`.
    pub fn path_token(&self) -> String {
        format!("{}/{}", IMAGES_DIR, self.original_filename)
    }

    /// `images/<id>.<ext>`, an alias accepted when resolving path references.
    pub fn id_path_token(&self) -> String {
        match file_extension(&self.original_filename) {
            Some(ext) => format!("{}/{}.{}", IMAGES_DIR, self.id, ext),
            None => format!("{}/{}", IMAGES_DIR, self.id),
        }
    }
}

/// One concrete font file within a family.
#[derive(Debug, Clone, PartialEq)]
pub struct FontVariant {
    pub weight: FontWeight,
    pub style: FontStyle,
    pub format: FontFormat,
    pub payload: SharedPayload,
    pub byte_size: usize,
    pub original_filename: String,
    /// Replaces the generated inline `src` of this variant's `@font-face` rule.
    pub source_override: Option<String>,
}

impl FontVariant {
    pub fn new(
        original_filename: impl Into<String>,
        weight: FontWeight,
        style: FontStyle,
        format: FontFormat,
        payload: Vec<u8>,
    ) -> Self {
        let byte_size = payload.len();
        Self {
            weight,
            style,
            format,
            payload: Arc::new(payload),
            byte_size,
            original_filename: original_filename.into(),
            source_override: None,
        }
    }
}

/// A named group of variants; the name is the CSS-visible `font-family`.
#[derive(Debug, Clone, PartialEq)]
pub struct FontFamily {
    pub name: String,
    pub variants: Vec<FontVariant>,
}

impl FontFamily {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: Vec::new(),
        }
    }
}

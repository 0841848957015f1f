//! Font filename classification.
//!
//! Recovers family, weight and style from names like `Inter-SemiBoldItalic.woff2`.
//! Weight keywords are checked in a fixed order and the first hit wins:
//!
//! | order | keywords                  | weight |
//! |-------|---------------------------|--------|
//! | 1     | thin                      | 100    |
//! | 2     | extralight, ultralight    | 200    |
//! | 3     | light                     | 300    |
//! | 4     | medium                    | 500    |
//! | 5     | semibold, demibold        | 600    |
//! | 6     | extrabold, ultrabold      | 800    |
//! | 7     | black, heavy              | 900    |
//! | 8     | bold                      | 700    |
//!
//! Compound keywords come before the plain ones they contain, so `SemiBold`
//! is never read as `Bold` and `ExtraLight` is never read as `Light`.

use quire_types::asset::file_extension;
use quire_types::{FontFormat, FontStyle, FontWeight};

const WEIGHT_KEYWORDS: &[(&[&str], FontWeight)] = &[
    (&["thin"], FontWeight::Thin),
    (&["extralight", "ultralight"], FontWeight::ExtraLight),
    (&["light"], FontWeight::Light),
    (&["medium"], FontWeight::Medium),
    (&["semibold", "demibold"], FontWeight::SemiBold),
    (&["extrabold", "ultrabold"], FontWeight::ExtraBold),
    (&["black", "heavy"], FontWeight::Black),
    (&["bold"], FontWeight::Bold),
];

/// Segment names stripped from the end of a stem when guessing the family.
const WEIGHT_SEGMENTS: &[&str] = &[
    "thin",
    "extralight",
    "ultralight",
    "light",
    "regular",
    "normal",
    "book",
    "medium",
    "semibold",
    "demibold",
    "extrabold",
    "ultrabold",
    "black",
    "heavy",
    "bold",
];

const STYLE_SEGMENTS: &[&str] = &["italic", "oblique"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontClassification {
    pub family_name: String,
    pub weight: FontWeight,
    pub style: FontStyle,
}

/// Maps a font file extension to its format; `None` means the file is skipped.
pub fn extension_to_format(ext: &str) -> Option<FontFormat> {
    FontFormat::from_extension(ext)
}

pub fn font_format_for(filename: &str) -> Option<FontFormat> {
    file_extension(filename).and_then(extension_to_format)
}

/// The filename minus a known font extension.
fn font_stem(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if extension_to_format(ext).is_some() => stem,
        _ => filename,
    }
}

pub fn classify(filename: &str) -> FontClassification {
    let stem = font_stem(filename);
    let lower = stem.to_lowercase();

    let weight = WEIGHT_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, weight)| *weight)
        .unwrap_or_default();

    let style = if STYLE_SEGMENTS.iter().any(|s| lower.contains(s)) {
        FontStyle::Italic
    } else {
        FontStyle::Normal
    };

    FontClassification {
        family_name: guess_family_name(stem),
        weight,
        style,
    }
}

/// Strips a trailing `-Italic`/`-Oblique` segment and then a trailing weight
/// segment. A weight fused with the style (`-BoldItalic`) is handled too.
fn guess_family_name(stem: &str) -> String {
    let mut family = stem;

    if let Some((head, tail)) = family.rsplit_once('-') {
        let tail_lower = tail.to_ascii_lowercase();
        if STYLE_SEGMENTS.contains(&tail_lower.as_str()) {
            family = head;
        } else if STYLE_SEGMENTS
            .iter()
            .filter_map(|s| tail_lower.strip_suffix(s))
            .any(|w| WEIGHT_SEGMENTS.contains(&w))
        {
            family = head;
        }
    }

    if let Some((head, tail)) = family.rsplit_once('-') {
        if WEIGHT_SEGMENTS.contains(&tail.to_ascii_lowercase().as_str()) {
            family = head;
        }
    }

    let family = family.trim();
    if family.is_empty() {
        stem.to_string()
    } else {
        family.to_string()
    }
}

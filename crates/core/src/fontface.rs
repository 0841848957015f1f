//! `@font-face` generation.
//!
//! Rules are rebuilt from the registry on every call, family by family in
//! creation order and variant by variant in append order.

use crate::registry::AssetRegistry;
use crate::substitute::inline_reference;
use log::debug;
use quire_types::{FontFamily, FontVariant};
use std::fmt::Write;

/// Where a rule's `src` points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSourceForm {
    /// Embedded payload, or the variant's source override. Used for preview.
    Inline,
    /// `fonts/<family>/<filename>` relative to the archive root. Used for export.
    Path,
}

pub fn font_face_css(registry: &AssetRegistry, form: FontSourceForm) -> String {
    let mut css = String::new();
    for family in registry.families() {
        for variant in &family.variants {
            let Some(src) = variant_source(family, variant, form) else {
                debug!(
                    "Skipping @font-face for '{}' in family '{}': no payload",
                    variant.original_filename, family.name
                );
                continue;
            };
            // Writing into a String cannot fail.
            let _ = write!(
                css,
                "@font-face {{\n  font-family: '{}';\n  src: url('{}') format('{}');\n  font-weight: {};\n  font-style: {};\n}}\n\n",
                escape_family(&family.name),
                src,
                variant.format.css_token(),
                variant.weight.numeric_value(),
                variant.style.css_token(),
            );
        }
    }
    css
}

/// Archive path of a variant: `fonts/<family>/<filename>`.
pub fn font_entry_path(family: &str, filename: &str) -> String {
    format!("{}/{}/{}", crate::package::FONTS_DIR, family, filename)
}

fn variant_source(family: &FontFamily, variant: &FontVariant, form: FontSourceForm) -> Option<String> {
    match form {
        FontSourceForm::Inline => variant
            .source_override
            .clone()
            .or_else(|| inline_reference(variant.format.mime_type(), &variant.payload)),
        FontSourceForm::Path => Some(font_entry_path(&family.name, &variant.original_filename)),
    }
}

fn escape_family(name: &str) -> String {
    name.replace('\\', "\\\\").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_types::{FontFormat, FontStyle, FontWeight};

    fn registry() -> AssetRegistry {
        let mut registry = AssetRegistry::new();
        registry.add_font_variant(
            "Foo",
            FontVariant::new("Foo-Bold.ttf", FontWeight::Bold, FontStyle::Normal, FontFormat::TrueType, vec![1, 2, 3]),
        );
        registry.add_font_variant(
            "Bar",
            FontVariant::new("Bar-Italic.woff2", FontWeight::Regular, FontStyle::Italic, FontFormat::Woff2, vec![4]),
        );
        registry
    }

    #[test]
    fn test_inline_rules() {
        let css = font_face_css(&registry(), FontSourceForm::Inline);
        let expected = "@font-face {\n  font-family: 'Foo';\n  src: url('data:font/ttf;base64,AQID') format('truetype');\n  font-weight: 700;\n  font-style: normal;\n}\n\n\
@font-face {\n  font-family: 'Bar';\n  src: url('data:font/woff2;base64,BA==') format('woff2');\n  font-weight: 400;\n  font-style: italic;\n}\n\n";
        assert_eq!(css, expected);
    }

    #[test]
    fn test_path_rules() {
        let css = font_face_css(&registry(), FontSourceForm::Path);
        assert!(css.contains("src: url('fonts/Foo/Foo-Bold.ttf') format('truetype');"));
        assert!(css.contains("src: url('fonts/Bar/Bar-Italic.woff2') format('woff2');"));
        assert!(css.find("'Foo'").unwrap() < css.find("'Bar'").unwrap());
    }

    #[test]
    fn test_source_override_and_empty_payload() {
        let mut registry = registry();
        registry
            .set_variant_source("Bar", 0, Some("https://cdn.example/bar.woff2".into()))
            .unwrap();
        registry.add_font_variant(
            "Empty",
            FontVariant::new("Empty.otf", FontWeight::Regular, FontStyle::Normal, FontFormat::OpenType, Vec::new()),
        );

        let inline = font_face_css(&registry, FontSourceForm::Inline);
        assert!(inline.contains("url('https://cdn.example/bar.woff2')"));
        assert!(!inline.contains("'Empty'"));

        let path = font_face_css(&registry, FontSourceForm::Path);
        assert!(path.contains("url('fonts/Bar/Bar-Italic.woff2')"));
        assert!(path.contains("url('fonts/Empty/Empty.otf')"));
    }

    #[test]
    fn test_family_name_is_quoted_safely() {
        let mut registry = AssetRegistry::new();
        registry.add_font_variant(
            "O'Brien Sans",
            FontVariant::new("a.ttf", FontWeight::Regular, FontStyle::Normal, FontFormat::TrueType, vec![0]),
        );
        let css = font_face_css(&registry, FontSourceForm::Inline);
        assert!(css.contains(r"font-family: 'O\'Brien Sans';"));
    }

    #[test]
    fn test_empty_registry_yields_empty_css() {
        assert!(font_face_css(&AssetRegistry::new(), FontSourceForm::Inline).is_empty());
    }
}

//! Bidirectional rewriting of image references inside source text.
//!
//! Edit-time text carries images as `data:` URLs (the inline form). Exported
//! text carries them as `images/<originalFilename>` (the path form). Both
//! directions are literal, global and single-pass: every replacement is
//! decided against the original text, so one asset's replacement can never
//! be rewritten again by another asset's token.

use crate::registry::AssetRegistry;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use log::{debug, warn};
use once_cell::sync::Lazy;
use quire_types::{AssetId, ImageAsset};
use regex::{Captures, Regex};
use std::collections::HashMap;

/// Structural shape of an embedded reference. Only candidates are found
/// here; whether a candidate belongs to an asset is decided by exact lookup.
static DATA_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"data:[A-Za-z0-9.+/-]+;base64,[A-Za-z0-9+/]*={0,2}")
        .expect("BUG: invalid DATA_URL regex literal")
});

/// Escapes every pattern metacharacter so the token matches only itself.
pub fn escape_token(token: &str) -> String {
    regex::escape(token)
}

/// Encodes a payload as `data:<mime>;base64,<payload>`.
///
/// The encoding is a pure function of its inputs. Empty payloads have no
/// inline form and yield `None`.
pub fn inline_reference(mime: &str, payload: &[u8]) -> Option<String> {
    if payload.is_empty() || mime.is_empty() {
        return None;
    }
    Some(format!("data:{};base64,{}", mime, BASE64.encode(payload)))
}

pub fn image_reference(image: &ImageAsset) -> Option<String> {
    let reference = inline_reference(image.format.mime_type(), &image.payload);
    if reference.is_none() {
        debug!("Image '{}' has an empty payload; skipping substitution", image.original_filename);
    }
    reference
}

/// Rewrites image references against one registry snapshot.
#[derive(Debug, Clone, Copy)]
pub struct SubstitutionEngine<'a> {
    registry: &'a AssetRegistry,
}

impl<'a> SubstitutionEngine<'a> {
    pub fn new(registry: &'a AssetRegistry) -> Self {
        Self { registry }
    }

    /// Replaces every path token (`images/<originalFilename>`, and the
    /// `images/<id>.<ext>` alias) with the asset's inline reference.
    pub fn inline(&self, text: &str) -> String {
        let mut table: HashMap<String, String> = HashMap::new();
        for image in self.registry.images() {
            let Some(reference) = image_reference(image) else {
                continue;
            };
            table.insert(image.id_path_token(), reference.clone());
            // Later images win a shared filename, like the exported archive.
            table.insert(image.path_token(), reference);
        }
        replace_tokens(text, &table)
    }

    /// Replaces every inline reference of a registered image with its path
    /// token. Unknown `data:` URLs pass through untouched.
    ///
    /// A candidate that runs on past a known reference (the reference was
    /// followed directly by base64-alphabet text) keeps that tail verbatim
    /// after the path token, so inlining the result restores the input.
    pub fn externalize(&self, text: &str) -> String {
        let mut table: HashMap<String, String> = HashMap::new();
        for image in self.registry.images() {
            if let Some(reference) = image_reference(image) {
                table.insert(reference, image.path_token());
            }
        }
        if table.is_empty() {
            return text.to_string();
        }
        DATA_URL
            .replace_all(text, |caps: &Captures| {
                let found = &caps[0];
                if let Some(token) = table.get(found) {
                    return token.clone();
                }
                match longest_known_prefix(found, &table) {
                    Some((reference, token)) => format!("{}{}", token, &found[reference.len()..]),
                    None => found.to_string(),
                }
            })
            .into_owned()
    }

    /// `<img>` markup for an image in inline form, ready to paste into the
    /// structure buffer.
    pub fn image_markup(&self, id: &AssetId) -> Option<String> {
        let image = self.registry.image(id)?;
        let reference = image_reference(image)?;
        Some(format!(
            r#"<img src="{}" alt="{}" style="max-width: 100%; height: auto;">"#,
            reference,
            image.original_filename.replace('"', "&quot;")
        ))
    }
}

fn longest_known_prefix<'t>(found: &str, table: &'t HashMap<String, String>) -> Option<(&'t str, &'t str)> {
    table
        .iter()
        .filter(|(reference, _)| found.starts_with(reference.as_str()))
        .max_by_key(|(reference, _)| reference.len())
        .map(|(reference, token)| (reference.as_str(), token.as_str()))
}

/// Single-pass literal replacement of every key of `table` in `text`.
///
/// Keys are joined into one alternation, longest first, so a token that is
/// a prefix of another never steals its match.
fn replace_tokens(text: &str, table: &HashMap<String, String>) -> String {
    if table.is_empty() || text.is_empty() {
        return text.to_string();
    }
    let mut tokens: Vec<&str> = table.keys().map(String::as_str).collect();
    tokens.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let pattern = tokens
        .iter()
        .map(|t| escape_token(t))
        .collect::<Vec<_>>()
        .join("|");

    let matcher = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            warn!("Could not build substitution pattern for {} tokens: {}", tokens.len(), e);
            return text.to_string();
        }
    };
    matcher
        .replace_all(text, |caps: &Captures| {
            let found = &caps[0];
            table.get(found).cloned().unwrap_or_else(|| found.to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_types::ImageFormat;

    fn registry_with(images: &[(&str, &str)]) -> (AssetRegistry, Vec<AssetId>) {
        let mut registry = AssetRegistry::new();
        let mut ids = Vec::new();
        for (name, content) in images {
            let format = ImageFormat::from_filename(name).unwrap_or(ImageFormat::Png);
            ids.push(registry.add_image(*name, format, content.as_bytes().to_vec()));
        }
        (registry, ids)
    }

    #[test]
    fn test_inline_reference_is_deterministic() {
        let a = inline_reference("image/png", &[1, 2, 3]).unwrap();
        let b = inline_reference("image/png", &[1, 2, 3]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, "data:image/png;base64,AQID");
        assert_eq!(inline_reference("image/png", &[]), None);
    }

    #[test]
    fn test_escape_token() {
        assert_eq!(escape_token("images/a+b.png"), r"images/a\+b\.png");
        assert_eq!(escape_token("x(1).jpg"), r"x\(1\)\.jpg");
    }

    #[test]
    fn test_global_replacement_in_both_directions() {
        let (registry, _) = registry_with(&[("logo.png", "PNG")]);
        let engine = SubstitutionEngine::new(&registry);
        let reference = inline_reference("image/png", b"PNG").unwrap();
        let source = format!(
            r#"<img src="{r}"><p>text</p><img src="{r}"><div style="background:url('{r}')"></div>"#,
            r = reference
        );

        let external = engine.externalize(&source);
        assert_eq!(external.matches("images/logo.png").count(), 3);
        assert!(!external.contains("data:"));

        let back = engine.inline(&external);
        assert_eq!(back, source);
    }

    #[test]
    fn test_metacharacter_filenames_round_trip() {
        let (registry, _) = registry_with(&[
            ("a+b.png", "plus"),
            ("x(1).jpg", "paren"),
            ("[q]^$.gif", "brackets"),
        ]);
        let engine = SubstitutionEngine::new(&registry);
        let source = r#"<img src="images/a+b.png"> aab.png images/x(1).jpg images/x1.jpg <img src="images/[q]^$.gif">"#;

        let inlined = engine.inline(source);
        assert!(inlined.contains(" aab.png "));
        assert!(inlined.contains(" images/x1.jpg "));
        assert_eq!(inlined.matches("data:").count(), 3);

        assert_eq!(engine.externalize(&inlined), source);
    }

    #[test]
    fn test_prefix_tokens_do_not_steal_matches() {
        let (registry, _) = registry_with(&[("a.png", "short"), ("a.png.png", "long")]);
        let engine = SubstitutionEngine::new(&registry);

        let inlined = engine.inline("images/a.png.png|images/a.png");
        let long = inline_reference("image/png", b"long").unwrap();
        let short = inline_reference("image/png", b"short").unwrap();
        assert_eq!(inlined, format!("{}|{}", long, short));
    }

    #[test]
    fn test_unknown_data_urls_are_untouched() {
        let (registry, _) = registry_with(&[("logo.png", "known")]);
        let engine = SubstitutionEngine::new(&registry);
        let foreign = inline_reference("image/png", b"someone else").unwrap();
        let source = format!(r#"<img src="{}">"#, foreign);

        assert_eq!(engine.externalize(&source), source);
    }

    #[test]
    fn test_reference_followed_by_base64_text_round_trips() {
        let (registry, _) = registry_with(&[("a.png", "\x01\x02\x03")]);
        let engine = SubstitutionEngine::new(&registry);
        let source = "<div data-x=images/a.pngA>";

        let inlined = engine.inline(source);
        assert_eq!(inlined, "<div data-x=data:image/png;base64,AQIDA>");
        assert_eq!(engine.externalize(&inlined), source);
    }

    #[test]
    fn test_id_alias_resolves_to_inline_form() {
        let (registry, ids) = registry_with(&[("photo.jpg", "jpeg bytes")]);
        let engine = SubstitutionEngine::new(&registry);
        let alias = format!("images/{}.jpg", ids[0]);

        let inlined = engine.inline(&format!(r#"<img src="{}">"#, alias));
        let expected = inline_reference("image/jpeg", b"jpeg bytes").unwrap();
        assert_eq!(inlined, format!(r#"<img src="{}">"#, expected));
    }

    #[test]
    fn test_empty_payload_is_skipped() {
        let (registry, _) = registry_with(&[("empty.png", "")]);
        let engine = SubstitutionEngine::new(&registry);

        assert_eq!(engine.inline("images/empty.png"), "images/empty.png");
    }

    #[test]
    fn test_text_without_tokens_is_unchanged() {
        let (registry, _) = registry_with(&[("logo.png", "x")]);
        let engine = SubstitutionEngine::new(&registry);
        let source = "<p>images/ logo.png data:image/png;base64 $1 \\0</p>";

        assert_eq!(engine.inline(source), source);
        assert_eq!(engine.externalize(source), source);
    }

    #[test]
    fn test_image_markup() {
        let (registry, ids) = registry_with(&[("logo.png", "\x01\x02\x03")]);
        let engine = SubstitutionEngine::new(&registry);

        assert_eq!(
            engine.image_markup(&ids[0]).unwrap(),
            r#"<img src="data:image/png;base64,AQID" alt="logo.png" style="max-width: 100%; height: auto;">"#
        );
        assert!(engine.image_markup(&AssetId::new("missing")).is_none());
    }
}

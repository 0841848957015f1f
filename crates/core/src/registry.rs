//! In-memory registry of the document's images and font families.
//!
//! The registry is created empty for each editing session and is never
//! persisted directly: it only leaves memory through the export pipeline and
//! only comes back through the import pipeline.

use crate::error::RegistryError;
use crate::package::segment_problem;
use log::debug;
use quire_types::{AssetId, FontFamily, FontVariant, ImageAsset, ImageFormat};
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;

const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
/// 16 base-36 digits carry a little over 82 bits of entropy.
const ID_SUFFIX_LEN: usize = 16;

/// Generates `img_<unix millis>_<random suffix>`.
pub fn generate_image_id() -> AssetId {
    let mut rng = rand::rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect();
    AssetId::from(format!(
        "img_{}_{}",
        chrono::Utc::now().timestamp_millis(),
        suffix
    ))
}

#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    images: Vec<ImageAsset>,
    families: Vec<FontFamily>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // --- images ---

    /// Stores an image under a freshly generated identifier.
    pub fn add_image(&mut self, filename: impl Into<String>, format: ImageFormat, payload: Vec<u8>) -> AssetId {
        let mut id = generate_image_id();
        while self.image(&id).is_some() {
            id = generate_image_id();
        }
        let image = ImageAsset::new(id.clone(), filename, format, payload);
        debug!(
            "Registered image '{}' as {} ({} bytes)",
            image.original_filename, id, image.byte_size
        );
        self.images.push(image);
        id
    }

    /// Removes an image; absent ids are a no-op.
    pub fn remove_image(&mut self, id: &AssetId) -> Option<ImageAsset> {
        let pos = self.images.iter().position(|img| &img.id == id)?;
        Some(self.images.remove(pos))
    }

    pub fn image(&self, id: &AssetId) -> Option<&ImageAsset> {
        self.images.iter().find(|img| &img.id == id)
    }

    /// Images in upload/import order.
    pub fn images(&self) -> &[ImageAsset] {
        &self.images
    }

    /// Original filenames shared by more than one image. Such images collide
    /// on their path token and on their archive entry.
    pub fn colliding_filenames(&self) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for image in &self.images {
            *counts.entry(image.original_filename.as_str()).or_default() += 1;
        }
        let mut seen = Vec::new();
        for image in &self.images {
            let name = image.original_filename.as_str();
            if counts[name] > 1 && !seen.iter().any(|s: &String| s == name) {
                seen.push(name.to_string());
            }
        }
        seen
    }

    // --- fonts ---

    /// Appends a variant, creating the family if it does not exist yet.
    pub fn add_font_variant(&mut self, family_name: &str, variant: FontVariant) {
        let family = match self.families.iter().position(|f| f.name == family_name) {
            Some(pos) => &mut self.families[pos],
            None => {
                self.families.push(FontFamily::new(family_name));
                let last = self.families.len() - 1;
                &mut self.families[last]
            }
        };
        debug!(
            "Added {} {} variant '{}' to family '{}'",
            variant.weight.display_name(),
            variant.style,
            variant.original_filename,
            family_name
        );
        family.variants.push(variant);
    }

    /// Removes one variant. A family left without variants is removed too.
    pub fn remove_font_variant(&mut self, family_name: &str, index: usize) -> Result<FontVariant, RegistryError> {
        let pos = self.family_position(family_name)?;
        let family = &mut self.families[pos];
        if index >= family.variants.len() {
            return Err(RegistryError::VariantOutOfRange {
                family: family_name.to_string(),
                index,
            });
        }
        let removed = family.variants.remove(index);
        if family.variants.is_empty() {
            debug!("Pruning empty font family '{}'", family_name);
            self.families.remove(pos);
        }
        Ok(removed)
    }

    /// Removes a whole family; absent names are a no-op.
    pub fn remove_family(&mut self, family_name: &str) -> Option<FontFamily> {
        let pos = self.families.iter().position(|f| f.name == family_name)?;
        Some(self.families.remove(pos))
    }

    /// Renames a family in place. Fails without touching state when the new
    /// name is empty, already taken, or unusable as an archive directory.
    pub fn rename_family(&mut self, old: &str, new: &str) -> Result<(), RegistryError> {
        let new = new.trim();
        if new.is_empty() || self.family_exists(new) {
            return Err(RegistryError::NameConflict(new.to_string()));
        }
        if let Some(reason) = segment_problem(new) {
            return Err(RegistryError::InvalidName {
                name: new.to_string(),
                reason,
            });
        }
        let pos = self.family_position(old)?;
        self.families[pos].name = new.to_string();
        debug!("Renamed font family '{}' to '{}'", old, new);
        Ok(())
    }

    /// Overrides the `src` URL emitted for one variant's inline `@font-face`
    /// rule. `None` restores the embedded payload.
    pub fn set_variant_source(
        &mut self,
        family_name: &str,
        index: usize,
        source: Option<String>,
    ) -> Result<(), RegistryError> {
        let pos = self.family_position(family_name)?;
        let variant = self.families[pos].variants.get_mut(index).ok_or_else(|| {
            RegistryError::VariantOutOfRange {
                family: family_name.to_string(),
                index,
            }
        })?;
        variant.source_override = source.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        Ok(())
    }

    pub fn family_exists(&self, name: &str) -> bool {
        self.families.iter().any(|f| f.name == name)
    }

    pub fn family(&self, name: &str) -> Option<&FontFamily> {
        self.families.iter().find(|f| f.name == name)
    }

    /// Families in creation order; variants in append order.
    pub fn families(&self) -> &[FontFamily] {
        &self.families
    }

    pub fn variant_count(&self) -> usize {
        self.families.iter().map(|f| f.variants.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.families.is_empty()
    }

    pub fn clear(&mut self) {
        self.images.clear();
        self.families.clear();
    }

    fn family_position(&self, name: &str) -> Result<usize, RegistryError> {
        self.families
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| RegistryError::UnknownFamily(name.to_string()))
    }

    // --- listings ---

    pub fn family_summaries(&self) -> Vec<FamilySummary> {
        self.families
            .iter()
            .map(|family| FamilySummary {
                name: family.name.clone(),
                usage: format!("font-family: '{}'", family.name),
                variants: family
                    .variants
                    .iter()
                    .map(|v| VariantSummary {
                        weight: v.weight.numeric_value(),
                        weight_name: v.weight.display_name().to_string(),
                        italic: v.style == quire_types::FontStyle::Italic,
                        format: v.format.css_token().to_string(),
                        filename: v.original_filename.clone(),
                        size_kib: kib(v.byte_size),
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn image_summaries(&self) -> Vec<ImageSummary> {
        self.images
            .iter()
            .map(|img| ImageSummary {
                id: img.id.to_string(),
                filename: img.original_filename.clone(),
                path: img.path_token(),
                size_kib: kib(img.byte_size),
            })
            .collect()
    }
}

fn kib(bytes: usize) -> f64 {
    (bytes as f64 / 1024.0 * 10.0).round() / 10.0
}

/// One row of the font list.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FamilySummary {
    pub name: String,
    pub usage: String,
    pub variants: Vec<VariantSummary>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VariantSummary {
    pub weight: u16,
    pub weight_name: String,
    pub italic: bool,
    pub format: String,
    pub filename: String,
    pub size_kib: f64,
}

/// One row of the image list.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageSummary {
    pub id: String,
    pub filename: String,
    pub path: String,
    pub size_kib: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_types::{FontFormat, FontStyle, FontWeight};

    fn variant(filename: &str, weight: FontWeight, style: FontStyle) -> FontVariant {
        FontVariant::new(filename, weight, style, FontFormat::TrueType, vec![0, 1, 0, 0])
    }

    #[test]
    fn test_generated_ids_are_unique_and_prefixed() {
        let ids: std::collections::HashSet<_> = (0..500).map(|_| generate_image_id()).collect();
        assert_eq!(ids.len(), 500);
        let sample = generate_image_id();
        let parts: Vec<_> = sample.as_str().split('_').collect();
        assert_eq!(parts[0], "img");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), ID_SUFFIX_LEN);
    }

    #[test]
    fn test_add_and_remove_image() {
        let mut registry = AssetRegistry::new();
        let id = registry.add_image("logo.png", ImageFormat::Png, vec![1, 2, 3]);

        assert_eq!(registry.image(&id).map(|i| i.byte_size), Some(3));
        assert!(registry.remove_image(&id).is_some());
        assert!(registry.image(&id).is_none());
        // Removing again is a no-op.
        assert!(registry.remove_image(&id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_same_filename_gets_distinct_ids() {
        let mut registry = AssetRegistry::new();
        let a = registry.add_image("pic.png", ImageFormat::Png, vec![1]);
        let b = registry.add_image("pic.png", ImageFormat::Png, vec![2]);

        assert_ne!(a, b);
        assert_eq!(registry.images().len(), 2);
        assert_eq!(registry.colliding_filenames(), ["pic.png"]);
    }

    #[test]
    fn test_variants_append_in_order() {
        let mut registry = AssetRegistry::new();
        registry.add_font_variant("Foo", variant("Foo-Bold.ttf", FontWeight::Bold, FontStyle::Normal));
        registry.add_font_variant("Bar", variant("Bar.ttf", FontWeight::Regular, FontStyle::Normal));
        registry.add_font_variant("Foo", variant("Foo-Thin.ttf", FontWeight::Thin, FontStyle::Normal));

        let names: Vec<_> = registry.families().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Foo", "Bar"]);
        let foo = registry.family("Foo").unwrap();
        assert_eq!(foo.variants[0].original_filename, "Foo-Bold.ttf");
        assert_eq!(foo.variants[1].original_filename, "Foo-Thin.ttf");
        assert_eq!(registry.variant_count(), 3);
    }

    #[test]
    fn test_removing_last_variant_prunes_family() {
        let mut registry = AssetRegistry::new();
        registry.add_font_variant("Foo", variant("Foo.ttf", FontWeight::Regular, FontStyle::Normal));
        registry.add_font_variant("Foo", variant("Foo-Italic.ttf", FontWeight::Regular, FontStyle::Italic));

        registry.remove_font_variant("Foo", 0).unwrap();
        assert!(registry.family_exists("Foo"));
        registry.remove_font_variant("Foo", 0).unwrap();
        assert!(!registry.family_exists("Foo"));
        assert!(registry.families().is_empty());
    }

    #[test]
    fn test_remove_variant_out_of_range() {
        let mut registry = AssetRegistry::new();
        registry.add_font_variant("Foo", variant("Foo.ttf", FontWeight::Regular, FontStyle::Normal));

        assert_eq!(
            registry.remove_font_variant("Foo", 5),
            Err(RegistryError::VariantOutOfRange {
                family: "Foo".into(),
                index: 5
            })
        );
        assert!(matches!(
            registry.remove_font_variant("Nope", 0),
            Err(RegistryError::UnknownFamily(_))
        ));
    }

    #[test]
    fn test_rename_conflict_leaves_both_families() {
        let mut registry = AssetRegistry::new();
        registry.add_font_variant("A", variant("A.ttf", FontWeight::Regular, FontStyle::Normal));
        registry.add_font_variant("B", variant("B.ttf", FontWeight::Bold, FontStyle::Normal));
        let before = registry.families().to_vec();

        let result = registry.rename_family("A", "B");

        assert_eq!(result, Err(RegistryError::NameConflict("B".into())));
        assert_eq!(registry.families(), before.as_slice());
    }

    #[test]
    fn test_rename_rejects_empty_and_keeps_position() {
        let mut registry = AssetRegistry::new();
        registry.add_font_variant("A", variant("A.ttf", FontWeight::Regular, FontStyle::Normal));
        registry.add_font_variant("B", variant("B.ttf", FontWeight::Regular, FontStyle::Normal));

        assert!(registry.rename_family("A", "   ").is_err());
        registry.rename_family("A", " Serif Display ").unwrap();

        let names: Vec<_> = registry.families().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Serif Display", "B"]);
        assert!(matches!(
            registry.rename_family("Missing", "C"),
            Err(RegistryError::UnknownFamily(_))
        ));
    }

    #[test]
    fn test_rename_rejects_path_like_names() {
        let mut registry = AssetRegistry::new();
        registry.add_font_variant("Foo", variant("Foo.ttf", FontWeight::Regular, FontStyle::Normal));

        for bad in ["a/b", "..", ".", "x\\y"] {
            assert!(
                matches!(registry.rename_family("Foo", bad), Err(RegistryError::InvalidName { .. })),
                "{bad} should be rejected"
            );
        }
        assert!(registry.family_exists("Foo"));
        assert_eq!(registry.families().len(), 1);
    }

    #[test]
    fn test_set_variant_source() {
        let mut registry = AssetRegistry::new();
        registry.add_font_variant("Foo", variant("Foo.ttf", FontWeight::Regular, FontStyle::Normal));

        registry
            .set_variant_source("Foo", 0, Some(" https://cdn.example/foo.woff2 ".into()))
            .unwrap();
        assert_eq!(
            registry.family("Foo").unwrap().variants[0].source_override.as_deref(),
            Some("https://cdn.example/foo.woff2")
        );

        registry.set_variant_source("Foo", 0, None).unwrap();
        assert!(registry.family("Foo").unwrap().variants[0].source_override.is_none());
        assert!(registry.set_variant_source("Foo", 1, None).is_err());
    }

    #[test]
    fn test_remove_family_is_idempotent() {
        let mut registry = AssetRegistry::new();
        registry.add_font_variant("Foo", variant("Foo.ttf", FontWeight::Regular, FontStyle::Normal));

        assert!(registry.remove_family("Foo").is_some());
        assert!(registry.remove_family("Foo").is_none());
    }

    #[test]
    fn test_summaries() {
        let mut registry = AssetRegistry::new();
        registry.add_font_variant(
            "Foo",
            FontVariant::new("Foo-BoldItalic.woff2", FontWeight::Bold, FontStyle::Italic, FontFormat::Woff2, vec![0; 2048]),
        );
        registry.add_image("chart.svg", ImageFormat::Svg, vec![0; 512]);

        let families = registry.family_summaries();
        assert_eq!(families[0].usage, "font-family: 'Foo'");
        assert_eq!(families[0].variants[0].weight_name, "Bold");
        assert!(families[0].variants[0].italic);
        assert_eq!(families[0].variants[0].size_kib, 2.0);

        let images = registry.image_summaries();
        assert_eq!(images[0].path, "images/chart.svg");
        assert_eq!(images[0].size_kib, 0.5);

        let json = serde_json::to_value(&families[0]).unwrap();
        assert_eq!(json["variants"][0]["weightName"], "Bold");

        let json = serde_json::to_value(&images[0]).unwrap();
        assert_eq!(json["id"], images[0].id.as_str());
        assert!(json["id"].as_str().unwrap().starts_with("img_"));
        assert_eq!(json["sizeKib"], 0.5);
    }
}

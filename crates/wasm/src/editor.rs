//! The editor state handle exposed to JavaScript.

use crate::error::QuireError;
use js_sys::{Array, Uint8Array};
use log::info;
use quire_core::{
    AssemblerConfig, AssetRegistry, DEFAULT_ARCHIVE_PREFIX, DocumentAssembler, PackageExporter, PackageImporter,
    SubstitutionEngine, archive_file_name, upload_fonts, upload_images,
};
use quire_resource::ZipArchiveCodec;
use quire_traits::CompressionPolicy;
use quire_types::{AssetId, DocumentSource, SourceKind};
use wasm_bindgen::prelude::*;

/// Document source plus asset registry, owned by the page.
///
/// Every UI callback goes through this handle so there is exactly one copy of
/// the editor state on the WASM side.
#[wasm_bindgen]
pub struct QuireEditor {
    source: DocumentSource,
    registry: AssetRegistry,
    assembler: DocumentAssembler,
    compression: CompressionPolicy,
}

impl Default for QuireEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl QuireEditor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            source: DocumentSource::default(),
            registry: AssetRegistry::new(),
            assembler: DocumentAssembler::new(AssemblerConfig::default()),
            compression: CompressionPolicy::maximum(),
        }
    }

    /// Override page size and margin used by [`assemble`](Self::assemble).
    #[wasm_bindgen(js_name = setPageSetup)]
    pub fn set_page_setup(&mut self, page_size: String, page_margin: String) {
        let config = AssemblerConfig {
            page_size,
            page_margin,
            ..self.assembler.config().clone()
        };
        self.assembler = DocumentAssembler::new(config);
    }

    #[wasm_bindgen(js_name = setCompressionLevel)]
    pub fn set_compression_level(&mut self, level: u8) -> Result<(), JsValue> {
        self.compression = CompressionPolicy::with_level(level)
            .ok_or_else(|| QuireError::config(format!("Compression level {} is out of range 0-9", level)))?;
        Ok(())
    }

    /// `kind` is one of `structure`, `style` or `behavior`.
    #[wasm_bindgen(js_name = setSource)]
    pub fn set_source(&mut self, kind: &str, text: String) -> Result<(), JsValue> {
        self.source.set(parse_kind(kind)?, text);
        Ok(())
    }

    #[wasm_bindgen(js_name = getSource)]
    pub fn get_source(&self, kind: &str) -> Result<String, JsValue> {
        Ok(self.source.get(parse_kind(kind)?).to_string())
    }

    /// Adds image files. `names[i]` pairs with `files[i]` (a `Uint8Array`);
    /// the two arrays must have the same length. Returns `{ accepted, skipped }`.
    #[wasm_bindgen(js_name = uploadImages)]
    pub fn upload_images(&mut self, names: Vec<String>, files: Array) -> Result<JsValue, JsValue> {
        let report = upload_images(&mut self.registry, pair_files(names, &files)?);
        Ok(to_js(&report)?)
    }

    #[wasm_bindgen(js_name = uploadFonts)]
    pub fn upload_fonts(&mut self, names: Vec<String>, files: Array) -> Result<JsValue, JsValue> {
        let report = upload_fonts(&mut self.registry, pair_files(names, &files)?);
        Ok(to_js(&report)?)
    }

    #[wasm_bindgen(js_name = removeImage)]
    pub fn remove_image(&mut self, id: &str) -> bool {
        self.registry.remove_image(&AssetId::from(id)).is_some()
    }

    #[wasm_bindgen(js_name = removeFontVariant)]
    pub fn remove_font_variant(&mut self, family: &str, index: usize) -> Result<(), JsValue> {
        self.registry
            .remove_font_variant(family, index)
            .map_err(QuireError::from)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = removeFamily)]
    pub fn remove_family(&mut self, family: &str) -> bool {
        self.registry.remove_family(family).is_some()
    }

    #[wasm_bindgen(js_name = renameFamily)]
    pub fn rename_family(&mut self, old: &str, new: &str) -> Result<(), JsValue> {
        self.registry.rename_family(old, new).map_err(QuireError::from)?;
        Ok(())
    }

    /// Pass `undefined` or an empty string to restore the embedded payload.
    #[wasm_bindgen(js_name = setVariantSource)]
    pub fn set_variant_source(&mut self, family: &str, index: usize, url: Option<String>) -> Result<(), JsValue> {
        self.registry
            .set_variant_source(family, index, url)
            .map_err(QuireError::from)?;
        Ok(())
    }

    /// `<img>` markup for pasting an image into the structure buffer.
    #[wasm_bindgen(js_name = imageMarkup)]
    pub fn image_markup(&self, id: &str) -> Option<String> {
        SubstitutionEngine::new(&self.registry).image_markup(&AssetId::from(id))
    }

    #[wasm_bindgen(js_name = fontList)]
    pub fn font_list(&self) -> Result<JsValue, JsValue> {
        Ok(to_js(&self.registry.family_summaries())?)
    }

    #[wasm_bindgen(js_name = imageList)]
    pub fn image_list(&self) -> Result<JsValue, JsValue> {
        Ok(to_js(&self.registry.image_summaries())?)
    }

    /// Self-contained HTML for the preview frame.
    pub fn assemble(&self) -> String {
        self.assembler.assemble(&self.source, &self.registry)
    }

    #[wasm_bindgen(js_name = exportArchive)]
    pub fn export_archive(&self) -> Result<Vec<u8>, JsValue> {
        let codec = ZipArchiveCodec::new();
        let bytes = PackageExporter::new(&codec)
            .with_policy(self.compression)
            .export(&self.source, &self.registry)
            .map_err(QuireError::from)?;
        info!("Exported archive ({} bytes)", bytes.len());
        Ok(bytes)
    }

    /// Download name for [`export_archive`](Self::export_archive).
    #[wasm_bindgen(js_name = archiveFileName)]
    pub fn archive_file_name(&self, prefix: Option<String>) -> String {
        archive_file_name(prefix.as_deref().unwrap_or(DEFAULT_ARCHIVE_PREFIX))
    }

    /// Loads a zip archive. Returns the import report; unreadable entries are
    /// listed in its `failures` rather than thrown.
    #[wasm_bindgen(js_name = importArchive)]
    pub fn import_archive(&mut self, bytes: Vec<u8>) -> Result<JsValue, JsValue> {
        let codec = ZipArchiveCodec::new();
        let report = PackageImporter::new(&codec)
            .import(bytes, &mut self.source, &mut self.registry)
            .map_err(QuireError::from)?;
        Ok(to_js(&report)?)
    }

    /// Drops all sources and assets.
    pub fn clear(&mut self) {
        self.source = DocumentSource::default();
        self.registry.clear();
    }
}

impl QuireEditor {
    pub fn source(&self) -> &DocumentSource {
        &self.source
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }
}

fn parse_kind(kind: &str) -> Result<SourceKind, QuireError> {
    match kind {
        "structure" => Ok(SourceKind::Structure),
        "style" => Ok(SourceKind::Style),
        "behavior" => Ok(SourceKind::Behavior),
        other => Err(QuireError::config(format!("Unknown source kind '{}'", other))),
    }
}

fn pair_files(names: Vec<String>, files: &Array) -> Result<Vec<(String, Vec<u8>)>, QuireError> {
    check_pairing(names.len(), files.length() as usize)?;
    Ok(names
        .into_iter()
        .zip(files.iter())
        .map(|(name, data)| (name, Uint8Array::new(&data).to_vec()))
        .collect())
}

fn check_pairing(names: usize, files: usize) -> Result<(), QuireError> {
    if names != files {
        return Err(QuireError::config(format!(
            "Got {} file names for {} files",
            names, files
        )));
    }
    Ok(())
}

fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> Result<JsValue, QuireError> {
    Ok(serde_wasm_bindgen::to_value(value)?)
}

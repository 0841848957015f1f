use super::FONTS_DIR;
use crate::classify::{classify, font_format_for};
use crate::error::{FailurePolicy, PackageError};
use crate::registry::AssetRegistry;
use crate::substitute::SubstitutionEngine;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use quire_traits::{ArchiveCodec, ArchiveError, ArchiveReader};
use quire_types::asset::IMAGES_DIR;
use quire_types::{DocumentSource, FontVariant, ImageFormat, SourceKind};
use regex::Regex;
use serde::Serialize;

static BODY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<body[^>]*>(.*?)</body>").expect("BUG: invalid BODY regex literal"));
static SCRIPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("BUG: invalid SCRIPT regex literal"));
static FONT_FACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@font-face\s*\{[^}]*\}").expect("BUG: invalid FONT_FACE regex literal"));
static BLANK_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n\s*\n").expect("BUG: invalid BLANK_RUN regex literal"));

/// Keeps only the content of `<body>` when the markup is a full document,
/// and drops every `<script>` element.
pub fn extract_body_fragment(markup: &str) -> String {
    let fragment = match BODY.captures(markup).and_then(|c| c.get(1)) {
        Some(body) => body.as_str().trim(),
        None => markup,
    };
    SCRIPT.replace_all(fragment, "").trim().to_string()
}

/// Removes `@font-face` rules; they are regenerated from the registry.
pub fn strip_font_faces(css: &str) -> String {
    let stripped = FONT_FACE.replace_all(css, "");
    BLANK_RUN.replace_all(&stripped, "\n\n").trim().to_string()
}

/// An entry that was listed but could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryFailure {
    pub path: String,
    pub message: String,
}

/// What an import actually loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub sources_loaded: Vec<SourceKind>,
    pub fonts_loaded: usize,
    pub images_loaded: usize,
    /// Entries ignored because their location or extension is not recognized.
    pub skipped: usize,
    pub failures: Vec<EntryFailure>,
}

impl ImportReport {
    pub fn loaded(&self, kind: SourceKind) -> bool {
        self.sources_loaded.contains(&kind)
    }

    fn fail(&mut self, path: &str, err: &ArchiveError) {
        warn!("Skipping archive entry '{}': {}", path, err);
        self.failures.push(EntryFailure {
            path: path.to_string(),
            message: err.to_string(),
        });
    }
}

/// Loads an archive into a document and registry.
///
/// Best effort by default: only a failure to open the whole container
/// aborts. Single entries that fail are logged, recorded in the report and
/// skipped. Under [`FailurePolicy::AllOrNothing`] any failed entry aborts
/// the import and leaves the document and registry as they were.
#[derive(Debug, Clone, Copy)]
pub struct PackageImporter<'a> {
    codec: &'a dyn ArchiveCodec,
    policy: FailurePolicy,
}

impl<'a> PackageImporter<'a> {
    pub const POLICY: FailurePolicy = FailurePolicy::BestEffort;

    pub fn new(codec: &'a dyn ArchiveCodec) -> Self {
        Self {
            codec,
            policy: Self::POLICY,
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn import(
        &self,
        bytes: Vec<u8>,
        source: &mut DocumentSource,
        registry: &mut AssetRegistry,
    ) -> Result<ImportReport, PackageError> {
        let mut reader = self.codec.open(bytes)?;
        import_with_policy(reader.as_mut(), self.policy, source, registry)
    }
}

/// Imports under `policy`. A strict import stages into copies and only
/// commits them when every entry loaded.
pub fn import_with_policy(
    reader: &mut dyn ArchiveReader,
    policy: FailurePolicy,
    source: &mut DocumentSource,
    registry: &mut AssetRegistry,
) -> Result<ImportReport, PackageError> {
    if !policy.aborts_on_entry_failure() {
        return Ok(import_from_reader(reader, source, registry));
    }

    let mut staged_source = source.clone();
    let mut staged_registry = registry.clone();
    let report = import_from_reader(reader, &mut staged_source, &mut staged_registry);
    if let Some(failure) = report.failures.first() {
        return Err(PackageError::EntryFailed {
            path: failure.path.clone(),
            message: failure.message.clone(),
        });
    }
    *source = staged_source;
    *registry = staged_registry;
    Ok(report)
}

/// Reads sources, fonts and images from any archive reader.
///
/// Absent source entries leave their buffer untouched. Imported assets are
/// appended to the registry, and the structure is rewritten to inline form
/// once every image is registered.
pub fn import_from_reader(
    reader: &mut dyn ArchiveReader,
    source: &mut DocumentSource,
    registry: &mut AssetRegistry,
) -> ImportReport {
    let mut report = ImportReport::default();

    let mut structure = None;
    for kind in SourceKind::ALL {
        let path = kind.entry_name();
        match reader.read_text(path) {
            Ok(Some(text)) => {
                match kind {
                    SourceKind::Structure => structure = Some(extract_body_fragment(&text)),
                    SourceKind::Style => source.style = strip_font_faces(&text),
                    SourceKind::Behavior => source.behavior = text,
                }
                report.sources_loaded.push(kind);
            }
            Ok(None) => debug!("Archive has no '{}'; keeping the current buffer", path),
            Err(e) => report.fail(path, &e),
        }
    }

    let names = reader.entry_names();
    for name in &names {
        if name.ends_with('/') || SourceKind::ALL.iter().any(|k| k.entry_name() == name) {
            continue;
        }
        let parts: Vec<&str> = name.split('/').collect();
        match parts.as_slice() {
            [FONTS_DIR, family, filename] if !family.is_empty() => {
                load_font(reader, registry, &mut report, name, family, filename)
            }
            [IMAGES_DIR, filename] => load_image(reader, registry, &mut report, name, filename),
            _ => {
                debug!("Ignoring archive entry '{}'", name);
                report.skipped += 1;
            }
        }
    }

    if let Some(fragment) = structure {
        source.structure = SubstitutionEngine::new(registry).inline(&fragment);
    }

    info!(
        "Imported {} source(s), {} font(s), {} image(s); {} skipped, {} failed",
        report.sources_loaded.len(),
        report.fonts_loaded,
        report.images_loaded,
        report.skipped,
        report.failures.len()
    );
    report
}

fn load_font(
    reader: &mut dyn ArchiveReader,
    registry: &mut AssetRegistry,
    report: &mut ImportReport,
    path: &str,
    family: &str,
    filename: &str,
) {
    let Some(format) = font_format_for(filename) else {
        debug!("Ignoring '{}': not a font file", path);
        report.skipped += 1;
        return;
    };
    match reader.read_entry(path) {
        Ok(bytes) => {
            let class = classify(filename);
            registry.add_font_variant(family, FontVariant::new(filename, class.weight, class.style, format, bytes));
            report.fonts_loaded += 1;
        }
        Err(e) => report.fail(path, &e),
    }
}

fn load_image(
    reader: &mut dyn ArchiveReader,
    registry: &mut AssetRegistry,
    report: &mut ImportReport,
    path: &str,
    filename: &str,
) {
    let Some(format) = ImageFormat::from_filename(filename) else {
        debug!("Ignoring '{}': not an image file", path);
        report.skipped += 1;
        return;
    };
    match reader.read_entry(path) {
        Ok(bytes) => {
            registry.add_image(filename, format, bytes);
            report.images_loaded += 1;
        }
        Err(e) => report.fail(path, &e),
    }
}

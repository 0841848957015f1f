use super::segment_problem;
use crate::error::{FailurePolicy, PackageError};
use crate::fontface::{FontSourceForm, font_entry_path, font_face_css};
use crate::normalize::normalize_source;
use crate::registry::AssetRegistry;
use crate::substitute::SubstitutionEngine;
use log::{debug, info, warn};
use quire_traits::{ArchiveCodec, ArchiveEntries, CompressionPolicy};
use quire_types::{DocumentSource, SourceKind};

/// Serializes a document snapshot into an archive.
///
/// All-or-nothing: the archive is assembled in memory and either the
/// complete container bytes are returned or an error is. The live source
/// buffers are only read.
#[derive(Debug, Clone, Copy)]
pub struct PackageExporter<'a> {
    codec: &'a dyn ArchiveCodec,
    policy: CompressionPolicy,
}

impl<'a> PackageExporter<'a> {
    /// Export always produces a consistent snapshot or nothing.
    pub const POLICY: FailurePolicy = FailurePolicy::AllOrNothing;

    pub fn new(codec: &'a dyn ArchiveCodec) -> Self {
        Self {
            codec,
            policy: CompressionPolicy::maximum(),
        }
    }

    pub fn with_policy(mut self, policy: CompressionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn export(&self, source: &DocumentSource, registry: &AssetRegistry) -> Result<Vec<u8>, PackageError> {
        let entries = self.build_entries(source, registry)?;
        let bytes = self.codec.encode(&entries, self.policy)?;
        info!(
            "Exported {} entries ({} bytes) with {} at level {}",
            entries.len(),
            bytes.len(),
            self.codec.name(),
            self.policy.level()
        );
        Ok(bytes)
    }

    /// Produces the archive entries without encoding them.
    pub fn build_entries(&self, source: &DocumentSource, registry: &AssetRegistry) -> Result<ArchiveEntries, PackageError> {
        let mut entries = ArchiveEntries::new();

        let mut style = font_face_css(registry, FontSourceForm::Path);
        style.push_str(&source.style);
        let structure = SubstitutionEngine::new(registry).externalize(&source.structure);

        entries.insert(SourceKind::Structure.entry_name(), normalize_source(&structure).into_bytes());
        entries.insert(SourceKind::Style.entry_name(), normalize_source(&style).into_bytes());
        entries.insert(SourceKind::Behavior.entry_name(), normalize_source(&source.behavior).into_bytes());

        for family in registry.families() {
            check_segment(&family.name, "font family")?;
            for variant in &family.variants {
                check_segment(&variant.original_filename, "font file")?;
                let path = font_entry_path(&family.name, &variant.original_filename);
                if entries.insert(path.clone(), variant.payload.to_vec()).is_some() {
                    warn!("Duplicate font entry '{}'; the later variant is kept", path);
                }
            }
        }

        for image in registry.images() {
            check_segment(&image.original_filename, "image")?;
            let path = image.path_token();
            if entries.insert(path.clone(), image.payload.to_vec()).is_some() {
                warn!("Images share the filename '{}'; the later image is kept in the archive", path);
            }
        }

        debug!(
            "Built {} archive entries for {} families and {} images",
            entries.len(),
            registry.families().len(),
            registry.images().len()
        );
        Ok(entries)
    }
}

/// One path segment of an archive entry name.
fn check_segment(name: &str, what: &str) -> Result<(), PackageError> {
    match segment_problem(name) {
        Some(problem) => Err(PackageError::InvalidEntryName {
            path: name.to_string(),
            reason: format!("{} name {}", what, problem),
        }),
        None => Ok(()),
    }
}

//! The application root: one document, its assets and the orchestration
//! entry points that act on them.

use crate::builder::StudioBuilder;
use crate::config::StudioConfig;
use crate::error::StudioError;
use crate::render::{RenderTimings, paginate};
use crate::status::{LoadingGuard, Notice, StatusSink};
use log::{debug, error, info};
use quire_core::package::import_from_reader;
use quire_core::{
    AssetRegistry, DocumentAssembler, ImportReport, PackageExporter, PackageImporter, SubstitutionEngine,
    UploadReport, archive_file_name, upload_fonts, upload_images,
};
use quire_traits::{ArchiveCodec, ArchiveReader, PaginationEngine, PaginationError};
use quire_types::{AssetId, DocumentSource, SourceKind};
use std::sync::Arc;

/// Whether the user is editing source or looking at paginated output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Edit,
    Preview,
}

/// A finished archive, ready to be written or downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedArchive {
    /// `<prefix>-<unix millis>.zip`
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Owns the editable source and the asset registry.
///
/// Every mutating entry point takes `&mut self`, so two imports (or an
/// import and an export) cannot interleave on one studio.
pub struct Studio {
    config: StudioConfig,
    assembler: DocumentAssembler,
    source: DocumentSource,
    registry: AssetRegistry,
    mode: Mode,
    codec: Box<dyn ArchiveCodec>,
    engine: Option<Box<dyn PaginationEngine>>,
    status: Arc<dyn StatusSink>,
}

impl Studio {
    pub(crate) fn new(
        config: StudioConfig,
        codec: Box<dyn ArchiveCodec>,
        engine: Option<Box<dyn PaginationEngine>>,
        status: Arc<dyn StatusSink>,
    ) -> Self {
        Self {
            assembler: DocumentAssembler::new(config.assembler_config()),
            config,
            source: DocumentSource::default(),
            registry: AssetRegistry::new(),
            mode: Mode::Edit,
            codec,
            engine,
            status,
        }
    }

    pub fn builder() -> StudioBuilder {
        StudioBuilder::new()
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn source(&self) -> &DocumentSource {
        &self.source
    }

    pub fn set_source(&mut self, kind: SourceKind, text: impl Into<String>) {
        self.source.set(kind, text);
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    // --- assets ---

    pub fn upload_images(&mut self, files: Vec<(String, Vec<u8>)>) -> UploadReport {
        let _loading = LoadingGuard::start(&self.status, "Uploading images");
        let report = upload_images(&mut self.registry, files);
        self.status.notify(Notice::Success(format!("Loaded {} image(s)", report.accepted)));
        report
    }

    pub fn upload_fonts(&mut self, files: Vec<(String, Vec<u8>)>) -> UploadReport {
        let _loading = LoadingGuard::start(&self.status, "Uploading fonts");
        let report = upload_fonts(&mut self.registry, files);
        self.status.notify(Notice::Success(format!("Loaded {} font file(s)", report.accepted)));
        report
    }

    pub fn remove_image(&mut self, id: &AssetId) -> bool {
        self.registry.remove_image(id).is_some()
    }

    pub fn remove_font_variant(&mut self, family: &str, index: usize) -> Result<(), StudioError> {
        self.registry.remove_font_variant(family, index)?;
        Ok(())
    }

    pub fn remove_family(&mut self, family: &str) -> bool {
        self.registry.remove_family(family).is_some()
    }

    /// A conflicting name leaves the registry as it was; no notice is sent,
    /// the caller just reverts its edit.
    pub fn rename_family(&mut self, old: &str, new: &str) -> Result<(), StudioError> {
        self.registry.rename_family(old, new).map_err(|e| {
            debug!("Rename of '{}' rejected: {}", old, e);
            StudioError::from(e)
        })
    }

    pub fn set_variant_source(&mut self, family: &str, index: usize, source: Option<String>) -> Result<(), StudioError> {
        self.registry.set_variant_source(family, index, source)?;
        Ok(())
    }

    /// `<img>` markup in inline form for pasting into the structure buffer.
    pub fn image_markup(&self, id: &AssetId) -> Option<String> {
        SubstitutionEngine::new(&self.registry).image_markup(id)
    }

    // --- orchestration ---

    /// The self-contained document handed to the pagination engine.
    pub fn assemble(&self) -> String {
        self.assembler.assemble(&self.source, &self.registry)
    }

    /// Packs the current snapshot into an archive. Nothing is returned unless
    /// the whole archive was built.
    pub fn export(&self) -> Result<ExportedArchive, StudioError> {
        let _loading = LoadingGuard::start(&self.status, "Building archive");
        let result = PackageExporter::new(&*self.codec)
            .with_policy(self.config.compression_policy())
            .export(&self.source, &self.registry)
            .map(|bytes| ExportedArchive {
                file_name: archive_file_name(&self.config.archive_prefix),
                bytes,
            })
            .map_err(StudioError::from);
        self.finish(result, |archive| format!("Exported {}", archive.file_name))
    }

    /// Loads an archive, then re-renders when in preview mode.
    pub async fn import(&mut self, bytes: Vec<u8>) -> Result<ImportReport, StudioError> {
        let report = {
            let _loading = LoadingGuard::start(&self.status, "Reading archive");
            let result = PackageImporter::new(&*self.codec)
                .import(bytes, &mut self.source, &mut self.registry)
                .map_err(StudioError::from);
            self.finish(result, describe_import)?
        };
        self.after_import(&report).await;
        Ok(report)
    }

    /// Like [`Studio::import`] for an already opened archive, such as an
    /// unpacked project directory.
    pub async fn import_reader(&mut self, reader: &mut dyn ArchiveReader) -> ImportReport {
        let report = {
            let _loading = LoadingGuard::start(&self.status, "Reading archive");
            let report = import_from_reader(reader, &mut self.source, &mut self.registry);
            self.status.notify(Notice::Success(describe_import(&report)));
            report
        };
        self.after_import(&report).await;
        report
    }

    async fn after_import(&mut self, report: &ImportReport) {
        if report.fonts_loaded > 0 {
            tokio::time::sleep(self.config.font_settle_delay()).await;
        }
        if self.mode == Mode::Preview {
            // A failed render has already been reported on its own.
            let _ = self.render().await;
        }
    }

    /// Paginates the assembled document and returns the page count.
    pub async fn render(&mut self) -> Result<usize, StudioError> {
        let _loading = LoadingGuard::start(&self.status, "Rendering");
        let result = self.render_pages().await;
        self.finish(result, |pages| format!("Rendered {} page(s)", pages))
    }

    async fn render_pages(&mut self) -> Result<usize, StudioError> {
        let document = self.assembler.assemble(&self.source, &self.registry);
        let wait_for_fonts = !self.registry.families().is_empty();
        let timings = RenderTimings::from(&self.config);
        let engine = self
            .engine
            .as_deref_mut()
            .ok_or_else(|| PaginationError::Unavailable("no pagination engine attached".to_string()))?;
        Ok(paginate(engine, &document, wait_for_fonts, timings).await?)
    }

    /// Emits the operation's single outcome notice.
    fn finish<T>(&self, result: Result<T, StudioError>, describe: impl FnOnce(&T) -> String) -> Result<T, StudioError> {
        match &result {
            Ok(value) => {
                let message = describe(value);
                info!("{}", message);
                self.status.notify(Notice::Success(message));
            }
            Err(e) => {
                error!("{}", e);
                self.status.notify(Notice::Failure(e.to_string()));
            }
        }
        result
    }
}

fn describe_import(report: &ImportReport) -> String {
    format!(
        "Imported {} font(s) and {} image(s){}",
        report.fonts_loaded,
        report.images_loaded,
        if report.failures.is_empty() {
            String::new()
        } else {
            format!(", {} entries failed", report.failures.len())
        }
    )
}

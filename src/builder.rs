// src/builder.rs
use crate::config::StudioConfig;
use crate::error::StudioError;
use crate::status::{LogStatus, StatusSink};
use crate::studio::Studio;
use quire_resource::ZipArchiveCodec;
use quire_traits::{ArchiveCodec, PaginationEngine};
use std::path::Path;
use std::sync::Arc;

/// A builder for creating a `Studio`.
#[derive(Default)]
pub struct StudioBuilder {
    config: StudioConfig,
    codec: Option<Box<dyn ArchiveCodec>>,
    engine: Option<Box<dyn PaginationEngine>>,
    status: Option<Arc<dyn StatusSink>>,
}

impl StudioBuilder {
    /// Creates a builder with default settings, the zip codec and log-based status.
    pub fn new() -> Self { Default::default() }

    pub fn with_config(mut self, config: StudioConfig) -> Self { self.config = config; self }

    /// Loads settings from a JSON file.
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, StudioError> {
        self.config = StudioConfig::from_file(path)?;
        Ok(self)
    }

    /// Replaces the archive container implementation.
    pub fn with_codec(mut self, codec: impl ArchiveCodec + 'static) -> Self { self.codec = Some(Box::new(codec)); self }

    /// Attaches the pagination engine used by `render`. Without one, renders fail.
    pub fn with_engine(mut self, engine: impl PaginationEngine + 'static) -> Self { self.engine = Some(Box::new(engine)); self }

    pub fn with_status(mut self, status: Arc<dyn StatusSink>) -> Self { self.status = Some(status); self }

    /// Validates the configuration and creates the `Studio`.
    pub fn build(self) -> Result<Studio, StudioError> {
        self.config.validate()?;
        let codec = self.codec.unwrap_or_else(|| Box::new(ZipArchiveCodec::new()));
        let status = self.status.unwrap_or_else(|| Arc::new(LogStatus));
        log::debug!(
            "Building studio with {} codec and {} engine",
            codec.name(),
            self.engine.as_ref().map_or("no", |e| e.name())
        );
        Ok(Studio::new(self.config, codec, self.engine, status))
    }
}

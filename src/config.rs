use crate::error::StudioError;
use quire_core::{AssemblerConfig, DEFAULT_ARCHIVE_PREFIX};
use quire_core::assemble::DEFAULT_ENGINE_SCRIPT;
use quire_traits::CompressionPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Studio settings, loadable from a JSON file. Missing keys take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub page_size: String,
    pub page_margin: String,
    /// URL of the pagination engine script injected into the preview.
    pub engine_script: Option<String>,
    pub document_lang: String,
    pub compression_level: u8,
    pub archive_prefix: String,
    pub render_timeout_ms: u64,
    pub font_ready_timeout_ms: u64,
    pub poll_interval_ms: u64,
    pub settle_delay_ms: u64,
    /// Pause after an import that loaded fonts, before re-rendering.
    pub font_settle_delay_ms: u64,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            page_size: "A4".to_string(),
            page_margin: "2.5cm".to_string(),
            engine_script: Some(DEFAULT_ENGINE_SCRIPT.to_string()),
            document_lang: "vi".to_string(),
            compression_level: CompressionPolicy::MAX_LEVEL,
            archive_prefix: DEFAULT_ARCHIVE_PREFIX.to_string(),
            render_timeout_ms: 10_000,
            font_ready_timeout_ms: 3_000,
            poll_interval_ms: 100,
            settle_delay_ms: 500,
            font_settle_delay_ms: 800,
        }
    }
}

impl StudioConfig {
    pub fn from_json(json: &str) -> Result<Self, StudioError> {
        let config: StudioConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StudioError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            StudioError::Config(format!("Failed to read config from '{}': {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), StudioError> {
        if self.compression_level > CompressionPolicy::MAX_LEVEL {
            return Err(StudioError::Config(format!(
                "compression_level must be 0..={}, got {}",
                CompressionPolicy::MAX_LEVEL,
                self.compression_level
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(StudioError::Config("poll_interval_ms must be greater than zero".to_string()));
        }
        if self.archive_prefix.trim().is_empty() || self.archive_prefix.contains('/') {
            return Err(StudioError::Config(format!(
                "archive_prefix '{}' is not a usable file name prefix",
                self.archive_prefix
            )));
        }
        Ok(())
    }

    pub fn compression_policy(&self) -> CompressionPolicy {
        CompressionPolicy::with_level(self.compression_level).unwrap_or_default()
    }

    pub fn assembler_config(&self) -> AssemblerConfig {
        AssemblerConfig {
            page_size: self.page_size.clone(),
            page_margin: self.page_margin.clone(),
            document_lang: self.document_lang.clone(),
            engine_script: self.engine_script.clone(),
            ..AssemblerConfig::default()
        }
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }

    pub fn font_ready_timeout(&self) -> Duration {
        Duration::from_millis(self.font_ready_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn font_settle_delay(&self) -> Duration {
        Duration::from_millis(self.font_settle_delay_ms)
    }
}

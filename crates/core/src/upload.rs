//! Adding user-supplied files to the registry.

use crate::classify::{classify, font_format_for};
use crate::registry::AssetRegistry;
use log::{debug, info};
use quire_types::{FontVariant, ImageFormat};
use serde::Serialize;

/// Tally of one upload batch. Unsupported files are counted, never errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadReport {
    pub accepted: usize,
    pub skipped: usize,
}

pub fn upload_images<I>(registry: &mut AssetRegistry, files: I) -> UploadReport
where
    I: IntoIterator<Item = (String, Vec<u8>)>,
{
    let mut report = UploadReport::default();
    for (filename, bytes) in files {
        match ImageFormat::from_filename(&filename) {
            Some(format) => {
                registry.add_image(filename, format, bytes);
                report.accepted += 1;
            }
            None => {
                debug!("Skipping '{}': not a supported image type", filename);
                report.skipped += 1;
            }
        }
    }
    info!("Uploaded {} image(s), skipped {}", report.accepted, report.skipped);
    report
}

/// Classifies each font file by name and files it under the guessed family.
pub fn upload_fonts<I>(registry: &mut AssetRegistry, files: I) -> UploadReport
where
    I: IntoIterator<Item = (String, Vec<u8>)>,
{
    let mut report = UploadReport::default();
    for (filename, bytes) in files {
        let Some(format) = font_format_for(&filename) else {
            debug!("Skipping '{}': not a supported font type", filename);
            report.skipped += 1;
            continue;
        };
        let class = classify(&filename);
        let variant = FontVariant::new(filename, class.weight, class.style, format, bytes);
        registry.add_font_variant(&class.family_name, variant);
        report.accepted += 1;
    }
    info!("Uploaded {} font file(s), skipped {}", report.accepted, report.skipped);
    report
}

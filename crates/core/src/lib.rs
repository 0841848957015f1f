//! # quire-core
//!
//! Platform-agnostic asset substitution and packaging pipeline.
//!
//! - **registry**: the document's images and font families
//! - **classify**: font metadata recovered from filenames
//! - **substitute**: inline/path rewriting of image references
//! - **fontface**: `@font-face` generation from the registry
//! - **assemble**: the self-contained preview document
//! - **package**: archive export and import
//! - **upload**: adding user files to the registry
//!
//! ## Design Principle
//!
//! This crate has **no platform dependencies**:
//! - No filesystem access (`std::fs`)
//! - No async runtime (`tokio`)
//!
//! Archive containers and pagination are reached through the traits in
//! `quire-traits`.

pub use quire_traits as traits;
pub use quire_types as types;

pub mod assemble;
pub mod classify;
pub mod error;
pub mod fontface;
pub mod normalize;
pub mod package;
pub mod registry;
pub mod substitute;
pub mod upload;

pub use assemble::{AssemblerConfig, DocumentAssembler};
pub use classify::{FontClassification, classify, extension_to_format};
pub use error::{FailurePolicy, PackageError, RegistryError};
pub use fontface::{FontSourceForm, font_face_css};
pub use package::{
    DEFAULT_ARCHIVE_PREFIX, ImportReport, PackageExporter, PackageImporter, archive_file_name, import_from_reader,
    import_with_policy,
};
pub use registry::{AssetRegistry, FamilySummary, ImageSummary, VariantSummary};
pub use substitute::{SubstitutionEngine, escape_token, inline_reference};
pub use upload::{UploadReport, upload_fonts, upload_images};

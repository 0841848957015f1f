//! # quire
//!
//! Paged HTML document studio. A [`Studio`] owns one document (structure,
//! style and behavior source) plus its fonts and images, and exposes the
//! orchestration entry points: upload, export, import and render.
//!
//! ```no_run
//! # async fn run() -> Result<(), quire::StudioError> {
//! let mut studio = quire::Studio::builder().build()?;
//! studio.upload_images(vec![("logo.png".into(), std::fs::read("logo.png")?)]);
//! let archive = studio.export()?;
//! std::fs::write(&archive.file_name, &archive.bytes)?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod render;
pub mod status;
pub mod studio;

pub use builder::StudioBuilder;
pub use config::StudioConfig;
pub use error::StudioError;
pub use render::{RenderTimings, paginate};
pub use status::{LoadingGuard, LogStatus, Notice, StatusSink};
pub use studio::{ExportedArchive, Mode, Studio};

pub use quire_core::{AssetRegistry, ImportReport, UploadReport};
pub use quire_resource::{DirectoryArchive, ZipArchiveCodec};
pub use quire_traits::{ArchiveCodec, ArchiveReader, PaginationEngine, PaginationError};
pub use quire_types::{AssetId, DocumentSource, SourceKind};

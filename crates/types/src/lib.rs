pub mod asset;
pub mod document;
pub mod font;
pub mod ids;

pub use asset::{FontFamily, FontVariant, ImageAsset, ImageFormat, SharedPayload};
pub use document::{DocumentSource, SourceKind};
pub use font::{FontFormat, FontStyle, FontWeight};
pub use ids::AssetId;

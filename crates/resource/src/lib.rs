//! Archive codecs for the Quire packaging pipeline.
//!
//! This crate provides platform-specific implementations of the
//! `ArchiveCodec` and `ArchiveReader` traits from quire-traits.
//!
//! ## Available Codecs
//!
//! - [`ZipArchiveCodec`]: deflate-compressed zip containers, built in memory
//! - [`DirectoryArchive`]: an unpacked archive on the local filesystem
//!
//! ## Re-exports
//!
//! For convenience, we also re-export the in-memory archive from quire-traits:
//! - [`InMemoryArchive`]: pre-populated in-memory entries

mod filesystem;
mod zip_codec;

pub use filesystem::DirectoryArchive;
pub use zip_codec::ZipArchiveCodec;

pub use quire_traits::InMemoryArchive;

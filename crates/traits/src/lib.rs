pub mod archive;
pub mod paginate;

pub use archive::{
    ArchiveCodec, ArchiveEntries, ArchiveError, ArchiveReader, CompressionPolicy, InMemoryArchive,
};
pub use paginate::{PaginationEngine, PaginationError};

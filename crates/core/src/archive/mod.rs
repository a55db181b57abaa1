//! Archive module for bundling converted images into one download.
//!
//! The `ArchivePackager` trait takes an ordered list of named payloads and
//! returns a single container payload. `ZipPackager` is the production
//! implementation.

mod error;
mod traits;
mod types;
mod zip_packager;

pub use error::ArchiveError;
pub use traits::ArchivePackager;
pub use types::ArchiveEntry;
pub use zip_packager::ZipPackager;

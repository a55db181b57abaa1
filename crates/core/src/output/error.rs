//! Error types for the output module.

use std::path::PathBuf;
use thiserror::Error;

use crate::archive::ArchiveError;

/// Errors that can occur while preparing or saving a download.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The item has no converted output.
    #[error("File has not been converted: {name}")]
    NotConverted { name: String },

    /// A download name has no usable file name component.
    #[error("Invalid download file name: {name}")]
    InvalidFileName { name: String },

    /// Packaging the archive failed.
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Writing the download failed.
    #[error("Failed to write {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

//! Error types for the archive module.

use thiserror::Error;

/// Errors that can occur while building an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// No entries were provided.
    #[error("Archive has no entries")]
    Empty,

    /// Two entries share the same name.
    #[error("Duplicate archive entry: {name}")]
    DuplicateEntry { name: String },

    /// The archive writer failed.
    #[error("Failed to write archive: {reason}")]
    WriteFailed { reason: String },

    /// I/O error while writing an entry.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking packaging task panicked or was cancelled.
    #[error("Archive task failed: {0}")]
    Task(String),
}

impl ArchiveError {
    /// Creates a new write failed error.
    pub fn write_failed(reason: impl Into<String>) -> Self {
        Self::WriteFailed {
            reason: reason.into(),
        }
    }
}

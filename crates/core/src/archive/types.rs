//! Types for the archive module.

use bytes::Bytes;

/// A named payload to place in an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// File name inside the archive.
    pub name: String,
    /// Entry contents.
    pub bytes: Bytes,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

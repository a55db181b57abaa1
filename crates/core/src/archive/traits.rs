//! Trait definitions for the archive module.

use async_trait::async_trait;
use bytes::Bytes;

use super::error::ArchiveError;
use super::types::ArchiveEntry;

/// Bundles multiple named payloads into a single container.
#[async_trait]
pub trait ArchivePackager: Send + Sync {
    /// Returns the name of this packager implementation.
    fn name(&self) -> &str;

    /// Media type of the produced container.
    fn media_type(&self) -> &str;

    /// Packages the entries, preserving their order.
    ///
    /// Entry names must be unique.
    async fn package(&self, entries: Vec<ArchiveEntry>) -> Result<Bytes, ArchiveError>;
}

//! Mock archive packager for testing.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::archive::{ArchiveEntry, ArchiveError, ArchivePackager};

/// Mock implementation of the ArchivePackager trait.
///
/// Records every entry list it is given and returns the entry names joined
/// by newlines as the "archive".
#[derive(Debug, Clone, Default)]
pub struct MockPackager {
    packages: Arc<RwLock<Vec<Vec<ArchiveEntry>>>>,
    next_error: Arc<RwLock<Option<ArchiveError>>>,
}

impl MockPackager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get every entry list packaged so far.
    pub async fn recorded_packages(&self) -> Vec<Vec<ArchiveEntry>> {
        self.packages.read().await.clone()
    }

    /// Configure the next package call to fail with the given error.
    pub async fn set_next_error(&self, error: ArchiveError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl ArchivePackager for MockPackager {
    fn name(&self) -> &str {
        "mock"
    }

    fn media_type(&self) -> &str {
        "application/x-mock-archive"
    }

    async fn package(&self, entries: Vec<ArchiveEntry>) -> Result<Bytes, ArchiveError> {
        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }
        if entries.is_empty() {
            return Err(ArchiveError::Empty);
        }

        let listing = entries
            .iter()
            .map(|e| e.name.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        self.packages.write().await.push(entries);
        Ok(Bytes::from(listing))
    }
}

//! In-memory download sink for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::output::{Download, DownloadSink, OutputError};

/// Keeps every saved download in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    downloads: Arc<RwLock<Vec<Download>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all saved downloads in order.
    pub async fn downloads(&self) -> Vec<Download> {
        self.downloads.read().await.clone()
    }

    /// Find a saved download by file name.
    pub async fn find(&self, filename: &str) -> Option<Download> {
        self.downloads
            .read()
            .await
            .iter()
            .find(|d| d.filename == filename)
            .cloned()
    }
}

#[async_trait]
impl DownloadSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    async fn save(&self, download: &Download) -> Result<(), OutputError> {
        self.downloads.write().await.push(download.clone());
        Ok(())
    }
}

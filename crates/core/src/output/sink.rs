//! Download trigger: where prepared downloads are delivered.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tracing::info;

use super::error::OutputError;

/// A named payload ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub media_type: String,
    pub bytes: Bytes,
}

/// Delivers downloads to the user.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Returns the name of this sink implementation.
    fn name(&self) -> &str;

    /// Saves a download under its file name.
    async fn save(&self, download: &Download) -> Result<(), OutputError>;
}

/// Writes downloads into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target path for a download. Directory components in the name are
    /// ignored.
    pub fn path_for(&self, filename: &str) -> Result<PathBuf, OutputError> {
        let file_name = Path::new(filename)
            .file_name()
            .ok_or_else(|| OutputError::InvalidFileName {
                name: filename.to_string(),
            })?;
        Ok(self.dir.join(file_name))
    }
}

#[async_trait]
impl DownloadSink for DirectorySink {
    fn name(&self) -> &str {
        "directory"
    }

    async fn save(&self, download: &Download) -> Result<(), OutputError> {
        let path = self.path_for(&download.filename)?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| OutputError::WriteFailed {
                path: self.dir.clone(),
                source,
            })?;

        tokio::fs::write(&path, &download.bytes)
            .await
            .map_err(|source| OutputError::WriteFailed {
                path: path.clone(),
                source,
            })?;

        info!("Saved {} ({} bytes)", path.display(), download.bytes.len());
        Ok(())
    }
}

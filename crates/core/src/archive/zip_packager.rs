//! ZIP archive packager.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashSet;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::error::ArchiveError;
use super::traits::ArchivePackager;
use super::types::ArchiveEntry;

/// Packages entries into a ZIP container.
///
/// Entries are stored uncompressed unless `with_deflate` is used.
#[derive(Debug, Clone)]
pub struct ZipPackager {
    method: CompressionMethod,
}

impl Default for ZipPackager {
    fn default() -> Self {
        Self::new()
    }
}

impl ZipPackager {
    /// Creates a packager that stores entries as-is.
    pub fn new() -> Self {
        Self {
            method: CompressionMethod::Stored,
        }
    }

    /// Deflates entries instead of storing them.
    pub fn with_deflate(mut self) -> Self {
        self.method = CompressionMethod::Deflated;
        self
    }

    fn build(entries: &[ArchiveEntry], method: CompressionMethod) -> Result<Vec<u8>, ArchiveError> {
        let mut seen = HashSet::new();
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for entry in entries {
            if !seen.insert(entry.name.as_str()) {
                return Err(ArchiveError::DuplicateEntry {
                    name: entry.name.clone(),
                });
            }

            let options = SimpleFileOptions::default().compression_method(method);
            writer
                .start_file(entry.name.as_str(), options)
                .map_err(|e| ArchiveError::write_failed(e.to_string()))?;
            writer.write_all(&entry.bytes)?;
        }

        let cursor = writer
            .finish()
            .map_err(|e| ArchiveError::write_failed(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}

#[async_trait]
impl ArchivePackager for ZipPackager {
    fn name(&self) -> &str {
        "zip"
    }

    fn media_type(&self) -> &str {
        "application/zip"
    }

    async fn package(&self, entries: Vec<ArchiveEntry>) -> Result<Bytes, ArchiveError> {
        if entries.is_empty() {
            return Err(ArchiveError::Empty);
        }

        let method = self.method;
        let archive = tokio::task::spawn_blocking(move || Self::build(&entries, method))
            .await
            .map_err(|e| ArchiveError::Task(e.to_string()))??;

        Ok(Bytes::from(archive))
    }
}

//! Single-file and download-all delivery.

use std::sync::Arc;
use tracing::{debug, info};

use crate::archive::{ArchiveEntry, ArchivePackager};
use crate::config::OutputConfig;
use crate::intake::FileItem;

use super::error::OutputError;
use super::naming::{dedupe_names, output_file_name};
use super::sink::{Download, DownloadSink};

/// Default name of the download-all archive.
pub const DEFAULT_ARCHIVE_NAME: &str = "converted-webp-images.zip";

/// Offers converted files for download. Never mutates items.
pub struct OutputManager<P: ArchivePackager, S: DownloadSink> {
    packager: Arc<P>,
    sink: Arc<S>,
    archive_name: String,
}

impl<P: ArchivePackager, S: DownloadSink> OutputManager<P, S> {
    pub fn new(packager: P, sink: S) -> Self {
        Self::with_shared(Arc::new(packager), Arc::new(sink))
    }

    pub fn with_shared(packager: Arc<P>, sink: Arc<S>) -> Self {
        Self {
            packager,
            sink,
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
        }
    }

    /// Applies output configuration.
    pub fn with_config(mut self, config: &OutputConfig) -> Self {
        self.archive_name = config.archive_name.clone();
        self
    }

    pub fn with_archive_name(mut self, name: impl Into<String>) -> Self {
        self.archive_name = name.into();
        self
    }

    pub fn archive_name(&self) -> &str {
        &self.archive_name
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Builds the download for one converted item without saving it.
    pub fn prepare_file(&self, item: &FileItem) -> Result<Download, OutputError> {
        let output = item.result().ok_or_else(|| OutputError::NotConverted {
            name: item.source().name().to_string(),
        })?;

        Ok(Download {
            filename: output_file_name(item.source().name(), output.format),
            media_type: output.format.media_type().to_string(),
            bytes: output.bytes.clone(),
        })
    }

    /// Saves one converted item.
    pub async fn download_file(&self, item: &FileItem) -> Result<Download, OutputError> {
        let download = self.prepare_file(item)?;
        self.sink.save(&download).await?;
        Ok(download)
    }

    /// Builds the download for every done item without saving it.
    ///
    /// Returns `None` when nothing is done, the single file when exactly one
    /// is, and an archive otherwise.
    pub async fn prepare_all(&self, items: &[FileItem]) -> Result<Option<Download>, OutputError> {
        let done: Vec<&FileItem> = items.iter().filter(|item| item.is_done()).collect();

        match done.as_slice() {
            [] => Ok(None),
            [single] => self.prepare_file(single).map(Some),
            many => {
                let downloads = many
                    .iter()
                    .map(|item| self.prepare_file(item))
                    .collect::<Result<Vec<_>, _>>()?;

                let names = dedupe_names(downloads.iter().map(|d| d.filename.clone()));
                let entries = names
                    .into_iter()
                    .zip(downloads)
                    .map(|(name, download)| ArchiveEntry::new(name, download.bytes))
                    .collect::<Vec<_>>();

                debug!("Packaging {} files with {}", entries.len(), self.packager.name());
                let archive = self.packager.package(entries).await?;

                Ok(Some(Download {
                    filename: self.archive_name.clone(),
                    media_type: self.packager.media_type().to_string(),
                    bytes: archive,
                }))
            }
        }
    }

    /// Saves every done item: the file itself when there is one, an archive
    /// when there are several.
    pub async fn download_all(&self, items: &[FileItem]) -> Result<Option<Download>, OutputError> {
        let Some(download) = self.prepare_all(items).await? else {
            debug!("Nothing to download");
            return Ok(None);
        };

        self.sink.save(&download).await?;
        info!("Delivered {} via {}", download.filename, self.sink.name());
        Ok(Some(download))
    }
}

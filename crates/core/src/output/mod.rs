//! Output module: delivering converted files to the user.
//!
//! `OutputManager` prepares single-file downloads and download-all bundles,
//! then hands them to a `DownloadSink`. With exactly one converted file,
//! download-all delivers that file unchanged; with more, the files are
//! packaged into one archive through an `ArchivePackager`.

mod error;
mod format;
mod manager;
mod naming;
mod sink;

pub use error::OutputError;
pub use format::{format_savings, format_size};
pub use manager::{OutputManager, DEFAULT_ARCHIVE_NAME};
pub use naming::{dedupe_names, output_file_name};
pub use sink::{DirectorySink, Download, DownloadSink};

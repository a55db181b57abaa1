//! File intake: screening submitted files before they join a session.
//!
//! Only PNG files are accepted. Anything else is dropped without surfacing an
//! error to the user; the drop is counted in the `IntakeReport` and logged at
//! debug level. Size and count limits are applied only when the intake
//! configuration enforces them.

mod types;

pub use types::{
    ConversionFailure, ConversionOutput, FileId, FileItem, FileState, FileStatus, SourceFile,
    GENERIC_FAILURE_REASON, UNKNOWN_MEDIA_TYPE,
};

use serde::Serialize;
use tracing::debug;

use crate::codec::ImageFormat;
use crate::config::IntakeConfig;

/// Media type accepted at intake.
pub const ACCEPTED_FORMAT: ImageFormat = ImageFormat::Png;

/// Outcome of one intake call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntakeReport {
    /// Ids assigned to accepted files, in submission order.
    pub accepted: Vec<FileId>,
    /// Files dropped for not being PNG.
    pub rejected_media_type: usize,
    /// Files dropped for exceeding the per-file size limit.
    pub rejected_too_large: usize,
    /// Files dropped because the session was already at its file limit.
    pub rejected_over_count: usize,
}

impl IntakeReport {
    /// Total number of dropped files.
    pub fn rejected(&self) -> usize {
        self.rejected_media_type + self.rejected_too_large + self.rejected_over_count
    }
}

/// Screens candidates and turns the accepted ones into pending items.
///
/// `existing` is the number of items already in the session, used for the
/// file count limit.
pub(crate) fn screen(
    candidates: impl IntoIterator<Item = SourceFile>,
    existing: usize,
    config: &IntakeConfig,
) -> (Vec<FileItem>, IntakeReport) {
    let mut report = IntakeReport::default();
    let mut items = Vec::new();

    for source in candidates {
        if !source.is_format(ACCEPTED_FORMAT) {
            debug!(
                "Ignoring {} ({}): not a PNG",
                source.name(),
                source.media_type()
            );
            report.rejected_media_type += 1;
            continue;
        }

        if config.enforce_limits {
            if source.size() > config.max_file_bytes {
                debug!(
                    "Ignoring {}: {} bytes exceeds limit of {}",
                    source.name(),
                    source.size(),
                    config.max_file_bytes
                );
                report.rejected_too_large += 1;
                continue;
            }

            if existing + items.len() >= config.max_files {
                debug!(
                    "Ignoring {}: session already holds {} files",
                    source.name(),
                    config.max_files
                );
                report.rejected_over_count += 1;
                continue;
            }
        }

        let item = FileItem::new(source);
        report.accepted.push(item.id());
        items.push(item);
    }

    (items, report)
}

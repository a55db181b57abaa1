//! Aggregate statistics over a session's items.

use serde::Serialize;

use crate::intake::{FileItem, FileStatus};

/// Counts and byte totals across all items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub total: usize,
    pub pending: usize,
    pub converting: usize,
    pub done: usize,
    pub failed: usize,
    /// Source bytes of done items.
    pub original_bytes: u64,
    /// Encoded bytes of done items.
    pub converted_bytes: u64,
}

impl SessionStats {
    pub fn collect<'a>(items: impl IntoIterator<Item = &'a FileItem>) -> Self {
        let mut stats = Self::default();

        for item in items {
            stats.total += 1;
            match item.status() {
                FileStatus::Pending => stats.pending += 1,
                FileStatus::Converting => stats.converting += 1,
                FileStatus::Done => stats.done += 1,
                FileStatus::Error => stats.failed += 1,
            }

            if let Some(output) = item.result() {
                stats.original_bytes += output.original_size;
                stats.converted_bytes += output.converted_size;
            }
        }

        stats
    }

    /// Bytes saved across done items; negative when outputs grew.
    pub fn saved_bytes(&self) -> i64 {
        self.original_bytes as i64 - self.converted_bytes as i64
    }

    /// Whether every item is done.
    pub fn all_done(&self) -> bool {
        self.total > 0 && self.done == self.total
    }
}

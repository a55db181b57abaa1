//! Types for the batch module.

use serde::{Deserialize, Serialize};

use crate::codec::FailureKind;
use crate::intake::{FileId, FileStatus};

/// Progress update emitted during a pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BatchProgress {
    /// An item started converting.
    Started {
        item_id: FileId,
        file_name: String,
        index: usize,
        total: usize,
    },
    /// An item reached a terminal state (or was skipped as already done).
    Finished {
        item_id: FileId,
        file_name: String,
        status: FileStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        failure: Option<FailureKind>,
        completed: usize,
        total: usize,
        /// Aggregate progress rounded to a whole percentage.
        percent: u8,
    },
}

/// Outcome of a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Items in the session when the pass started.
    pub total: usize,
    /// Items converted during this pass.
    pub converted: usize,
    /// Items that failed during this pass.
    pub failed: usize,
    /// Items skipped because they were already done.
    pub skipped: usize,
    /// Items left pending because the pass was cancelled.
    pub remaining: usize,
    /// Whether the pass stopped early.
    pub cancelled: bool,
    /// Wall-clock duration of the pass in milliseconds.
    pub duration_ms: u64,
}

impl BatchSummary {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// Items that reached a terminal state, including skipped ones.
    pub fn completed(&self) -> usize {
        self.converted + self.failed + self.skipped
    }
}

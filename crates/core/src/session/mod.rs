//! Conversion session: the ordered file list and everything that mutates it.
//!
//! A `Session` is the single owner of user-submitted files, the conversion
//! settings, the in-progress flag, aggregate progress and the output handle
//! registry. Intake, removal and clearing are methods on the session; the
//! batch converter drives status transitions through crate-internal methods.
//!
//! While a conversion pass is running, every mutating operation is rejected
//! with `SessionError::ConversionInProgress`. The batch converter shares the
//! session as a `SharedSession` and never holds the lock across a codec call,
//! so snapshots stay available during a pass.

mod handles;
mod settings;
mod stats;

pub use handles::{HandleRegistry, OutputHandle};
pub use settings::{ConversionSettings, Quality, DEFAULT_QUALITY};
pub use stats::SessionStats;

use bytes::Bytes;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use crate::codec::ImageFormat;
use crate::config::{Config, IntakeConfig};
use crate::intake::{
    self, ConversionFailure, ConversionOutput, FileId, FileItem, FileState, IntakeReport,
    SourceFile,
};

/// A session shared between the converter and observers.
pub type SharedSession = Arc<RwLock<Session>>;

/// Errors returned by session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A conversion pass is running.
    #[error("A conversion is already in progress")]
    ConversionInProgress,

    /// Quality outside 1-100.
    #[error("Quality must be between 1 and 100, got {0}")]
    InvalidQuality(u8),

    /// No item with this id.
    #[error("File not found: {0}")]
    NotFound(FileId),
}

/// One item of a planned pass.
#[derive(Debug, Clone)]
pub(crate) struct PassItem {
    pub id: FileId,
    pub name: String,
    pub payload: Bytes,
    pub already_done: bool,
}

/// Snapshot taken when a pass starts.
#[derive(Debug, Clone)]
pub(crate) struct PassPlan {
    pub quality: Quality,
    pub items: Vec<PassItem>,
}

/// Ordered list of submitted files plus conversion state.
#[derive(Debug, Default)]
pub struct Session {
    items: Vec<FileItem>,
    settings: ConversionSettings,
    intake: IntakeConfig,
    handles: HandleRegistry,
    converting: bool,
    progress: f64,
}

impl Session {
    /// Creates an empty session.
    pub fn new(settings: ConversionSettings, intake: IntakeConfig) -> Self {
        Self {
            settings,
            intake,
            ..Default::default()
        }
    }

    /// Creates an empty session from application configuration.
    pub fn from_config(config: &Config) -> Result<Self, SessionError> {
        let settings = ConversionSettings::from_config(&config.conversion)?;
        Ok(Self::new(settings, config.intake.clone()))
    }

    /// Wraps the session for sharing with the batch converter.
    pub fn into_shared(self) -> SharedSession {
        Arc::new(RwLock::new(self))
    }

    /// Items in intake order.
    pub fn items(&self) -> &[FileItem] {
        &self.items
    }

    pub fn get(&self, id: FileId) -> Option<&FileItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether a conversion pass is running.
    pub fn is_converting(&self) -> bool {
        self.converting
    }

    pub fn settings(&self) -> ConversionSettings {
        self.settings
    }

    /// Changes the quality used by the next pass.
    pub fn set_quality(&mut self, quality: u8) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.settings.quality = Quality::new(quality)?;
        Ok(())
    }

    /// Aggregate progress of the current or last pass, 0.0-100.0.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Aggregate progress rounded for display.
    pub fn progress_percent(&self) -> u8 {
        self.progress.round() as u8
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats::collect(&self.items)
    }

    /// Items that finished converting, in intake order.
    pub fn done_items(&self) -> Vec<FileItem> {
        self.items
            .iter()
            .filter(|item| item.is_done())
            .cloned()
            .collect()
    }

    /// Dereferences an output handle.
    pub fn resolve(&self, handle: OutputHandle) -> Option<Bytes> {
        self.handles.resolve(handle)
    }

    /// Number of output handles still held.
    pub fn live_handles(&self) -> usize {
        self.handles.len()
    }

    /// Appends the PNG files among `candidates` as pending items.
    pub fn intake(
        &mut self,
        candidates: impl IntoIterator<Item = SourceFile>,
    ) -> Result<IntakeReport, SessionError> {
        self.ensure_idle()?;

        let (items, report) = intake::screen(candidates, self.items.len(), &self.intake);
        debug!(
            "Intake accepted {} file(s), dropped {}",
            report.accepted.len(),
            report.rejected()
        );
        self.items.extend(items);
        Ok(report)
    }

    /// Removes one item, releasing its output handle.
    pub fn remove(&mut self, id: FileId) -> Result<FileItem, SessionError> {
        self.ensure_idle()?;

        let index = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or(SessionError::NotFound(id))?;

        let item = self.items.remove(index);
        if let Some(output) = item.result() {
            self.handles.release(output.handle);
        }
        Ok(item)
    }

    /// Removes every item, releasing all output handles. Returns how many
    /// items were removed.
    pub fn clear(&mut self) -> Result<usize, SessionError> {
        self.ensure_idle()?;

        for item in &self.items {
            if let Some(output) = item.result() {
                self.handles.release(output.handle);
            }
        }

        let removed = self.items.len();
        self.items.clear();
        self.progress = 0.0;
        Ok(removed)
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        if self.converting {
            Err(SessionError::ConversionInProgress)
        } else {
            Ok(())
        }
    }

    fn item_mut(&mut self, id: FileId) -> Option<&mut FileItem> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// Starts a pass. Returns `None` when there is nothing to convert.
    pub(crate) fn begin_pass(&mut self) -> Result<Option<PassPlan>, SessionError> {
        self.ensure_idle()?;
        if self.items.is_empty() {
            return Ok(None);
        }

        self.converting = true;
        self.progress = 0.0;

        let items = self
            .items
            .iter()
            .map(|item| PassItem {
                id: item.id(),
                name: item.source().name().to_string(),
                payload: item.source().bytes().clone(),
                already_done: item.is_done(),
            })
            .collect();

        Ok(Some(PassPlan {
            quality: self.settings.quality,
            items,
        }))
    }

    pub(crate) fn mark_converting(&mut self, id: FileId) -> bool {
        match self.item_mut(id) {
            Some(item) => {
                item.state = FileState::Converting;
                true
            }
            None => false,
        }
    }

    /// Stores a successful result and registers its handle.
    pub(crate) fn complete(
        &mut self,
        id: FileId,
        payload: Bytes,
        format: ImageFormat,
        dimensions: (u32, u32),
    ) -> bool {
        let Some(existing) = self.get(id) else {
            return false;
        };
        let original_size = existing.source().size();
        let previous = existing.result().map(|output| output.handle);
        if let Some(previous) = previous {
            self.handles.release(previous);
        }

        let handle = self.handles.register(payload.clone());
        let output = ConversionOutput {
            converted_size: payload.len() as u64,
            bytes: payload,
            handle,
            format,
            original_size,
            width: dimensions.0,
            height: dimensions.1,
        };

        match self.item_mut(id) {
            Some(item) => {
                item.state = FileState::Done(output);
                true
            }
            None => false,
        }
    }

    pub(crate) fn fail(&mut self, id: FileId, failure: ConversionFailure) -> bool {
        match self.item_mut(id) {
            Some(item) => {
                item.state = FileState::Error(failure);
                true
            }
            None => false,
        }
    }

    /// Records that `completed` of `total` items reached a terminal state.
    pub(crate) fn record_progress(&mut self, completed: usize, total: usize) -> f64 {
        if total > 0 {
            let progress = completed as f64 / total as f64 * 100.0;
            self.progress = self.progress.max(progress);
        }
        self.progress
    }

    /// Ends a pass. Items left in `Converting` fall back to `Pending`.
    pub(crate) fn end_pass(&mut self) {
        for item in &mut self.items {
            if matches!(item.state, FileState::Converting) {
                item.state = FileState::Pending;
            }
        }
        self.converting = false;
    }
}

/// Rounds `completed / total` to a whole percentage.
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (completed as f64 / total as f64 * 100.0).round() as u8
}

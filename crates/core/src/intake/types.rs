//! Types for submitted files and their conversion state.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use uuid::Uuid;

use crate::codec::{FailureKind, ImageFormat};
use crate::session::OutputHandle;

/// Reason shown to users for any failed conversion.
pub const GENERIC_FAILURE_REASON: &str = "Conversion failed";

/// Fallback media type when nothing better is known.
pub const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Stable identifier of a submitted file, unique within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(Uuid);

impl FileId {
    /// Generates a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FileId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// A user-submitted file: name, media type and payload.
///
/// The payload is shared, so cloning a `SourceFile` is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    name: String,
    media_type: String,
    bytes: Bytes,
}

impl SourceFile {
    /// Creates a source file with an explicit media type.
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk.
    ///
    /// The media type follows the file extension; files without a known
    /// extension fall back to signature sniffing.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = Bytes::from(tokio::fs::read(path).await?);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let media_type = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ImageFormat::from_extension)
            .or_else(|| ImageFormat::sniff(&bytes))
            .map(|f| f.media_type())
            .unwrap_or(UNKNOWN_MEDIA_TYPE);

        Ok(Self::new(name, media_type, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Payload size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Whether the declared media type matches the given format.
    pub fn is_format(&self, format: ImageFormat) -> bool {
        ImageFormat::from_media_type(&self.media_type) == Some(format)
    }
}

/// Conversion status of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Pending,
    Converting,
    Done,
    Error,
}

impl FileStatus {
    /// Whether no further transition will happen in this pass.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Converting => "converting",
            Self::Done => "done",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

/// Encoded output of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOutput {
    /// Encoded payload.
    pub bytes: Bytes,
    /// Registry handle the payload is reachable through.
    pub handle: OutputHandle,
    /// Output format.
    pub format: ImageFormat,
    /// Size of the source payload in bytes.
    pub original_size: u64,
    /// Size of the encoded payload in bytes.
    pub converted_size: u64,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
}

impl ConversionOutput {
    /// Bytes saved by the conversion; negative when the output grew.
    pub fn saved_bytes(&self) -> i64 {
        self.original_size as i64 - self.converted_size as i64
    }

    /// Size reduction as a percentage of the original size.
    pub fn savings_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        self.saved_bytes() as f64 / self.original_size as f64 * 100.0
    }
}

/// Why a conversion failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionFailure {
    /// Short reason shown to users.
    pub reason: String,
    /// Diagnostic cause.
    pub kind: FailureKind,
}

impl ConversionFailure {
    /// Failure with the generic user-facing reason.
    pub fn generic(kind: FailureKind) -> Self {
        Self {
            reason: GENERIC_FAILURE_REASON.to_string(),
            kind,
        }
    }
}

/// State of a file, carrying its result or error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileState {
    Pending,
    Converting,
    Done(ConversionOutput),
    Error(ConversionFailure),
}

impl FileState {
    pub fn status(&self) -> FileStatus {
        match self {
            Self::Pending => FileStatus::Pending,
            Self::Converting => FileStatus::Converting,
            Self::Done(_) => FileStatus::Done,
            Self::Error(_) => FileStatus::Error,
        }
    }
}

/// One submitted image and its conversion state.
#[derive(Debug, Clone)]
pub struct FileItem {
    id: FileId,
    source: SourceFile,
    pub(crate) state: FileState,
    added_at: DateTime<Utc>,
}

impl FileItem {
    /// Creates a pending item with a fresh id.
    pub fn new(source: SourceFile) -> Self {
        Self {
            id: FileId::new(),
            source,
            state: FileState::Pending,
            added_at: Utc::now(),
        }
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn source(&self) -> &SourceFile {
        &self.source
    }

    pub fn state(&self) -> &FileState {
        &self.state
    }

    pub fn status(&self) -> FileStatus {
        self.state.status()
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    /// Conversion output, present only when done.
    pub fn result(&self) -> Option<&ConversionOutput> {
        match &self.state {
            FileState::Done(output) => Some(output),
            _ => None,
        }
    }

    /// Failure, present only when errored.
    pub fn error(&self) -> Option<&ConversionFailure> {
        match &self.state {
            FileState::Error(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, FileState::Done(_))
    }
}

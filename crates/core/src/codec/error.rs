//! Error types for the codec module.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while decoding or encoding an image.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The source payload could not be decoded.
    #[error("Failed to decode image: {reason}")]
    DecodeFailed { reason: String },

    /// The encoder rejected the surface or produced no output.
    #[error("Failed to encode image: {reason}")]
    EncodeFailed { reason: String },

    /// No usable rasterization surface could be prepared.
    #[error("Rendering surface unavailable: {reason}")]
    MissingRenderingContext { reason: String },

    /// Source payload is a recognized image, but not one this codec accepts.
    #[error("Unsupported input format: {format}")]
    UnsupportedFormat { format: String },

    /// The blocking codec task panicked or was cancelled.
    #[error("Codec task failed: {0}")]
    Task(String),
}

impl CodecError {
    /// Creates a new decode failed error.
    pub fn decode_failed(reason: impl Into<String>) -> Self {
        Self::DecodeFailed {
            reason: reason.into(),
        }
    }

    /// Creates a new encode failed error.
    pub fn encode_failed(reason: impl Into<String>) -> Self {
        Self::EncodeFailed {
            reason: reason.into(),
        }
    }

    /// Creates a new missing rendering context error.
    pub fn missing_context(reason: impl Into<String>) -> Self {
        Self::MissingRenderingContext {
            reason: reason.into(),
        }
    }

    /// Diagnostic category of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::DecodeFailed { .. } | Self::UnsupportedFormat { .. } => FailureKind::Decode,
            Self::EncodeFailed { .. } => FailureKind::Encode,
            Self::MissingRenderingContext { .. } => FailureKind::RenderingContext,
            Self::Task(_) => FailureKind::Internal,
        }
    }
}

/// Coarse cause of a failed conversion.
///
/// Users only ever see a generic reason; the kind is kept for logs and
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Decode,
    Encode,
    RenderingContext,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(CodecError::decode_failed("bad").kind(), FailureKind::Decode);
        assert_eq!(
            CodecError::UnsupportedFormat {
                format: "jpeg".to_string()
            }
            .kind(),
            FailureKind::Decode
        );
        assert_eq!(CodecError::encode_failed("bad").kind(), FailureKind::Encode);
        assert_eq!(
            CodecError::missing_context("zero size").kind(),
            FailureKind::RenderingContext
        );
        assert_eq!(
            CodecError::Task("panicked".to_string()).kind(),
            FailureKind::Internal
        );
    }

    #[test]
    fn test_error_display() {
        let err = CodecError::decode_failed("truncated stream");
        assert_eq!(err.to_string(), "Failed to decode image: truncated stream");
    }
}

//! Trait definitions for the codec module.

use async_trait::async_trait;
use bytes::Bytes;

use super::error::CodecError;
use super::types::{ImageFormat, RasterSurface};

/// A codec that can decode source images and re-encode them.
#[async_trait]
pub trait Codec: Send + Sync {
    /// Returns the name of this codec implementation.
    fn name(&self) -> &str;

    /// Decodes an encoded image into a surface at its natural pixel size.
    async fn decode(&self, input: Bytes) -> Result<RasterSurface, CodecError>;

    /// Encodes a surface into the output format.
    ///
    /// `quality` is a fidelity factor in `0.0..=1.0`; higher values favor
    /// visual fidelity over output size.
    async fn encode(&self, surface: RasterSurface, quality: f32) -> Result<Bytes, CodecError>;

    /// Returns the format produced by `encode`.
    fn output_format(&self) -> ImageFormat {
        ImageFormat::Webp
    }

    /// Returns the formats accepted by `decode`.
    fn supported_input_formats(&self) -> &[ImageFormat] {
        &[ImageFormat::Png]
    }
}

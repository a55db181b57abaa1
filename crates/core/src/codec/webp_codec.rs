//! WebP codec implementation backed by `image` (PNG decode) and libwebp.

use async_trait::async_trait;
use bytes::Bytes;

use super::error::CodecError;
use super::traits::Codec;
use super::types::{ImageFormat, RasterSurface};

/// Largest width or height libwebp will encode.
pub const WEBP_MAX_DIMENSION: u32 = 16_383;

/// Production codec: decodes PNG and encodes lossy WebP.
///
/// Pixel work runs on tokio's blocking pool so that awaiting a conversion
/// never stalls the runtime.
#[derive(Debug, Clone)]
pub struct WebpCodec {
    max_dimension: u32,
}

impl Default for WebpCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl WebpCodec {
    /// Creates a codec with libwebp's dimension limit.
    pub fn new() -> Self {
        Self {
            max_dimension: WEBP_MAX_DIMENSION,
        }
    }

    /// Lowers the largest accepted surface dimension.
    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension.min(WEBP_MAX_DIMENSION);
        self
    }

    fn decode_png(input: &[u8]) -> Result<RasterSurface, CodecError> {
        let format = image::guess_format(input)
            .map_err(|e| CodecError::decode_failed(format!("unrecognized payload: {}", e)))?;

        if format != image::ImageFormat::Png {
            return Err(CodecError::UnsupportedFormat {
                format: format!("{:?}", format).to_lowercase(),
            });
        }

        let decoded = image::load_from_memory_with_format(input, image::ImageFormat::Png)
            .map_err(|e| CodecError::decode_failed(e.to_string()))?;

        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        RasterSurface::new(width, height, rgba.into_raw())
    }

    fn encode_webp(
        surface: &RasterSurface,
        quality: f32,
        max_dimension: u32,
    ) -> Result<Bytes, CodecError> {
        let (width, height) = surface.dimensions();
        if width > max_dimension || height > max_dimension {
            return Err(CodecError::missing_context(format!(
                "{}x{} exceeds the {}px surface limit",
                width, height, max_dimension
            )));
        }

        if !(0.0..=1.0).contains(&quality) {
            return Err(CodecError::encode_failed(format!(
                "quality factor {} outside 0.0..=1.0",
                quality
            )));
        }

        let encoder = ::webp::Encoder::from_rgba(surface.pixels(), width, height);
        let memory = encoder
            .encode_simple(false, quality * 100.0)
            .map_err(|e| CodecError::encode_failed(format!("{:?}", e)))?;

        if memory.is_empty() {
            return Err(CodecError::encode_failed("encoder produced no output"));
        }

        Ok(Bytes::copy_from_slice(&memory))
    }
}

#[async_trait]
impl Codec for WebpCodec {
    fn name(&self) -> &str {
        "webp"
    }

    async fn decode(&self, input: Bytes) -> Result<RasterSurface, CodecError> {
        tokio::task::spawn_blocking(move || Self::decode_png(&input))
            .await
            .map_err(|e| CodecError::Task(e.to_string()))?
    }

    async fn encode(&self, surface: RasterSurface, quality: f32) -> Result<Bytes, CodecError> {
        let max_dimension = self.max_dimension;
        tokio::task::spawn_blocking(move || Self::encode_webp(&surface, quality, max_dimension))
            .await
            .map_err(|e| CodecError::Task(e.to_string()))?
    }

    fn output_format(&self) -> ImageFormat {
        ImageFormat::Webp
    }
}

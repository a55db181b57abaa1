//! Mock codec for testing.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::codec::{Codec, CodecError, RasterSurface};

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// A recorded encode call for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEncode {
    pub width: u32,
    pub height: u32,
    pub quality: f32,
}

/// Mock implementation of the Codec trait.
///
/// Decoding reads only the PNG header, so any payload with a valid IHDR
/// chunk "decodes" to a transparent surface of the declared size. Encoding
/// returns a small RIFF/WEBP blob that encodes the dimensions and quality,
/// which keeps outputs deterministic and distinguishable.
#[derive(Debug, Clone)]
pub struct MockCodec {
    /// Number of decode calls, including failed ones.
    decodes: Arc<RwLock<usize>>,
    /// Recorded encode calls.
    encodes: Arc<RwLock<Vec<RecordedEncode>>>,
    /// If set, the next decode or encode fails with this error.
    next_error: Arc<RwLock<Option<CodecError>>>,
    /// Simulated work per decode.
    delay: Arc<RwLock<Duration>>,
}

impl Default for MockCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCodec {
    pub fn new() -> Self {
        Self {
            decodes: Arc::new(RwLock::new(0)),
            encodes: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(Duration::ZERO)),
        }
    }

    /// Get the number of decode calls made so far.
    pub async fn decode_count(&self) -> usize {
        *self.decodes.read().await
    }

    /// Get all recorded encode calls.
    pub async fn recorded_encodes(&self) -> Vec<RecordedEncode> {
        self.encodes.read().await.clone()
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: CodecError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set the simulated decode duration.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }

    async fn take_error(&self) -> Option<CodecError> {
        self.next_error.write().await.take()
    }

    fn read_header(input: &[u8]) -> Result<(u32, u32), CodecError> {
        if input.len() < 24 || !input.starts_with(PNG_SIGNATURE) || &input[12..16] != b"IHDR" {
            return Err(CodecError::decode_failed("missing PNG header"));
        }
        let width = u32::from_be_bytes([input[16], input[17], input[18], input[19]]);
        let height = u32::from_be_bytes([input[20], input[21], input[22], input[23]]);
        Ok((width, height))
    }
}

#[async_trait]
impl Codec for MockCodec {
    fn name(&self) -> &str {
        "mock"
    }

    async fn decode(&self, input: Bytes) -> Result<RasterSurface, CodecError> {
        *self.decodes.write().await += 1;

        let delay = *self.delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.take_error().await {
            return Err(error);
        }

        let (width, height) = Self::read_header(&input)?;
        RasterSurface::transparent(width, height)
    }

    async fn encode(&self, surface: RasterSurface, quality: f32) -> Result<Bytes, CodecError> {
        if let Some(error) = self.take_error().await {
            return Err(error);
        }

        let (width, height) = surface.dimensions();
        self.encodes.write().await.push(RecordedEncode {
            width,
            height,
            quality,
        });

        let mut out = b"RIFF\0\0\0\0WEBP".to_vec();
        out.extend_from_slice(format!("{}x{}q{}", width, height, quality).as_bytes());
        Ok(Bytes::from(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ImageFormat;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_mock_decodes_header_dimensions() {
        let codec = MockCodec::new();
        let surface = codec.decode(fixtures::png_bytes(5, 9)).await.unwrap();
        assert_eq!(surface.dimensions(), (5, 9));
        assert_eq!(codec.decode_count().await, 1);
    }

    #[tokio::test]
    async fn test_mock_rejects_corrupt_payload() {
        let codec = MockCodec::new();
        let result = codec.decode(fixtures::corrupt_png_bytes()).await;
        assert!(matches!(result, Err(CodecError::DecodeFailed { .. })));
        assert_eq!(codec.decode_count().await, 1);
    }

    #[tokio::test]
    async fn test_mock_encode_is_webp() {
        let codec = MockCodec::new();
        let surface = RasterSurface::transparent(2, 3).unwrap();
        let out = codec.encode(surface, 0.5).await.unwrap();

        assert_eq!(ImageFormat::sniff(&out), Some(ImageFormat::Webp));
        assert_eq!(
            codec.recorded_encodes().await,
            vec![RecordedEncode {
                width: 2,
                height: 3,
                quality: 0.5
            }]
        );
    }

    #[tokio::test]
    async fn test_mock_next_error_is_consumed() {
        let codec = MockCodec::new();
        codec.set_next_error(CodecError::encode_failed("boom")).await;

        assert!(codec.decode(fixtures::png_bytes(1, 1)).await.is_err());
        assert!(codec.decode(fixtures::png_bytes(1, 1)).await.is_ok());
    }
}

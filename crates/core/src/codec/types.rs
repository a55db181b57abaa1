//! Types for the codec module.

use serde::{Deserialize, Serialize};

use super::error::CodecError;

/// Image formats known to the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    /// Portable Network Graphics (the accepted input)
    Png,
    /// WebP (the produced output)
    Webp,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }

    /// Returns the media type for this format.
    pub fn media_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    /// Looks up a format by media type (exact, case-insensitive).
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        match media_type.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Looks up a format by file extension, without the leading dot.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Detects a format from the leading bytes of a payload.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

        if bytes.starts_with(PNG_SIGNATURE) {
            Some(Self::Png)
        } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(Self::Webp)
        } else {
            None
        }
    }
}

/// Decoded RGBA8 pixels at the image's natural size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterSurface {
    /// Bytes per pixel (RGBA8).
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Wraps an RGBA8 buffer, checking that it matches the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, CodecError> {
        if width == 0 || height == 0 {
            return Err(CodecError::missing_context(format!(
                "surface has zero area ({}x{})",
                width, height
            )));
        }

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(Self::BYTES_PER_PIXEL))
            .ok_or_else(|| {
                CodecError::missing_context(format!("surface too large ({}x{})", width, height))
            })?;

        if pixels.len() != expected {
            return Err(CodecError::missing_context(format!(
                "pixel buffer is {} bytes, expected {}",
                pixels.len(),
                expected
            )));
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Creates a fully transparent surface.
    pub fn transparent(width: u32, height: u32) -> Result<Self, CodecError> {
        let len = (width as usize) * (height as usize) * Self::BYTES_PER_PIXEL;
        Self::new(width, height, vec![0; len])
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGBA8 pixel data, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_extension() {
        assert_eq!(ImageFormat::Png.extension(), "png");
        assert_eq!(ImageFormat::Webp.extension(), "webp");
    }

    #[test]
    fn test_format_from_media_type() {
        assert_eq!(ImageFormat::from_media_type("image/png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_media_type("IMAGE/PNG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_media_type("image/jpeg"), None);
        assert_eq!(ImageFormat::from_media_type(""), None);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ImageFormat::from_extension("PNG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("webp"), Some(ImageFormat::Webp));
        assert_eq!(ImageFormat::from_extension("jpg"), None);
    }

    #[test]
    fn test_sniff() {
        assert_eq!(
            ImageFormat::sniff(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR"),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::sniff(b"RIFF\x24\0\0\0WEBPVP8 "),
            Some(ImageFormat::Webp)
        );
        assert_eq!(ImageFormat::sniff(b"GIF89a"), None);
        assert_eq!(ImageFormat::sniff(b""), None);
    }

    #[test]
    fn test_surface_validates_buffer() {
        assert!(RasterSurface::new(2, 2, vec![0; 16]).is_ok());
        assert!(RasterSurface::new(2, 2, vec![0; 15]).is_err());
        assert!(matches!(
            RasterSurface::new(0, 4, Vec::new()),
            Err(CodecError::MissingRenderingContext { .. })
        ));
    }

    #[test]
    fn test_transparent_surface() {
        let surface = RasterSurface::transparent(3, 2).unwrap();
        assert_eq!(surface.dimensions(), (3, 2));
        assert_eq!(surface.pixels().len(), 24);
        assert!(surface.pixels().iter().all(|&b| b == 0));
    }
}

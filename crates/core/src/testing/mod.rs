//! Testing utilities and mock implementations.
//!
//! Mocks stand in for the codec, the archive packager and the download sink
//! so that batch and output flows can be exercised without libwebp or a
//! filesystem.
//!
//! # Example
//!
//! ```rust,ignore
//! use webpify_core::testing::{fixtures, MockCodec};
//! use webpify_core::{BatchConverter, Session};
//!
//! let mut session = Session::default();
//! session.intake(vec![fixtures::png_file("a.png")])?;
//! let session = session.into_shared();
//!
//! let codec = MockCodec::new();
//! codec.set_next_error(CodecError::encode_failed("boom")).await;
//!
//! let summary = BatchConverter::new(codec).convert_all(&session).await?;
//! assert_eq!(summary.failed, 1);
//! ```

mod memory_sink;
mod mock_codec;
mod mock_packager;

pub use memory_sink::MemorySink;
pub use mock_codec::{MockCodec, RecordedEncode};
pub use mock_packager::MockPackager;

/// Test fixtures and helper functions.
pub mod fixtures {
    use bytes::Bytes;
    use image::{ImageFormat as RasterFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    use crate::intake::SourceFile;

    /// Encode a real PNG of the given size with a simple gradient.
    pub fn png_bytes(width: u32, height: u32) -> Bytes {
        let image = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 16 % 256) as u8, (y * 16 % 256) as u8, 128, 255])
        });
        let mut out = Cursor::new(Vec::new());
        image
            .write_to(&mut out, RasterFormat::Png)
            .expect("in-memory PNG encode");
        Bytes::from(out.into_inner())
    }

    /// A payload that starts like a PNG but has no decodable content.
    pub fn corrupt_png_bytes() -> Bytes {
        let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
        bytes.extend_from_slice(b"truncated");
        Bytes::from(bytes)
    }

    /// An 8x8 PNG source file.
    pub fn png_file(name: &str) -> SourceFile {
        SourceFile::new(name, "image/png", png_bytes(8, 8))
    }

    /// A source file declared as PNG whose payload cannot be decoded.
    pub fn corrupt_png_file(name: &str) -> SourceFile {
        SourceFile::new(name, "image/png", corrupt_png_bytes())
    }

    /// A plain text source file, rejected at intake.
    pub fn text_file(name: &str) -> SourceFile {
        SourceFile::new(name, "text/plain", Bytes::from_static(b"hello"))
    }
}

//! Codec module for decoding source images and encoding WebP output.
//!
//! This module provides the `Codec` trait, the boundary behind which all pixel
//! work happens, and `WebpCodec`, the production implementation.
//!
//! Conversion is a two-step pipeline: the source payload is decoded into a
//! `RasterSurface` at its natural pixel size, then the surface is encoded at a
//! quality factor between 0.0 and 1.0. Both steps are awaited, so callers never
//! block the runtime while pixels are being processed.
//!
//! # Example
//!
//! ```ignore
//! use webpify_core::codec::{Codec, WebpCodec};
//!
//! let codec = WebpCodec::new();
//! let surface = codec.decode(png_bytes).await?;
//! let webp = codec.encode(surface, 0.85).await?;
//! println!("Encoded {} bytes", webp.len());
//! ```

mod error;
mod traits;
mod types;
mod webp_codec;

pub use error::{CodecError, FailureKind};
pub use traits::Codec;
pub use types::{ImageFormat, RasterSurface};
pub use webp_codec::{WebpCodec, WEBP_MAX_DIMENSION};

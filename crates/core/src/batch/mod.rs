//! Batch conversion of a session's files.
//!
//! A pass walks the session's items strictly in intake order, one at a time:
//!
//! 1. the item moves to `converting`;
//! 2. its payload is decoded to a surface at natural size;
//! 3. the surface is encoded at `quality / 100`;
//! 4. the item ends `done` (payload, handle, both sizes) or `error` with a
//!    generic reason.
//!
//! Aggregate progress is `completed / total * 100` and counts failures and
//! skipped items, so it reaches 100 exactly when every item is terminal.
//! Only one pass may run per session at a time.
//!
//! # Example
//!
//! ```ignore
//! use webpify_core::{BatchConverter, Session, WebpCodec};
//!
//! let session = Session::default().into_shared();
//! session.write().await.intake(files)?;
//!
//! let converter = BatchConverter::new(WebpCodec::new());
//! let summary = converter.convert_all(&session).await?;
//! println!("{} converted, {} failed", summary.converted, summary.failed);
//! ```

mod cancel;
mod converter;
mod error;
mod types;

pub use cancel::CancelToken;
pub use converter::BatchConverter;
pub use error::BatchError;
pub use types::{BatchProgress, BatchSummary};

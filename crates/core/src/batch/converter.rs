//! Sequential batch converter.

use bytes::Bytes;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::codec::{Codec, CodecError};
use crate::intake::{ConversionFailure, FileStatus};
use crate::session::{progress_percent, PassItem, Quality, SharedSession};

use super::cancel::CancelToken;
use super::error::BatchError;
use super::types::{BatchProgress, BatchSummary};

/// Converts every item of a session, one at a time, in intake order.
///
/// Items already done are skipped, so running a pass again after partial
/// failures only retries what is left. A failing item is marked as errored
/// and the pass moves on.
pub struct BatchConverter<C: Codec> {
    codec: Arc<C>,
    cancel: CancelToken,
}

impl<C: Codec> BatchConverter<C> {
    /// Creates a converter around a codec.
    pub fn new(codec: C) -> Self {
        Self::with_shared_codec(Arc::new(codec))
    }

    /// Creates a converter around an already shared codec.
    pub fn with_shared_codec(codec: Arc<C>) -> Self {
        Self {
            codec,
            cancel: CancelToken::new(),
        }
    }

    /// Uses an externally owned cancellation token.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops the pass before its next item when cancelled.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Runs a pass over the session.
    ///
    /// A cancel requested before the pass starts stops it before the first
    /// item. The token is reset when the pass ends, so the next call runs
    /// normally.
    ///
    /// If the returned future is dropped mid-pass, the session is released:
    /// the in-progress flag is cleared and the interrupted item goes back to
    /// `Pending`.
    pub async fn convert_all(&self, session: &SharedSession) -> Result<BatchSummary, BatchError> {
        self.run(session, None).await
    }

    /// Runs a pass, sending progress updates.
    ///
    /// If the receiver is dropped, the pass continues without reporting.
    pub async fn convert_all_with_progress(
        &self,
        session: &SharedSession,
        progress_tx: mpsc::Sender<BatchProgress>,
    ) -> Result<BatchSummary, BatchError> {
        self.run(session, Some(&progress_tx)).await
    }

    async fn run(
        &self,
        session: &SharedSession,
        progress_tx: Option<&mpsc::Sender<BatchProgress>>,
    ) -> Result<BatchSummary, BatchError> {
        let Some(plan) = session.write().await.begin_pass()? else {
            debug!("No files to convert");
            return Ok(BatchSummary::default());
        };
        let pass = PassGuard::new(session);

        let started = Instant::now();
        let total = plan.items.len();
        let mut summary = BatchSummary::new(total);
        let mut completed = 0;

        info!(
            "Converting {} file(s) with {} at quality {}",
            total,
            self.codec.name(),
            plan.quality.value()
        );

        for (index, item) in plan.items.into_iter().enumerate() {
            if item.already_done {
                completed += 1;
                summary.skipped += 1;
                session.write().await.record_progress(completed, total);
                debug!("Skipping {}: already converted", item.name);
                send(
                    progress_tx,
                    BatchProgress::Finished {
                        item_id: item.id,
                        file_name: item.name,
                        status: FileStatus::Done,
                        failure: None,
                        completed,
                        total,
                        percent: progress_percent(completed, total),
                    },
                )
                .await;
                continue;
            }

            if self.cancel.is_cancelled() {
                info!("Conversion cancelled with {} file(s) left", total - completed);
                summary.cancelled = true;
                break;
            }

            session.write().await.mark_converting(item.id);
            send(
                progress_tx,
                BatchProgress::Started {
                    item_id: item.id,
                    file_name: item.name.clone(),
                    index,
                    total,
                },
            )
            .await;

            let outcome = self.convert_one(&item, plan.quality).await;
            completed += 1;

            let (status, failure) = {
                let mut guard = session.write().await;
                let result = match outcome {
                    Ok((payload, dimensions)) => {
                        debug!(
                            "Converted {} ({}x{}, {} bytes)",
                            item.name,
                            dimensions.0,
                            dimensions.1,
                            payload.len()
                        );
                        guard.complete(item.id, payload, self.codec.output_format(), dimensions);
                        summary.converted += 1;
                        (FileStatus::Done, None)
                    }
                    Err(e) => {
                        warn!("Failed to convert {}: {}", item.name, e);
                        let kind = e.kind();
                        guard.fail(item.id, ConversionFailure::generic(kind));
                        summary.failed += 1;
                        (FileStatus::Error, Some(kind))
                    }
                };
                guard.record_progress(completed, total);
                result
            };

            send(
                progress_tx,
                BatchProgress::Finished {
                    item_id: item.id,
                    file_name: item.name,
                    status,
                    failure,
                    completed,
                    total,
                    percent: progress_percent(completed, total),
                },
            )
            .await;
        }

        pass.finish().await;
        self.cancel.reset();

        summary.remaining = total - completed;
        summary.duration_ms = started.elapsed().as_millis() as u64;

        info!(
            "Conversion finished: {} converted, {} failed, {} skipped, {} remaining in {} ms",
            summary.converted, summary.failed, summary.skipped, summary.remaining, summary.duration_ms
        );

        Ok(summary)
    }

    /// Decodes then encodes one item.
    async fn convert_one(
        &self,
        item: &PassItem,
        quality: Quality,
    ) -> Result<(Bytes, (u32, u32)), CodecError> {
        let surface = self.codec.decode(item.payload.clone()).await?;
        let dimensions = surface.dimensions();

        let encoded = self.codec.encode(surface, quality.factor()).await?;
        if encoded.is_empty() {
            return Err(CodecError::encode_failed("encoder produced no output"));
        }

        Ok((encoded, dimensions))
    }
}

/// Ends the pass when dropped, so an abandoned pass never leaves the
/// session locked.
struct PassGuard {
    session: Option<SharedSession>,
}

impl PassGuard {
    fn new(session: &SharedSession) -> Self {
        Self {
            session: Some(Arc::clone(session)),
        }
    }

    async fn finish(mut self) {
        if let Some(session) = self.session.take() {
            session.write().await.end_pass();
        }
    }
}

impl Drop for PassGuard {
    fn drop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        warn!("Conversion pass dropped before completion");
        let released = match session.try_write() {
            Ok(mut guard) => {
                guard.end_pass();
                true
            }
            Err(_) => false,
        };
        if !released {
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    handle.spawn(async move {
                        session.write().await.end_pass();
                    });
                }
                Err(_) => error!("Session left in a running pass: no runtime to release it"),
            }
        }
    }
}

async fn send(progress_tx: Option<&mpsc::Sender<BatchProgress>>, progress: BatchProgress) {
    if let Some(tx) = progress_tx {
        let _ = tx.send(progress).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FailureKind;
    use crate::intake::SourceFile;
    use crate::session::{Session, SessionError};
    use crate::testing::{fixtures, MockCodec};

    fn shared(names: &[&str]) -> SharedSession {
        let mut session = Session::default();
        session
            .intake(names.iter().map(|name| fixtures::png_file(name)))
            .unwrap();
        session.into_shared()
    }

    #[tokio::test]
    async fn test_all_items_reach_terminal_state() {
        let session = shared(&["a.png", "b.png", "c.png"]);
        let converter = BatchConverter::new(MockCodec::new());

        let summary = converter.convert_all(&session).await.unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.converted, 3);
        assert_eq!(summary.remaining, 0);

        let guard = session.read().await;
        assert!(guard.items().iter().all(|i| i.status().is_terminal()));
        assert_eq!(guard.progress_percent(), 100);
        assert!(!guard.is_converting());
        assert_eq!(guard.live_handles(), 3);
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let session = shared(&["a.png"]);
        session
            .write()
            .await
            .intake(vec![fixtures::corrupt_png_file("broken.png")])
            .unwrap();
        session
            .write()
            .await
            .intake(vec![fixtures::png_file("c.png")])
            .unwrap();

        let codec = MockCodec::new();
        let converter = BatchConverter::new(codec);
        let summary = converter.convert_all(&session).await.unwrap();

        assert_eq!(summary.converted, 2);
        assert_eq!(summary.failed, 1);

        let guard = session.read().await;
        let statuses: Vec<FileStatus> = guard.items().iter().map(|i| i.status()).collect();
        assert_eq!(
            statuses,
            vec![FileStatus::Done, FileStatus::Error, FileStatus::Done]
        );
        let failure = guard.items()[1].error().unwrap();
        assert_eq!(failure.reason, "Conversion failed");
        assert_eq!(failure.kind, FailureKind::Decode);
        assert_eq!(guard.progress_percent(), 100);
    }

    #[tokio::test]
    async fn test_progress_sequence() {
        let session = shared(&["a.png", "b.png", "c.png"]);
        let converter = BatchConverter::new(MockCodec::new());
        let (tx, mut rx) = mpsc::channel(32);

        converter
            .convert_all_with_progress(&session, tx)
            .await
            .unwrap();

        let mut percents = Vec::new();
        let mut started = 0;
        while let Some(event) = rx.recv().await {
            match event {
                BatchProgress::Started { .. } => started += 1,
                BatchProgress::Finished { percent, .. } => percents.push(percent),
            }
        }

        assert_eq!(started, 3);
        assert_eq!(percents, vec![33, 67, 100]);
    }

    #[tokio::test]
    async fn test_rerun_skips_done_items() {
        let session = shared(&["a.png", "b.png"]);
        session
            .write()
            .await
            .intake(vec![fixtures::corrupt_png_file("c.png")])
            .unwrap();

        let codec = Arc::new(MockCodec::new());
        let converter = BatchConverter::with_shared_codec(Arc::clone(&codec));
        converter.convert_all(&session).await.unwrap();

        let before: Vec<_> = session
            .read()
            .await
            .items()
            .iter()
            .filter_map(|i| i.result().cloned())
            .collect();
        assert_eq!(before.len(), 2);
        assert_eq!(codec.decode_count().await, 3);

        let summary = converter.convert_all(&session).await.unwrap();
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(codec.decode_count().await, 4);

        let guard = session.read().await;
        let after: Vec<_> = guard
            .items()
            .iter()
            .filter_map(|i| i.result().cloned())
            .collect();
        assert_eq!(before, after);
        assert_eq!(guard.live_handles(), 2);
    }

    #[tokio::test]
    async fn test_error_items_are_retried() {
        let session = shared(&["a.png"]);
        let codec = Arc::new(MockCodec::new());
        codec
            .set_next_error(CodecError::encode_failed("rejected"))
            .await;
        let converter = BatchConverter::with_shared_codec(Arc::clone(&codec));

        let first = converter.convert_all(&session).await.unwrap();
        assert_eq!(first.failed, 1);

        let second = converter.convert_all(&session).await.unwrap();
        assert_eq!(second.converted, 1);
        assert!(session.read().await.items()[0].is_done());
    }

    #[tokio::test]
    async fn test_empty_session() {
        let session = Session::default().into_shared();
        let converter = BatchConverter::new(MockCodec::new());
        let summary = converter.convert_all(&session).await.unwrap();
        assert_eq!(summary, BatchSummary::default());
    }

    #[tokio::test]
    async fn test_reentrant_pass_rejected() {
        let session = shared(&["a.png"]);
        session.write().await.begin_pass().unwrap();

        let converter = BatchConverter::new(MockCodec::new());
        let result = converter.convert_all(&session).await;
        assert!(matches!(result, Err(BatchError::AlreadyRunning)));
    }

    #[tokio::test]
    async fn test_cancelled_before_start_leaves_items_pending() {
        let session = shared(&["a.png", "b.png"]);
        let converter = BatchConverter::new(MockCodec::new());
        converter.cancel_token().cancel();

        let summary = converter.convert_all(&session).await.unwrap();
        assert!(summary.cancelled);
        assert_eq!(summary.remaining, 2);

        let guard = session.read().await;
        assert!(guard
            .items()
            .iter()
            .all(|i| i.status() == FileStatus::Pending));
        assert!(!guard.is_converting());
    }

    #[tokio::test]
    async fn test_quality_passed_to_codec() {
        let session = shared(&["a.png"]);
        session.write().await.set_quality(40).unwrap();

        let codec = Arc::new(MockCodec::new());
        let converter = BatchConverter::with_shared_codec(Arc::clone(&codec));
        converter.convert_all(&session).await.unwrap();

        let encodes = codec.recorded_encodes().await;
        assert_eq!(encodes.len(), 1);
        assert!((encodes[0].quality - 0.40).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_sizes_recorded() {
        let session = shared(&["a.png"]);
        let converter = BatchConverter::new(MockCodec::new());
        converter.convert_all(&session).await.unwrap();

        let guard = session.read().await;
        let item = &guard.items()[0];
        let output = item.result().unwrap();
        assert_eq!(output.original_size, item.source().size());
        assert_eq!(output.converted_size, output.bytes.len() as u64);
        assert_eq!(guard.resolve(output.handle), Some(output.bytes.clone()));
    }

    #[tokio::test]
    async fn test_session_rejects_mutation_while_running() {
        let session = shared(&["a.png", "b.png"]);
        let codec = Arc::new(MockCodec::new());
        codec
            .set_delay(std::time::Duration::from_millis(50))
            .await;
        let converter = Arc::new(BatchConverter::with_shared_codec(Arc::clone(&codec)));

        let task = {
            let converter = Arc::clone(&converter);
            let session = Arc::clone(&session);
            tokio::spawn(async move { converter.convert_all(&session).await })
        };

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        {
            let mut guard = session.write().await;
            assert!(guard.is_converting());
            assert_eq!(
                guard.set_quality(10).unwrap_err(),
                SessionError::ConversionInProgress
            );
            assert_eq!(
                guard
                    .intake(vec![SourceFile::new(
                        "x.png",
                        "image/png",
                        bytes::Bytes::new()
                    )])
                    .unwrap_err(),
                SessionError::ConversionInProgress
            );
        }
        assert!(matches!(
            converter.convert_all(&session).await,
            Err(BatchError::AlreadyRunning)
        ));

        let summary = task.await.unwrap().unwrap();
        assert_eq!(summary.converted, 2);
        assert!(!session.read().await.is_converting());
    }

    #[tokio::test]
    async fn test_dropped_pass_releases_session() {
        let session = shared(&["a.png", "b.png"]);
        let codec = Arc::new(MockCodec::new());
        codec
            .set_delay(std::time::Duration::from_millis(200))
            .await;
        let converter = BatchConverter::with_shared_codec(Arc::clone(&codec));

        let result = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            converter.convert_all(&session),
        )
        .await;
        assert!(result.is_err());

        {
            let guard = session.read().await;
            assert!(!guard.is_converting());
            assert!(guard
                .items()
                .iter()
                .all(|i| i.status() == FileStatus::Pending));
        }

        codec.set_delay(std::time::Duration::ZERO).await;
        let summary = converter.convert_all(&session).await.unwrap();
        assert_eq!(summary.converted, 2);

        assert_eq!(session.write().await.clear().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_cancel_applies_to_one_pass() {
        let session = shared(&["a.png", "b.png"]);
        let cancel = CancelToken::new();
        let converter = BatchConverter::new(MockCodec::new()).with_cancel_token(cancel.clone());

        cancel.cancel();
        let first = converter.convert_all(&session).await.unwrap();
        assert!(first.cancelled);
        assert_eq!(first.converted, 0);
        assert!(!cancel.is_cancelled());

        let second = converter.convert_all(&session).await.unwrap();
        assert!(!second.cancelled);
        assert_eq!(second.converted, 2);
    }
}

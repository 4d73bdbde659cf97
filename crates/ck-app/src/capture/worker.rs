use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, Instrument};

use ck_core::ports::CaptureEventSinkPort;
use ck_core::{ClipboardChangeSignal, CollectionId};

use super::{BurstCoalescer, ClipboardSnapshotReader};
use crate::usecases::CaptureClipUseCase;

/// Consumer side of the listener -> worker hand-off.
///
/// 监听线程只负责投递信号，所有读取、过滤、去重和持久化都在这里完成。
pub struct CaptureWorker {
    signals: mpsc::Receiver<ClipboardChangeSignal>,
    coalescer: BurstCoalescer,
    reader: ClipboardSnapshotReader,
    capture: Arc<CaptureClipUseCase>,
    sink: Arc<dyn CaptureEventSinkPort>,
    active_collection: watch::Receiver<Option<CollectionId>>,
    activity: Option<Arc<watch::Sender<u64>>>,
}

impl CaptureWorker {
    pub fn new(
        signals: mpsc::Receiver<ClipboardChangeSignal>,
        coalescer: BurstCoalescer,
        reader: ClipboardSnapshotReader,
        capture: Arc<CaptureClipUseCase>,
        sink: Arc<dyn CaptureEventSinkPort>,
        active_collection: watch::Receiver<Option<CollectionId>>,
    ) -> Self {
        Self {
            signals,
            coalescer,
            reader,
            capture,
            sink,
            active_collection,
            activity: None,
        }
    }

    /// Bump `activity` after every processed clipboard change, whatever the
    /// outcome. The idle retention sweep watches it.
    pub fn with_activity(mut self, activity: Arc<watch::Sender<u64>>) -> Self {
        self.activity = Some(activity);
        self
    }

    /// Run until cancelled or until every sender is dropped.
    ///
    /// Cancellation abandons the event being processed; anything not yet
    /// inserted is discarded.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!("Capture worker started");
        loop {
            let burst = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                burst = self.coalescer.next_burst(&mut self.signals) => burst,
            };

            let Some(burst) = burst else {
                info!("Clipboard signal channel closed");
                break;
            };
            if burst.collapsed > 0 {
                debug!(
                    sequence = burst.last.sequence,
                    collapsed = burst.collapsed,
                    "Collapsed clipboard change burst"
                );
            }

            let active = self.active_collection.borrow().clone();
            let span = info_span!("worker.capture", sequence = burst.last.sequence);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(sequence = burst.last.sequence, "Discarding in-flight capture on shutdown");
                    break;
                }
                _ = self.process(burst.last, active).instrument(span) => {}
            }
            if let Some(activity) = &self.activity {
                activity.send_modify(|seen| *seen = seen.wrapping_add(1));
            }
        }
        info!("Capture worker stopped");
    }

    async fn process(&self, signal: ClipboardChangeSignal, active: Option<CollectionId>) {
        let raw = match self.reader.read(signal).await {
            Ok(raw) => raw,
            Err(err) => {
                self.sink.on_error(signal.sequence, &err).await;
                return;
            }
        };

        match self.capture.execute(raw, active.as_ref()).await {
            Ok(outcome) => self.sink.on_outcome(signal.sequence, &outcome).await,
            Err(err) => self.sink.on_error(signal.sequence, &err).await,
        }
    }
}

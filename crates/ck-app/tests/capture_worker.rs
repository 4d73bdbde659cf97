mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use ck_app::{BurstCoalescer, CaptureWorker, ClipboardSnapshotReader};
use ck_core::{CaptureOutcome, ClipboardChangeSignal, Collection, CollectionId};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

const WAIT: Duration = Duration::from_secs(5);

struct WorkerHarness {
    capture: CaptureHarness,
    clipboard: Arc<FakeClipboard>,
    signals: mpsc::Sender<ClipboardChangeSignal>,
    events: mpsc::UnboundedReceiver<SinkEvent>,
    active: watch::Sender<Option<CollectionId>>,
    activity: watch::Receiver<u64>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl WorkerHarness {
    fn start(collections: Vec<Collection>, active: &str) -> Self {
        let capture = CaptureHarness::with_collections(collections);
        let clipboard = FakeClipboard::new();
        let (signals, rx) = mpsc::channel(16);
        let (sink, events) = ChannelSink::new();
        let (active_tx, active_rx) = watch::channel(Some(CollectionId::from(active)));
        let (activity_tx, activity) = watch::channel(0u64);

        let worker = CaptureWorker::new(
            rx,
            BurstCoalescer::new(Duration::from_millis(20)),
            ClipboardSnapshotReader::new(clipboard.clone(), 3, Duration::from_millis(1)),
            capture.capture.clone(),
            sink,
            active_rx,
        )
        .with_activity(Arc::new(activity_tx));
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(worker.run(cancel.clone()));

        Self {
            capture,
            clipboard,
            signals,
            events,
            active: active_tx,
            activity,
            cancel,
            handle,
        }
    }

    async fn signal(&self, sequence: u64) {
        self.signals
            .send(ClipboardChangeSignal {
                sequence,
                observed_at_ms: sequence as i64,
            })
            .await
            .unwrap();
    }

    async fn next_event(&mut self) -> SinkEvent {
        timeout(WAIT, self.events.recv())
            .await
            .expect("worker produced no event")
            .expect("sink closed")
    }

    /// Wait for the worker to report activity and return the counter.
    async fn next_activity(&mut self) -> u64 {
        timeout(WAIT, self.activity.changed())
            .await
            .expect("worker reported no activity")
            .unwrap();
        *self.activity.borrow_and_update()
    }

    async fn shutdown(self) {
        self.cancel.cancel();
        timeout(WAIT, self.handle)
            .await
            .expect("worker did not stop")
            .unwrap();
    }
}

fn inbox_and_work() -> Vec<Collection> {
    vec![
        Collection::new("inbox", "Inbox", 0),
        Collection::new("work", "Work", 1),
    ]
}

#[tokio::test]
async fn burst_of_signals_is_read_once() {
    let mut w = WorkerHarness::start(inbox_and_work(), "inbox");
    w.clipboard.copy_text("editor.exe", "final");

    for seq in 1..=4 {
        w.signal(seq).await;
    }

    match w.next_event().await {
        SinkEvent::Outcome(seq, CaptureOutcome::Captured { collection_id, .. }) => {
            assert_eq!(seq, 4);
            assert_eq!(collection_id, CollectionId::from("inbox"));
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(w.capture.store.inner.clip_count().await, 1);
    assert!(w.events.try_recv().is_err());
    w.shutdown().await;
}

#[tokio::test]
async fn every_processed_change_is_reported_as_activity() {
    let mut w = WorkerHarness::start(inbox_and_work(), "inbox");
    w.clipboard.copy_text("editor.exe", "first");

    for seq in 1..=3 {
        w.signal(seq).await;
    }
    assert!(matches!(
        w.next_event().await,
        SinkEvent::Outcome(3, CaptureOutcome::Captured { .. })
    ));
    assert_eq!(w.next_activity().await, 1);

    w.clipboard.set_always_busy(true);
    w.signal(4).await;
    assert!(matches!(w.next_event().await, SinkEvent::Error(4, _)));
    assert_eq!(w.next_activity().await, 2);
    w.shutdown().await;
}

#[tokio::test]
async fn transient_busy_reads_are_retried() {
    let mut w = WorkerHarness::start(inbox_and_work(), "inbox");
    w.clipboard.copy_text("editor.exe", "eventually");
    w.clipboard.set_busy_reads(2);

    w.signal(1).await;

    assert!(matches!(
        w.next_event().await,
        SinkEvent::Outcome(1, CaptureOutcome::Captured { .. })
    ));
    w.shutdown().await;
}

#[tokio::test]
async fn persistently_busy_clipboard_reports_an_error_and_keeps_running() {
    let mut w = WorkerHarness::start(inbox_and_work(), "inbox");
    w.clipboard.copy_text("editor.exe", "locked");
    w.clipboard.set_always_busy(true);

    w.signal(1).await;
    match w.next_event().await {
        SinkEvent::Error(seq, message) => {
            assert_eq!(seq, 1);
            assert!(message.contains("3"), "message should mention attempts: {message}");
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(w.capture.store.inner.clip_count().await, 0);

    w.clipboard.set_always_busy(false);
    w.signal(2).await;
    assert!(matches!(
        w.next_event().await,
        SinkEvent::Outcome(2, CaptureOutcome::Captured { .. })
    ));
    w.shutdown().await;
}

#[tokio::test]
async fn active_collection_changes_apply_to_the_next_capture() {
    let mut w = WorkerHarness::start(inbox_and_work(), "inbox");

    w.clipboard.copy_text("editor.exe", "first");
    w.signal(1).await;
    assert!(matches!(w.next_event().await, SinkEvent::Outcome(1, _)));

    w.active.send_replace(Some(CollectionId::from("work")));
    w.clipboard.copy_text("editor.exe", "second");
    w.signal(2).await;

    match w.next_event().await {
        SinkEvent::Outcome(2, CaptureOutcome::Captured { collection_id, .. }) => {
            assert_eq!(collection_id, CollectionId::from("work"))
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(w.capture.clips_in("inbox").await.len(), 1);
    assert_eq!(w.capture.clips_in("work").await.len(), 1);
    w.shutdown().await;
}

#[tokio::test]
async fn worker_stops_when_the_signal_channel_closes() {
    let w = WorkerHarness::start(inbox_and_work(), "inbox");
    let WorkerHarness {
        signals, handle, ..
    } = w;
    drop(signals);

    timeout(WAIT, handle)
        .await
        .expect("worker did not stop")
        .unwrap();
}

#[tokio::test]
async fn cancellation_stops_an_idle_worker() {
    let w = WorkerHarness::start(inbox_and_work(), "inbox");
    w.shutdown().await;
}

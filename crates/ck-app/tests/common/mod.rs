#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use tokio::sync::{mpsc, Notify};
use tokio_util::sync::CancellationToken;

use ck_app::{CaptureClipUseCase, CollectionLocks};
use ck_core::ports::{
    CaptureEventSinkPort, ClipQuery, ClipStorePort, ClipboardSourcePort, ClipboardWriterPort,
    ClockPort,
};
use ck_core::{
    CaptureError, CaptureOutcome, Clip, ClipFormat, ClipId, ClipboardReadError, Collection,
    CollectionId, Fingerprint, FormatKind, RawCaptureEvent, SourceApplication, SourceFilter,
};
use ck_infra::{InMemoryClipStore, InMemoryEchoRegistry};

pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

static TRACE_INIT: Once = Once::new();

/// `RUST_LOG=debug cargo test` shows the pipeline's spans and events.
pub fn init_tracing() {
    TRACE_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    pub fn at(now_ms: i64) -> Arc<Self> {
        Arc::new(Self {
            now_ms: AtomicI64::new(now_ms),
        })
    }

    pub fn advance(&self, ms: i64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl ClockPort for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

pub fn raw_text(sequence: u64, process: &str, text: &str) -> RawCaptureEvent {
    RawCaptureEvent {
        sequence,
        observed_at_ms: sequence as i64,
        source: SourceApplication::new(process),
        formats: vec![ClipFormat::text(text)],
    }
}

pub fn stored_clip(id: &str, collection: &str, captured_at_ms: i64) -> Clip {
    let formats = vec![ClipFormat::text(id)];
    Clip {
        id: ClipId::from_string(id.to_string()),
        captured_at_ms,
        source_app: "test".into(),
        fingerprint: Fingerprint::of_formats(&formats),
        formats,
        collection_id: collection.into(),
        folder_id: None,
        deleted_at_ms: None,
        sort_key: captured_at_ms as f64,
        last_accessed_ms: None,
        access_count: 0,
    }
}

/// In-memory store with failure and pause hooks for the scenarios the plain
/// store cannot produce.
pub struct HookedStore {
    pub inner: InMemoryClipStore,
    pub fail_inserts: AtomicBool,
    cancel_on_reassign: Mutex<Option<CancellationToken>>,
    trash_gate: Mutex<Option<(Arc<Notify>, Arc<Notify>)>>,
}

impl HookedStore {
    pub fn new(collections: Vec<Collection>) -> Arc<Self> {
        init_tracing();
        Arc::new(Self {
            inner: InMemoryClipStore::with_collections(collections),
            fail_inserts: AtomicBool::new(false),
            cancel_on_reassign: Mutex::new(None),
            trash_gate: Mutex::new(None),
        })
    }

    /// Cancel `token` right after the next successful reassignment.
    pub fn cancel_after_reassign(&self, token: CancellationToken) {
        *self.cancel_on_reassign.lock().unwrap() = Some(token);
    }

    /// Make `query_trash` signal `entered` and then wait for `release`.
    pub fn gate_trash_query(&self, entered: Arc<Notify>, release: Arc<Notify>) {
        *self.trash_gate.lock().unwrap() = Some((entered, release));
    }
}

#[async_trait]
impl ClipStorePort for HookedStore {
    async fn insert_clip(&self, clip: &Clip) -> Result<()> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            bail!("disk full");
        }
        self.inner.insert_clip(clip).await
    }

    async fn reassign_collection(&self, clip_id: &ClipId, to: &CollectionId) -> Result<()> {
        self.inner.reassign_collection(clip_id, to).await?;
        if let Some(token) = self.cancel_on_reassign.lock().unwrap().take() {
            token.cancel();
        }
        Ok(())
    }

    async fn soft_delete(&self, clip_id: &ClipId, deleted_at_ms: i64) -> Result<()> {
        self.inner.soft_delete(clip_id, deleted_at_ms).await
    }

    async fn permanently_erase(&self, clip_id: &ClipId) -> Result<bool> {
        self.inner.permanently_erase(clip_id).await
    }

    async fn query_by_scope(&self, collection_id: &CollectionId, query: ClipQuery) -> Result<Vec<Clip>> {
        self.inner.query_by_scope(collection_id, query).await
    }

    async fn list_collections(&self) -> Result<Vec<Collection>> {
        self.inner.list_collections().await
    }

    async fn save_collection(&self, collection: &Collection) -> Result<()> {
        self.inner.save_collection(collection).await
    }

    async fn replace_collections(&self, collections: &[Collection]) -> Result<()> {
        self.inner.replace_collections(collections).await
    }

    async fn most_recent_fingerprint(&self, scope: &CollectionId) -> Result<Option<Fingerprint>> {
        self.inner.most_recent_fingerprint(scope).await
    }

    async fn get_clip(&self, clip_id: &ClipId) -> Result<Option<Clip>> {
        self.inner.get_clip(clip_id).await
    }

    async fn touch_clip(&self, clip_id: &ClipId, accessed_at_ms: i64) -> Result<()> {
        self.inner.touch_clip(clip_id, accessed_at_ms).await
    }

    async fn query_trash(&self, deleted_before_ms: i64) -> Result<Vec<ClipId>> {
        let gate = self.trash_gate.lock().unwrap().take();
        if let Some((entered, release)) = gate {
            entered.notify_one();
            release.notified().await;
        }
        self.inner.query_trash(deleted_before_ms).await
    }
}

/// Stand-in for the OS clipboard: the source reads what the writer wrote.
pub struct FakeClipboard {
    content: Mutex<(SourceApplication, Vec<ClipFormat>)>,
    busy_reads: AtomicU32,
    always_busy: AtomicBool,
    pub writes: AtomicU32,
}

impl FakeClipboard {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            content: Mutex::new((SourceApplication::unknown(), Vec::new())),
            busy_reads: AtomicU32::new(0),
            always_busy: AtomicBool::new(false),
            writes: AtomicU32::new(0),
        })
    }

    /// Simulate another application copying text.
    pub fn copy_text(&self, process: &str, text: &str) {
        *self.content.lock().unwrap() = (SourceApplication::new(process), vec![ClipFormat::text(text)]);
    }

    pub fn set_busy_reads(&self, n: u32) {
        self.busy_reads.store(n, Ordering::SeqCst);
    }

    pub fn set_always_busy(&self, busy: bool) {
        self.always_busy.store(busy, Ordering::SeqCst);
    }
}

impl ClipboardSourcePort for FakeClipboard {
    fn current_owner(&self) -> SourceApplication {
        self.content.lock().unwrap().0.clone()
    }

    fn enumerate_formats(&self) -> Result<Vec<FormatKind>, ClipboardReadError> {
        if self.always_busy.load(Ordering::SeqCst) {
            return Err(ClipboardReadError::Busy);
        }
        let remaining = self.busy_reads.load(Ordering::SeqCst);
        if remaining > 0 {
            self.busy_reads.store(remaining - 1, Ordering::SeqCst);
            return Err(ClipboardReadError::Busy);
        }
        Ok(self
            .content
            .lock()
            .unwrap()
            .1
            .iter()
            .map(|f| f.kind.clone())
            .collect())
    }

    fn read_format(&self, kind: &FormatKind) -> Result<Vec<u8>, ClipboardReadError> {
        self.content
            .lock()
            .unwrap()
            .1
            .iter()
            .find(|f| &f.kind == kind)
            .map(|f| f.bytes.clone())
            .ok_or_else(|| ClipboardReadError::FormatUnavailable(kind.clone()))
    }
}

impl ClipboardWriterPort for FakeClipboard {
    fn write(&self, formats: &[ClipFormat]) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        *self.content.lock().unwrap() = (SourceApplication::new("clipkeep"), formats.to_vec());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Outcome(u64, CaptureOutcome),
    Error(u64, String),
}

pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SinkEvent>,
}

impl ChannelSink {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<SinkEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

#[async_trait]
impl CaptureEventSinkPort for ChannelSink {
    async fn on_outcome(&self, sequence: u64, outcome: &CaptureOutcome) {
        let _ = self.tx.send(SinkEvent::Outcome(sequence, outcome.clone()));
    }

    async fn on_error(&self, sequence: u64, error: &CaptureError) {
        let _ = self.tx.send(SinkEvent::Error(sequence, error.to_string()));
    }
}

pub struct CaptureHarness {
    pub store: Arc<HookedStore>,
    pub echo: Arc<InMemoryEchoRegistry>,
    pub clock: Arc<ManualClock>,
    pub locks: Arc<CollectionLocks>,
    pub capture: Arc<CaptureClipUseCase>,
}

impl CaptureHarness {
    pub fn new(collections: Vec<Collection>, filter: SourceFilter) -> Self {
        init_tracing();
        let store = HookedStore::new(collections);
        let echo = Arc::new(InMemoryEchoRegistry::new());
        let clock = ManualClock::at(1_000_000);
        let locks = Arc::new(CollectionLocks::new());
        let capture = Arc::new(CaptureClipUseCase::new(
            store.clone(),
            echo.clone(),
            clock.clone(),
            locks.clone(),
            Arc::new(filter),
            1024,
        ));
        Self {
            store,
            echo,
            clock,
            locks,
            capture,
        }
    }

    pub fn with_collections(collections: Vec<Collection>) -> Self {
        Self::new(collections, SourceFilter::default())
    }

    pub async fn clips_in(&self, collection: &str) -> Vec<Clip> {
        self.store
            .query_by_scope(&collection.into(), ClipQuery::active())
            .await
            .unwrap()
    }
}

pub const ECHO_VALIDITY: Duration = Duration::from_secs(2);

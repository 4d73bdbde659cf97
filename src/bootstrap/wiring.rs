//! # Dependency Injection / 依赖注入模块
//!
//! The only place that depends on ck-infra, ck-platform and ck-app at once.
//! It assembles use cases from ports and owns nothing but the wiring: no
//! business decisions are made here.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use ck_app::{
    BurstCoalescer, CaptureClipUseCase, CaptureWorker, ClipboardSnapshotReader, CollectionLocks,
    EnforceRetentionUseCase, PurgeTrashUseCase, RestoreClipUseCase, RetentionSweeper,
};
use ck_core::collection::validate_collections;
use ck_core::config::CaptureConfig;
use ck_core::ports::{
    CaptureEventSinkPort, ClipStorePort, ClipboardSourcePort, ClipboardWriterPort, ClockPort,
};
use ck_core::{ClipboardChangeSignal, Collection, CollectionId, ConfigWarning, SourceFilter};
use ck_infra::db::pool::init_db_pool;
use ck_infra::db::repositories::SqliteClipStore;
use ck_infra::InMemoryEchoRegistry;

use super::config::AppConfig;

/// Result type for wiring operations
pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
/// 依赖注入错误（基础设施初始化失败）
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Database initialization failed: {0}")]
    DatabaseInit(String),

    #[error("Clipboard initialization failed: {0}")]
    ClipboardInit(String),

    #[error("Collection seeding failed: {0}")]
    CollectionSeed(String),
}

/// Open (creating if needed) the SQLite clip store at `database_path`.
pub fn open_store(database_path: &Path) -> WiringResult<Arc<dyn ClipStorePort>> {
    if let Some(parent) = database_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            WiringError::DatabaseInit(format!(
                "failed to create {}: {}",
                parent.display(),
                e
            ))
        })?;
    }
    let url = database_path.to_string_lossy();
    let pool = init_db_pool(&url).map_err(|e| WiringError::DatabaseInit(format!("{e:#}")))?;
    Ok(Arc::new(SqliteClipStore::from_pool(pool)))
}

/// Adapters the engine is assembled from.
pub struct EnginePorts {
    pub store: Arc<dyn ClipStorePort>,
    pub source: Arc<dyn ClipboardSourcePort>,
    pub writer: Arc<dyn ClipboardWriterPort>,
    pub clock: Arc<dyn ClockPort>,
    pub sink: Arc<dyn CaptureEventSinkPort>,
}

/// Fully wired use cases and runtimes.
pub struct Engine {
    pub capture: Arc<CaptureClipUseCase>,
    pub restore: Arc<RestoreClipUseCase>,
    pub enforce: Arc<EnforceRetentionUseCase>,
    pub purge: Arc<PurgeTrashUseCase>,
    pub sweeper: Arc<RetentionSweeper>,
    store: Arc<dyn ClipStorePort>,
    source: Arc<dyn ClipboardSourcePort>,
    sink: Arc<dyn CaptureEventSinkPort>,
    capture_config: CaptureConfig,
    idle_after: Duration,
    active: watch::Sender<Option<CollectionId>>,
    activity: Arc<watch::Sender<u64>>,
}

impl Engine {
    pub fn wire(config: &AppConfig, ports: EnginePorts) -> Self {
        let EnginePorts {
            store,
            source,
            writer,
            clock,
            sink,
        } = ports;
        let capture_config = config.engine.capture.clone();
        let retention_config = &config.engine.retention;

        let locks = Arc::new(CollectionLocks::new());
        let echo = Arc::new(InMemoryEchoRegistry::new());
        let filter = Arc::new(SourceFilter::new(&config.filters));
        if !filter.warnings().is_empty() {
            warn!(skipped = filter.warnings().len(), "Some application filters were skipped");
        }

        let capture = Arc::new(CaptureClipUseCase::new(
            store.clone(),
            echo.clone(),
            clock.clone(),
            locks.clone(),
            filter,
            capture_config.max_format_bytes,
        ));
        let restore = Arc::new(RestoreClipUseCase::new(
            store.clone(),
            writer,
            echo,
            clock.clone(),
            capture_config.echo_validity(),
        ));
        let enforce = Arc::new(EnforceRetentionUseCase::new(
            store.clone(),
            clock.clone(),
            locks,
        ));
        let purge = Arc::new(PurgeTrashUseCase::new(
            store.clone(),
            clock,
            retention_config.trash_retention_days,
        ));
        let sweeper = Arc::new(RetentionSweeper::new(
            enforce.clone(),
            purge.clone(),
            retention_config.sweep_interval(),
        ));

        let (active, _) = watch::channel(config.active_collection());
        let (activity, _) = watch::channel(0u64);

        Self {
            capture,
            restore,
            enforce,
            purge,
            sweeper,
            store,
            source,
            sink,
            capture_config,
            idle_after: retention_config.idle_after(),
            active,
            activity: Arc::new(activity),
        }
    }

    /// Make the configured collections the store's collection set and report
    /// configuration problems.
    ///
    /// Collections left over from an earlier configuration are removed, so
    /// routing and retention only see what the file lists now. Problems are
    /// warnings only; the affected rules are skipped at use time.
    pub async fn seed_collections(
        &self,
        collections: &[Collection],
    ) -> WiringResult<Vec<ConfigWarning>> {
        let warnings = validate_collections(collections);
        for warning in &warnings {
            warn!(%warning, "Collection configuration problem");
        }

        let previous = self
            .store
            .list_collections()
            .await
            .map_err(|e| WiringError::CollectionSeed(format!("{e:#}")))?;
        for stale in previous
            .iter()
            .filter(|old| !collections.iter().any(|c| c.id == old.id))
        {
            info!(collection = %stale.id, "Removing collection no longer configured");
        }

        self.store
            .replace_collections(collections)
            .await
            .map_err(|e| WiringError::CollectionSeed(format!("{e:#}")))?;
        info!(collections = collections.len(), "Collections seeded");
        Ok(warnings)
    }

    /// Change the collection new captures are routed from. Applies to the
    /// next clipboard change.
    pub fn set_active_collection(&self, collection: Option<CollectionId>) {
        info!(collection = ?collection, "Active collection changed");
        self.active.send_replace(collection);
    }

    pub fn active_collection(&self) -> Option<CollectionId> {
        self.active.borrow().clone()
    }

    /// Start the capture worker consuming `signals` until `cancel` fires.
    pub fn spawn_capture_worker(
        &self,
        signals: mpsc::Receiver<ClipboardChangeSignal>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let worker = CaptureWorker::new(
            signals,
            BurstCoalescer::new(self.capture_config.quiet_period()),
            ClipboardSnapshotReader::new(
                self.source.clone(),
                self.capture_config.read_attempts,
                self.capture_config.read_backoff(),
            ),
            self.capture.clone(),
            self.sink.clone(),
            self.active.subscribe(),
        )
        .with_activity(self.activity.clone());
        tokio::spawn(worker.run(cancel))
    }

    /// Start the idle retention sweep, fed by the capture worker's activity.
    pub fn spawn_idle_sweeper(&self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.sweeper.clone().run_on_idle(
            self.idle_after,
            self.activity.subscribe(),
            cancel,
        ))
    }

    pub fn signal_channel(
        &self,
    ) -> (
        mpsc::Sender<ClipboardChangeSignal>,
        mpsc::Receiver<ClipboardChangeSignal>,
    ) {
        mpsc::channel(self.capture_config.channel_capacity.max(1))
    }
}

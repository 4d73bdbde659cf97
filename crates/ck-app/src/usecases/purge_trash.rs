use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, info_span, warn, Instrument};

use ck_core::ports::{ClipStorePort, ClockPort};
use ck_core::retention::DAY_MS;

#[derive(Debug, Error)]
pub enum PurgeError {
    #[error("trash purge is already running")]
    AlreadyRunning,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub erased: usize,
    pub failed: usize,
}

/// Permanently erase clips that have been in the Trashcan longer than the
/// trash retention window.
///
/// Destructive and irreversible. Running it twice has no additional effect,
/// and a second caller while a purge is in progress gets
/// [`PurgeError::AlreadyRunning`] instead of waiting.
pub struct PurgeTrashUseCase {
    store: Arc<dyn ClipStorePort>,
    clock: Arc<dyn ClockPort>,
    trash_retention_days: u32,
    running: Mutex<()>,
}

impl PurgeTrashUseCase {
    pub fn new(
        store: Arc<dyn ClipStorePort>,
        clock: Arc<dyn ClockPort>,
        trash_retention_days: u32,
    ) -> Self {
        Self {
            store,
            clock,
            trash_retention_days,
            running: Mutex::new(()),
        }
    }

    pub async fn execute(&self) -> Result<PurgeReport, PurgeError> {
        let _running = self
            .running
            .try_lock()
            .map_err(|_| PurgeError::AlreadyRunning)?;

        let span = info_span!(
            "usecase.purge_trash.execute",
            retention_days = self.trash_retention_days
        );
        self.purge().instrument(span).await
    }

    async fn purge(&self) -> Result<PurgeReport, PurgeError> {
        let window = i64::from(self.trash_retention_days).saturating_mul(DAY_MS);
        let cutoff = self.clock.now_ms().saturating_sub(window);
        let expired = self.store.query_trash(cutoff).await?;

        let mut report = PurgeReport::default();
        for clip_id in expired {
            match self.store.permanently_erase(&clip_id).await {
                Ok(true) => report.erased += 1,
                Ok(false) => {}
                Err(err) => {
                    warn!(clip_id = %clip_id, error = %err, "Failed to erase clip");
                    report.failed += 1;
                }
            }
        }

        if report.erased > 0 || report.failed > 0 {
            info!(erased = report.erased, failed = report.failed, "Trash purge finished");
        }
        Ok(report)
    }
}

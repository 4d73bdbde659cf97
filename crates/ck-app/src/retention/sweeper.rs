use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, warn, Instrument};

use crate::usecases::{
    EnforceRetentionUseCase, PurgeError, PurgeReport, PurgeTrashUseCase, RetentionReport,
    RetentionScope,
};

/// Why a sweep was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionTrigger {
    Startup,
    Shutdown,
    Idle,
    Interval,
    Explicit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub retention: RetentionReport,
    /// `None` when the purge was skipped (cancelled pass, or a purge was
    /// already in progress).
    pub purge: Option<PurgeReport>,
}

/// Runs retention enforcement followed by the trash purge.
///
/// Lifecycle triggers call [`RetentionSweeper::sweep`] directly;
/// [`RetentionSweeper::run`] drives the periodic interval sweep and
/// [`RetentionSweeper::run_on_idle`] the idle one.
pub struct RetentionSweeper {
    enforce: Arc<EnforceRetentionUseCase>,
    purge: Arc<PurgeTrashUseCase>,
    interval: Duration,
}

impl RetentionSweeper {
    pub fn new(
        enforce: Arc<EnforceRetentionUseCase>,
        purge: Arc<PurgeTrashUseCase>,
        interval: Duration,
    ) -> Self {
        Self {
            enforce,
            purge,
            interval,
        }
    }

    pub async fn sweep(
        &self,
        trigger: RetentionTrigger,
        cancel: &CancellationToken,
    ) -> Result<SweepReport> {
        let span = info_span!("retention.sweep", trigger = ?trigger);
        self.enforce_then_purge(cancel).instrument(span).await
    }

    async fn enforce_then_purge(&self, cancel: &CancellationToken) -> Result<SweepReport> {
        let retention = self.enforce.execute(RetentionScope::All, cancel).await?;
        if retention.cancelled {
            return Ok(SweepReport {
                retention,
                purge: None,
            });
        }

        let purge = match self.purge.execute().await {
            Ok(report) => Some(report),
            Err(PurgeError::AlreadyRunning) => {
                info!("Trash purge already in progress; skipping");
                None
            }
            Err(PurgeError::Store(err)) => return Err(err),
        };

        Ok(SweepReport { retention, purge })
    }

    /// Sweep every `interval` until cancelled. The first sweep happens one
    /// interval after start; the startup sweep is a separate trigger.
    pub async fn run(self: Arc<Self>, cancel: CancellationToken) {
        if self.interval.is_zero() {
            info!("Periodic retention sweep disabled");
            return;
        }

        let mut ticker = tokio::time::interval_at(
            tokio::time::Instant::now() + self.interval,
            self.interval,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if let Err(err) = self.sweep(RetentionTrigger::Interval, &cancel).await {
                        warn!(error = %err, "Periodic retention sweep failed");
                    }
                }
            }
        }
        info!("Retention sweeper stopped");
    }

    /// Sweep once the clipboard has been quiet for `idle_after` following a
    /// capture. Every change on `activity` restarts the wait; after an idle
    /// sweep nothing happens until the next change.
    pub async fn run_on_idle(
        self: Arc<Self>,
        idle_after: Duration,
        mut activity: watch::Receiver<u64>,
        cancel: CancellationToken,
    ) {
        if idle_after.is_zero() {
            info!("Idle retention sweep disabled");
            return;
        }

        'outer: loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                changed = activity.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }

            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break 'outer,
                    changed = activity.changed() => {
                        if changed.is_err() {
                            break 'outer;
                        }
                    }
                    _ = tokio::time::sleep(idle_after) => break,
                }
            }

            if let Err(err) = self.sweep(RetentionTrigger::Idle, &cancel).await {
                warn!(error = %err, "Idle retention sweep failed");
            }
        }
        info!("Idle retention sweeper stopped");
    }
}

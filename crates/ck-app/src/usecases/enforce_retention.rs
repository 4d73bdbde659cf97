use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

use ck_core::ports::{ClipQuery, ClipStorePort, ClockPort};
use ck_core::retention::{plan_retention, RetentionAction};
use ck_core::{ClipId, Collection, CollectionId, ConfigWarning};

use crate::locks::CollectionLocks;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetentionScope {
    All,
    Collection(CollectionId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionReport {
    pub collections_processed: usize,
    pub demoted: usize,
    pub trashed: usize,
    /// Actions the store rejected; the clip stays where it was.
    pub skipped: usize,
    pub warnings: Vec<ConfigWarning>,
    pub cancelled: bool,
}

/// Apply each collection's purge policy once.
///
/// Collections are processed in `(sort_key, id)` order. Clips moved into a
/// collection during a pass are not evaluated again by that collection's
/// policy until the next pass.
pub struct EnforceRetentionUseCase {
    store: Arc<dyn ClipStorePort>,
    clock: Arc<dyn ClockPort>,
    locks: Arc<CollectionLocks>,
}

impl EnforceRetentionUseCase {
    pub fn new(
        store: Arc<dyn ClipStorePort>,
        clock: Arc<dyn ClockPort>,
        locks: Arc<CollectionLocks>,
    ) -> Self {
        Self { store, clock, locks }
    }

    pub async fn execute(
        &self,
        scope: RetentionScope,
        cancel: &CancellationToken,
    ) -> Result<RetentionReport> {
        let span = info_span!("usecase.enforce_retention.execute", scope = ?scope);
        self.run_pass(scope, cancel).instrument(span).await
    }

    async fn run_pass(
        &self,
        scope: RetentionScope,
        cancel: &CancellationToken,
    ) -> Result<RetentionReport> {
        let collections = self
            .store
            .list_collections()
            .await
            .context("failed to list collections")?;

        let targets: Vec<&Collection> = match &scope {
            RetentionScope::All => collections.iter().collect(),
            RetentionScope::Collection(id) => {
                let found: Vec<&Collection> = collections.iter().filter(|c| &c.id == id).collect();
                if found.is_empty() {
                    warn!(collection = %id, "Retention requested for unknown collection");
                }
                found
            }
        };

        let mut report = RetentionReport::default();
        let mut moved_this_pass: HashSet<ClipId> = HashSet::new();

        for collection in targets {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let _guard = self.locks.lock(&collection.id).await;
            let clips = match self
                .store
                .query_by_scope(&collection.id, ClipQuery::active())
                .await
            {
                Ok(clips) => clips,
                Err(err) => {
                    warn!(collection = %collection.id, error = %err, "Failed to load clips; skipping collection");
                    continue;
                }
            };
            let evaluated: Vec<_> = clips
                .into_iter()
                .filter(|c| !moved_this_pass.contains(&c.id))
                .collect();

            let now = self.clock.now_ms();
            let plan = plan_retention(collection, &evaluated, &collections, now);
            report.warnings.extend(plan.warnings);
            if !plan.actions.is_empty() {
                debug!(collection = %collection.id, actions = plan.actions.len(), "Applying retention plan");
            }

            for action in plan.actions {
                if cancel.is_cancelled() {
                    report.cancelled = true;
                    break;
                }
                match action {
                    RetentionAction::Demote { clip_id, to } => {
                        match self.store.reassign_collection(&clip_id, &to).await {
                            Ok(()) => {
                                report.demoted += 1;
                                moved_this_pass.insert(clip_id);
                            }
                            Err(err) => {
                                warn!(clip_id = %clip_id, to = %to, error = %err, "Failed to demote clip");
                                report.skipped += 1;
                            }
                        }
                    }
                    RetentionAction::Trash { clip_id, reason } => {
                        match self.store.soft_delete(&clip_id, now).await {
                            Ok(()) => report.trashed += 1,
                            Err(err) => {
                                warn!(clip_id = %clip_id, ?reason, error = %err, "Failed to trash clip");
                                report.skipped += 1;
                            }
                        }
                    }
                }
            }

            if report.cancelled {
                break;
            }
            report.collections_processed += 1;
        }

        info!(
            collections = report.collections_processed,
            demoted = report.demoted,
            trashed = report.trashed,
            skipped = report.skipped,
            warnings = report.warnings.len(),
            cancelled = report.cancelled,
            "Retention pass finished"
        );
        Ok(report)
    }
}

use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info, info_span, Instrument};

use ck_core::clip::normalize;
use ck_core::collection::route;
use ck_core::ports::{ClipStorePort, ClockPort, EchoRegistryPort};
use ck_core::{
    CaptureError, CaptureOutcome, Clip, CollectionId, RawCaptureEvent, RouteDecision, SourceFilter,
};

use crate::capture::DeduplicationGate;
use crate::locks::CollectionLocks;

/// Turn one raw clipboard snapshot into at most one stored clip.
///
/// 将一次剪贴板快照转换为至多一条持久化记录。
///
/// # Behavior / 行为
/// 1. Normalize formats; nothing left means [`CaptureOutcome::Empty`]
/// 2. Consume a pending self-echo marker for the payload, if any
/// 3. Apply application filters to the clipboard owner
/// 4. Route to a collection (bounce tracking)
/// 5. Under the collection lock: recency dedup, then insert
///
/// Every non-`Captured` outcome leaves the store untouched.
pub struct CaptureClipUseCase {
    store: Arc<dyn ClipStorePort>,
    echo: Arc<dyn EchoRegistryPort>,
    clock: Arc<dyn ClockPort>,
    locks: Arc<CollectionLocks>,
    filter: Arc<SourceFilter>,
    dedup: DeduplicationGate,
    max_format_bytes: usize,
}

impl CaptureClipUseCase {
    pub fn new(
        store: Arc<dyn ClipStorePort>,
        echo: Arc<dyn EchoRegistryPort>,
        clock: Arc<dyn ClockPort>,
        locks: Arc<CollectionLocks>,
        filter: Arc<SourceFilter>,
        max_format_bytes: usize,
    ) -> Self {
        Self {
            dedup: DeduplicationGate::new(Arc::clone(&store)),
            store,
            echo,
            clock,
            locks,
            filter,
            max_format_bytes,
        }
    }

    pub async fn execute(
        &self,
        raw: RawCaptureEvent,
        active_collection: Option<&CollectionId>,
    ) -> Result<CaptureOutcome, CaptureError> {
        let span = info_span!(
            "usecase.capture_clip.execute",
            sequence = raw.sequence,
            source = %raw.source.process_name,
        );
        self.execute_inner(raw, active_collection)
            .instrument(span)
            .await
    }

    async fn execute_inner(
        &self,
        raw: RawCaptureEvent,
        active_collection: Option<&CollectionId>,
    ) -> Result<CaptureOutcome, CaptureError> {
        let Some(payload) = normalize(&raw, self.max_format_bytes) else {
            debug!("No capturable formats on the clipboard");
            return Ok(CaptureOutcome::Empty);
        };
        let fingerprint = payload.fingerprint();

        if self.echo.consume_if_echo(&fingerprint).await {
            debug!(fingerprint = %fingerprint, "Suppressed self-echo");
            return Ok(CaptureOutcome::EchoSuppressed);
        }

        let source = &raw.source;
        if !self.filter.should_capture(
            &source.process_name,
            source.window_title.as_deref(),
            source.window_class.as_deref(),
        ) {
            return Ok(CaptureOutcome::Filtered {
                process_name: source.process_name.clone(),
            });
        }

        let collections = self
            .store
            .list_collections()
            .await
            .context("failed to load collections for routing")
            .map_err(CaptureError::Persistence)?;
        let decision = route(active_collection, &collections);

        let scope = match (&decision, active_collection) {
            (RouteDecision::Target(target), _) => target.clone(),
            (RouteDecision::Dropped(_), Some(active)) => active.clone(),
            (RouteDecision::Dropped(reason), None) => {
                return Ok(CaptureOutcome::Dropped(reason.clone()));
            }
        };

        let _guard = self.locks.lock(&scope).await;

        let duplicate = self
            .dedup
            .is_duplicate(&fingerprint, &scope)
            .await
            .context("failed to read most recent fingerprint")
            .map_err(CaptureError::Persistence)?;
        if duplicate {
            return Ok(CaptureOutcome::DuplicateSuppressed {
                collection_id: scope,
            });
        }

        let collection_id = match decision {
            RouteDecision::Target(target) => target,
            RouteDecision::Dropped(reason) => return Ok(CaptureOutcome::Dropped(reason)),
        };

        let clip = Clip::capture(
            payload,
            &raw.source,
            collection_id.clone(),
            self.clock.now_ms(),
        );
        self.store
            .insert_clip(&clip)
            .await
            .map_err(CaptureError::Persistence)?;

        info!(clip_id = %clip.id, collection_id = %collection_id, "Clip stored");
        Ok(CaptureOutcome::Captured {
            clip_id: clip.id,
            collection_id,
        })
    }
}

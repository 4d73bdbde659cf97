use async_trait::async_trait;
use tracing::{debug, info, warn};

use ck_core::ports::CaptureEventSinkPort;
use ck_core::{CaptureError, CaptureOutcome};

/// Capture sink that only records outcomes as tracing events.
///
/// Used by the headless daemon, where there is no UI to notify.
#[derive(Debug, Default)]
pub struct TracingCaptureSink;

#[async_trait]
impl CaptureEventSinkPort for TracingCaptureSink {
    async fn on_outcome(&self, sequence: u64, outcome: &CaptureOutcome) {
        match outcome {
            CaptureOutcome::Captured {
                clip_id,
                collection_id,
            } => info!(sequence, %clip_id, %collection_id, "Clip captured"),
            CaptureOutcome::Filtered { process_name } => {
                info!(sequence, process_name, "Clipboard change ignored by application filter")
            }
            CaptureOutcome::DuplicateSuppressed { collection_id } => {
                info!(sequence, %collection_id, "Duplicate clip suppressed")
            }
            CaptureOutcome::Dropped(reason) => {
                warn!(sequence, ?reason, "Clip dropped: no collection accepts new clips")
            }
            other => debug!(sequence, outcome = other.label(), "Clipboard change skipped"),
        }
    }

    async fn on_error(&self, sequence: u64, error: &CaptureError) {
        warn!(sequence, error = %error, "Capture failed");
    }
}

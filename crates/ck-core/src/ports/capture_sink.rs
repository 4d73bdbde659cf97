use async_trait::async_trait;

use crate::capture::{CaptureError, CaptureOutcome};

/// Receives the result of every processed clipboard change so the
/// surrounding application can give distinct feedback per outcome.
#[async_trait]
pub trait CaptureEventSinkPort: Send + Sync {
    async fn on_outcome(&self, sequence: u64, outcome: &CaptureOutcome);

    async fn on_error(&self, sequence: u64, error: &CaptureError);
}

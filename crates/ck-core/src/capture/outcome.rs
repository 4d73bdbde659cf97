use crate::collection::DropReason;
use crate::ids::{ClipId, CollectionId};

/// A clipboard-change notification as delivered by the listener context.
///
/// Carries no payload: the worker reads the clipboard itself once the burst
/// has settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipboardChangeSignal {
    pub sequence: u64,
    pub observed_at_ms: i64,
}

/// 一次捕获的结果 / Result of processing a single clipboard change.
///
/// Every variant other than `Captured` means no clip was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Captured {
        clip_id: ClipId,
        collection_id: CollectionId,
    },
    /// The change was caused by our own clipboard write.
    EchoSuppressed,
    Filtered {
        process_name: String,
    },
    DuplicateSuppressed {
        collection_id: CollectionId,
    },
    Dropped(DropReason),
    /// Nothing capturable was on the clipboard.
    Empty,
}

impl CaptureOutcome {
    pub fn is_captured(&self) -> bool {
        matches!(self, CaptureOutcome::Captured { .. })
    }

    /// Short label used in logs and notifications.
    pub fn label(&self) -> &'static str {
        match self {
            CaptureOutcome::Captured { .. } => "captured",
            CaptureOutcome::EchoSuppressed => "echo_suppressed",
            CaptureOutcome::Filtered { .. } => "filtered",
            CaptureOutcome::DuplicateSuppressed { .. } => "duplicate_suppressed",
            CaptureOutcome::Dropped(_) => "dropped",
            CaptureOutcome::Empty => "empty",
        }
    }
}

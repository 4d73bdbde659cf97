use thiserror::Error;

use crate::clip::FormatKind;

/// Failure while reading one snapshot of the OS clipboard.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClipboardReadError {
    /// Another process holds the clipboard open.
    #[error("clipboard is busy")]
    Busy,
    #[error("format {0} is no longer available")]
    FormatUnavailable(FormatKind),
    #[error("platform clipboard error: {0}")]
    Platform(String),
}

impl ClipboardReadError {
    /// Whether retrying the read can reasonably succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ClipboardReadError::Busy)
    }
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("clipboard unavailable after {attempts} attempts: {last_error}")]
    ClipboardUnavailable {
        attempts: u32,
        last_error: ClipboardReadError,
    },

    #[error("clipboard read failed: {0}")]
    ClipboardRead(#[from] ClipboardReadError),

    /// The store rejected the write; nothing was persisted.
    #[error("failed to persist clip")]
    Persistence(#[source] anyhow::Error),
}

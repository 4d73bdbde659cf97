use serde::{Deserialize, Serialize};

use super::{ClipFormat, Fingerprint, FormatKind};

/// The window/process that owned the clipboard when it changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceApplication {
    pub process_name: String,
    pub window_title: Option<String>,
    pub window_class: Option<String>,
}

impl SourceApplication {
    pub fn new(process_name: impl Into<String>) -> Self {
        Self {
            process_name: process_name.into(),
            window_title: None,
            window_class: None,
        }
    }

    /// Used when the platform cannot tell who owns the clipboard.
    pub fn unknown() -> Self {
        Self::new("")
    }

    pub fn with_window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = Some(title.into());
        self
    }

    pub fn with_window_class(mut self, class: impl Into<String>) -> Self {
        self.window_class = Some(class.into());
        self
    }
}

/// Everything the capture source adapter read for a single clipboard change.
#[derive(Debug, Clone)]
pub struct RawCaptureEvent {
    /// Sequence number of the change signal this event was read for.
    pub sequence: u64,
    pub observed_at_ms: i64,
    pub source: SourceApplication,
    pub formats: Vec<ClipFormat>,
}

/// Normalized, size-bounded set of formats ready to be fingerprinted and stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPayload {
    formats: Vec<ClipFormat>,
}

impl CapturedPayload {
    /// Callers outside the normalizer should go through [`super::normalize`].
    pub(crate) fn from_formats(formats: Vec<ClipFormat>) -> Self {
        Self { formats }
    }

    pub fn formats(&self) -> &[ClipFormat] {
        &self.formats
    }

    pub fn into_formats(self) -> Vec<ClipFormat> {
        self.formats
    }

    pub fn get(&self, kind: &FormatKind) -> Option<&ClipFormat> {
        self.formats.iter().find(|f| &f.kind == kind)
    }

    /// Format preferred for display: rich text over plain text, then HTML,
    /// file lists, bitmaps and finally opaque registered formats.
    pub fn display_kind(&self) -> Option<&FormatKind> {
        self.formats
            .iter()
            .map(|f| &f.kind)
            .min_by_key(|k| k.display_rank())
    }

    pub fn total_size_bytes(&self) -> usize {
        self.formats.iter().map(ClipFormat::size_bytes).sum()
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of_formats(&self.formats)
    }
}

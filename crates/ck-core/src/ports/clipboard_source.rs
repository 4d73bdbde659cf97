use crate::capture::ClipboardReadError;
use crate::clip::{FormatKind, SourceApplication};

/// Capture source adapter boundary.
///
/// Calls block on the OS clipboard; callers run them off the async runtime.
/// Implementations must tolerate being opened and closed repeatedly.
pub trait ClipboardSourcePort: Send + Sync {
    /// Window/process currently owning the clipboard.
    fn current_owner(&self) -> SourceApplication;

    fn enumerate_formats(&self) -> Result<Vec<FormatKind>, ClipboardReadError>;

    fn read_format(&self, kind: &FormatKind) -> Result<Vec<u8>, ClipboardReadError>;
}

use anyhow::Result;

use crate::clip::ClipFormat;

/// Writes formats to the OS clipboard, replacing its content.
pub trait ClipboardWriterPort: Send + Sync {
    fn write(&self, formats: &[ClipFormat]) -> Result<()>;
}

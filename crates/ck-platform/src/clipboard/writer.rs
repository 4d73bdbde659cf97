use anyhow::{anyhow, ensure, Result};
use clipboard_rs::{Clipboard, ClipboardContent, ClipboardContext};
use tracing::debug;

use ck_core::ports::ClipboardWriterPort;
use ck_core::ClipFormat;

use super::formats::to_content;
use super::LocalClipboard;

impl ClipboardWriterPort for LocalClipboard {
    /// Replace the clipboard with every format of the clip in one operation.
    fn write(&self, formats: &[ClipFormat]) -> Result<()> {
        ensure!(!formats.is_empty(), "refusing to write an empty clip");

        let contents = formats
            .iter()
            .map(to_content)
            .collect::<Result<Vec<_>>>()?;

        let mut ctx = self.context()?;
        set_all(&mut ctx, contents)?;
        debug!(formats = formats.len(), "Wrote clip to clipboard");
        Ok(())
    }
}

fn set_all(ctx: &mut ClipboardContext, contents: Vec<ClipboardContent>) -> Result<()> {
    ctx.set(contents)
        .map_err(|e| anyhow!("Failed to write clipboard: {}", e))
}

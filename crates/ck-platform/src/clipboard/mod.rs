mod formats;
mod source;
mod writer;

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, Result};
use clipboard_rs::ClipboardContext;

pub use formats::{classify_error, is_standard_format_name};

/// The local OS clipboard, shared by the capture reader and the restore
/// writer.
///
/// clipboard-rs 在各平台上都不是线程安全的，所有访问都经过同一把锁。
#[derive(Clone)]
pub struct LocalClipboard {
    inner: Arc<Mutex<ClipboardContext>>,
}

impl LocalClipboard {
    pub fn new() -> Result<Self> {
        let context = ClipboardContext::new()
            .map_err(|e| anyhow!("Failed to create clipboard context: {}", e))?;
        Ok(Self {
            inner: Arc::new(Mutex::new(context)),
        })
    }

    fn context(&self) -> Result<MutexGuard<'_, ClipboardContext>> {
        self.inner
            .lock()
            .map_err(|_| anyhow!("clipboard context lock poisoned"))
    }
}

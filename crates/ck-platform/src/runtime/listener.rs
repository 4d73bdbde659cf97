//! Clipboard change listener.
//!
//! Runs the clipboard-rs watch loop on a blocking thread. The handler does
//! nothing but stamp a sequence number and hand a signal to the capture
//! worker; it never opens the clipboard itself, so the watch loop keeps
//! draining OS notifications even while the worker is slow.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clipboard_rs::{
    ClipboardHandler, ClipboardWatcher as RSClipboardWatcher, ClipboardWatcherContext,
    WatcherShutdown,
};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use ck_core::ClipboardChangeSignal;

/// Forwards every OS change notification as a [`ClipboardChangeSignal`].
pub struct SignalForwarder {
    tx: mpsc::Sender<ClipboardChangeSignal>,
    sequence: Arc<AtomicU64>,
}

impl SignalForwarder {
    pub fn new(tx: mpsc::Sender<ClipboardChangeSignal>) -> Self {
        Self {
            tx,
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    fn next_signal(&self) -> ClipboardChangeSignal {
        ClipboardChangeSignal {
            sequence: self.sequence.fetch_add(1, Ordering::Relaxed) + 1,
            observed_at_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

impl ClipboardHandler for SignalForwarder {
    fn on_clipboard_change(&mut self) {
        let signal = self.next_signal();
        match self.tx.try_send(signal) {
            Ok(()) => {}
            // The worker still has signals queued; it reads the latest
            // clipboard state when it gets to them.
            Err(TrySendError::Full(_)) => {
                warn!(sequence = signal.sequence, "Capture queue full; dropping change signal")
            }
            Err(TrySendError::Closed(_)) => {
                debug!(sequence = signal.sequence, "Capture worker gone; ignoring change signal")
            }
        }
    }
}

/// Running listener. Dropping it without [`ListenerHandle::stop`] leaves the
/// watch thread running until the process exits.
pub struct ListenerHandle {
    shutdown: WatcherShutdown,
    join: JoinHandle<()>,
}

impl ListenerHandle {
    pub async fn stop(self) {
        self.shutdown.stop();
        if let Err(e) = self.join.await {
            warn!(error = %e, "Clipboard listener thread ended abnormally");
        }
    }
}

/// Register with the OS clipboard and start forwarding change signals.
pub fn start_listener(tx: mpsc::Sender<ClipboardChangeSignal>) -> Result<ListenerHandle> {
    let mut watcher_ctx = ClipboardWatcherContext::new()
        .map_err(|e| anyhow!("Failed to create watcher context: {}", e))?;

    let shutdown = watcher_ctx
        .add_handler(SignalForwarder::new(tx))
        .get_shutdown_channel();

    let join = tokio::task::spawn_blocking(move || {
        info!("start clipboard watch");
        watcher_ctx.start_watch();
        info!("clipboard watch stopped");
    });

    Ok(ListenerHandle { shutdown, join })
}

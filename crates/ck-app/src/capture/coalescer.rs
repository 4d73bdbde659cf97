use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use ck_core::ClipboardChangeSignal;

/// The signal that survived a burst, plus how many were folded into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Burst {
    pub last: ClipboardChangeSignal,
    pub collapsed: usize,
}

/// Collapses change notifications that arrive within the quiet period of
/// each other into the last one.
///
/// Some applications put several formats on the clipboard one after the
/// other and the OS reports each write; only the final state is worth reading.
#[derive(Debug, Clone, Copy)]
pub struct BurstCoalescer {
    quiet_period: Duration,
}

impl BurstCoalescer {
    pub fn new(quiet_period: Duration) -> Self {
        Self { quiet_period }
    }

    /// Wait for the next signal, then keep absorbing signals until the
    /// channel stays quiet for the whole quiet period.
    ///
    /// Returns `None` once the channel is closed and drained.
    pub async fn next_burst(
        &self,
        rx: &mut mpsc::Receiver<ClipboardChangeSignal>,
    ) -> Option<Burst> {
        let mut last = rx.recv().await?;
        let mut collapsed = 0usize;

        loop {
            match timeout(self.quiet_period, rx.recv()).await {
                Ok(Some(signal)) => {
                    last = signal;
                    collapsed += 1;
                }
                // Closed channel or quiet period elapsed: the burst is over.
                Ok(None) | Err(_) => break,
            }
        }

        Some(Burst { last, collapsed })
    }
}

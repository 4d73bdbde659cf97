use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tracing::{info, info_span, warn, Instrument};

use ck_core::ports::{ClipStorePort, ClipboardWriterPort, ClockPort, EchoRegistryPort};
use ck_core::{Clip, ClipId};

use super::RegisterPendingEchoUseCase;

/// Put a stored clip back on the OS clipboard.
///
/// 把历史条目写回系统剪贴板：先登记 echo 标记，再写剪贴板，最后记录访问。
pub struct RestoreClipUseCase {
    store: Arc<dyn ClipStorePort>,
    writer: Arc<dyn ClipboardWriterPort>,
    echo: Arc<dyn EchoRegistryPort>,
    register_echo: RegisterPendingEchoUseCase,
    clock: Arc<dyn ClockPort>,
    echo_validity: Duration,
}

impl RestoreClipUseCase {
    pub fn new(
        store: Arc<dyn ClipStorePort>,
        writer: Arc<dyn ClipboardWriterPort>,
        echo: Arc<dyn EchoRegistryPort>,
        clock: Arc<dyn ClockPort>,
        echo_validity: Duration,
    ) -> Self {
        Self {
            register_echo: RegisterPendingEchoUseCase::new(Arc::clone(&echo)),
            store,
            writer,
            echo,
            clock,
            echo_validity,
        }
    }

    pub async fn execute(&self, clip_id: &ClipId) -> Result<Clip> {
        let span = info_span!("usecase.restore_clip.execute", clip_id = %clip_id);
        self.restore(clip_id).instrument(span).await
    }

    async fn restore(&self, clip_id: &ClipId) -> Result<Clip> {
        let clip = self
            .store
            .get_clip(clip_id)
            .await?
            .ok_or_else(|| anyhow!("clip {clip_id} not found"))?;

        self.register_echo
            .execute(clip.fingerprint, self.echo_validity)
            .await;

        let writer = Arc::clone(&self.writer);
        let formats = clip.formats.clone();
        let written = tokio::task::spawn_blocking(move || writer.write(&formats))
            .await
            .context("clipboard writer task failed")
            .and_then(|r| r);
        if let Err(err) = written {
            // No change notification will come; retract the marker.
            self.echo.consume_if_echo(&clip.fingerprint).await;
            return Err(err.context("failed to write clip to clipboard"));
        }

        let now = self.clock.now_ms();
        if let Err(err) = self.store.touch_clip(clip_id, now).await {
            warn!(error = %err, "Failed to record clip access");
        }

        info!("Clip restored to clipboard");
        Ok(clip)
    }
}

use std::time::Duration;

use serde::Deserialize;

use crate::clip::DEFAULT_MAX_FORMAT_BYTES;
use crate::ids::CollectionId;

/// `[capture]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Quiet period used to collapse bursts of change notifications.
    pub quiet_period_ms: u64,
    pub read_attempts: u32,
    /// Linear backoff step between busy-clipboard retries.
    pub read_backoff_ms: u64,
    pub max_format_bytes: usize,
    /// How long a self-echo marker stays valid.
    pub echo_validity_ms: u64,
    /// Bounded capacity of the listener -> worker channel.
    pub channel_capacity: usize,
    /// Collection that receives captures while it accepts new clips.
    pub active_collection: Option<CollectionId>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            quiet_period_ms: 150,
            read_attempts: 4,
            read_backoff_ms: 25,
            max_format_bytes: DEFAULT_MAX_FORMAT_BYTES,
            echo_validity_ms: 2_000,
            channel_capacity: 64,
            active_collection: None,
        }
    }
}

impl CaptureConfig {
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }

    pub fn read_backoff(&self) -> Duration {
        Duration::from_millis(self.read_backoff_ms)
    }

    pub fn echo_validity(&self) -> Duration {
        Duration::from_millis(self.echo_validity_ms)
    }
}

/// `[retention]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Soft-deleted clips older than this are permanently erased.
    pub trash_retention_days: u32,
    pub sweep_interval_secs: u64,
    pub run_on_startup: bool,
    pub run_on_shutdown: bool,
    /// Sweep once the clipboard has been quiet this long. `0` disables it.
    pub idle_after_secs: u64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            trash_retention_days: 30,
            sweep_interval_secs: 600,
            run_on_startup: true,
            run_on_shutdown: true,
            idle_after_secs: 300,
        }
    }
}

impl RetentionConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn idle_after(&self) -> Duration {
        Duration::from_secs(self.idle_after_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub capture: CaptureConfig,
    pub retention: RetentionConfig,
}

impl EngineConfig {
    pub fn defaults() -> Self {
        Self::default()
    }
}

use async_trait::async_trait;
use std::time::Duration;

use crate::clip::Fingerprint;

/// Registry of pending self-echo markers.
///
/// 写剪贴板前登记指纹，监听到变化时消费，避免把自己的写入再次捕获。
#[async_trait]
pub trait EchoRegistryPort: Send + Sync {
    /// Record a single-use marker valid for `validity`. Several markers may
    /// be pending at the same time.
    async fn register_pending_echo(&self, fingerprint: Fingerprint, validity: Duration);

    /// Remove and report a live marker matching `fingerprint`.
    async fn consume_if_echo(&self, fingerprint: &Fingerprint) -> bool;
}

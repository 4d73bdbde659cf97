use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use ck_core::ports::EchoRegistryPort;
use ck_core::Fingerprint;

/// Pending self-echo markers kept in process memory.
///
/// Markers are single-use and expire; expired ones are pruned whenever the
/// registry is touched.
pub struct InMemoryEchoRegistry {
    markers: Mutex<Vec<EchoMarker>>,
}

struct EchoMarker {
    fingerprint: Fingerprint,
    expires_at: Instant,
}

impl InMemoryEchoRegistry {
    pub fn new() -> Self {
        Self {
            markers: Mutex::new(Vec::new()),
        }
    }

    pub async fn pending(&self) -> usize {
        let mut markers = self.markers.lock().await;
        prune(&mut markers, Instant::now());
        markers.len()
    }
}

impl Default for InMemoryEchoRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn prune(markers: &mut Vec<EchoMarker>, now: Instant) {
    markers.retain(|m| now <= m.expires_at);
}

#[async_trait]
impl EchoRegistryPort for InMemoryEchoRegistry {
    async fn register_pending_echo(&self, fingerprint: Fingerprint, validity: Duration) {
        let now = Instant::now();
        let expires_at = now.checked_add(validity).unwrap_or(now);
        let mut markers = self.markers.lock().await;
        prune(&mut markers, now);
        markers.push(EchoMarker {
            fingerprint,
            expires_at,
        });
    }

    async fn consume_if_echo(&self, fingerprint: &Fingerprint) -> bool {
        let mut markers = self.markers.lock().await;
        prune(&mut markers, Instant::now());
        match markers.iter().position(|m| &m.fingerprint == fingerprint) {
            Some(idx) => {
                markers.remove(idx);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ck_core::ClipFormat;

    fn fp(text: &str) -> Fingerprint {
        Fingerprint::of_formats(&[ClipFormat::text(text)])
    }

    #[tokio::test]
    async fn marker_is_consumed_once() {
        let registry = InMemoryEchoRegistry::new();
        registry
            .register_pending_echo(fp("hello"), Duration::from_secs(1))
            .await;
        assert!(registry.consume_if_echo(&fp("hello")).await);
        assert!(!registry.consume_if_echo(&fp("hello")).await);
    }

    #[tokio::test]
    async fn several_markers_can_be_pending() {
        let registry = InMemoryEchoRegistry::new();
        registry
            .register_pending_echo(fp("a"), Duration::from_secs(1))
            .await;
        registry
            .register_pending_echo(fp("b"), Duration::from_secs(1))
            .await;
        assert!(!registry.consume_if_echo(&fp("c")).await);
        assert!(registry.consume_if_echo(&fp("b")).await);
        assert!(registry.consume_if_echo(&fp("a")).await);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_marker_does_not_suppress() {
        let registry = InMemoryEchoRegistry::new();
        registry
            .register_pending_echo(fp("late"), Duration::from_millis(500))
            .await;
        tokio::time::advance(Duration::from_millis(501)).await;
        assert!(!registry.consume_if_echo(&fp("late")).await);
        assert_eq!(registry.pending().await, 0);
    }
}

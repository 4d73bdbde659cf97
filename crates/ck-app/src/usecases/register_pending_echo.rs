use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use ck_core::ports::EchoRegistryPort;
use ck_core::Fingerprint;

/// Announce that the engine is about to write `fingerprint` to the clipboard.
///
/// Must complete before the OS write is issued, otherwise the change
/// notification can overtake the marker.
pub struct RegisterPendingEchoUseCase {
    echo: Arc<dyn EchoRegistryPort>,
}

impl RegisterPendingEchoUseCase {
    pub fn new(echo: Arc<dyn EchoRegistryPort>) -> Self {
        Self { echo }
    }

    pub async fn execute(&self, fingerprint: Fingerprint, validity: Duration) {
        debug!(fingerprint = %fingerprint, validity_ms = validity.as_millis() as u64, "Registering pending echo");
        self.echo.register_pending_echo(fingerprint, validity).await;
    }
}

use std::sync::Arc;

use anyhow::Result;

use ck_core::ports::ClipStorePort;
use ck_core::{CollectionId, Fingerprint};

/// Recency-scoped duplicate detection.
///
/// A payload is a duplicate only if it equals the newest live clip of the
/// same collection. Copying X, Y, X yields three clips.
pub struct DeduplicationGate {
    store: Arc<dyn ClipStorePort>,
}

impl DeduplicationGate {
    pub fn new(store: Arc<dyn ClipStorePort>) -> Self {
        Self { store }
    }

    pub async fn is_duplicate(&self, fingerprint: &Fingerprint, scope: &CollectionId) -> Result<bool> {
        let latest = self.store.most_recent_fingerprint(scope).await?;
        Ok(latest.as_ref() == Some(fingerprint))
    }
}

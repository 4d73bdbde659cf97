//! Collection-scoped exclusion between capture and retention.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use ck_core::CollectionId;

/// One async mutex per collection, created on first use.
///
/// Capture holds the guard of its target collection from the duplicate
/// check through the insert; the retention enforcer holds the guard of the
/// collection it is evaluating. Different collections never block each other.
#[derive(Default)]
pub struct CollectionLocks {
    locks: Mutex<HashMap<CollectionId, Arc<Mutex<()>>>>,
}

impl CollectionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    async fn handle(&self, collection: &CollectionId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(collection.clone()).or_default().clone()
    }

    pub async fn lock(&self, collection: &CollectionId) -> OwnedMutexGuard<()> {
        self.handle(collection).await.lock_owned().await
    }

    /// `None` if someone else currently holds the collection.
    pub async fn try_lock(&self, collection: &CollectionId) -> Option<OwnedMutexGuard<()>> {
        self.handle(collection).await.try_lock_owned().ok()
    }
}

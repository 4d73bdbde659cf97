use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use ck_core::clip::capture_order;
use ck_core::ports::{ClipQuery, ClipStorePort};
use ck_core::{Clip, ClipId, Collection, CollectionId, Fingerprint};

use super::StoreError;

/// Process-local clip store.
///
/// Each operation takes the state lock once, so every call is atomic with
/// respect to the others, matching the single-clip transactions of the
/// SQLite store.
pub struct InMemoryClipStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    clips: HashMap<ClipId, Clip>,
    collections: Vec<Collection>,
}

impl InMemoryClipStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    pub fn with_collections(collections: Vec<Collection>) -> Self {
        Self {
            state: Mutex::new(State {
                clips: HashMap::new(),
                collections,
            }),
        }
    }

    pub async fn clip_count(&self) -> usize {
        self.state.lock().await.clips.len()
    }

    /// Every stored clip including soft-deleted ones, in capture order.
    pub async fn all_clips(&self) -> Vec<Clip> {
        let state = self.state.lock().await;
        let mut clips: Vec<Clip> = state.clips.values().cloned().collect();
        clips.sort_by(capture_order);
        clips
    }
}

impl Default for InMemoryClipStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClipStorePort for InMemoryClipStore {
    async fn insert_clip(&self, clip: &Clip) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.clips.contains_key(&clip.id) {
            return Err(StoreError::DuplicateClip(clip.id.clone()).into());
        }
        state.clips.insert(clip.id.clone(), clip.clone());
        Ok(())
    }

    async fn reassign_collection(&self, clip_id: &ClipId, to: &CollectionId) -> Result<()> {
        let mut state = self.state.lock().await;
        let clip = state
            .clips
            .get_mut(clip_id)
            .ok_or_else(|| StoreError::ClipNotFound(clip_id.clone()))?;
        clip.collection_id = to.clone();
        Ok(())
    }

    async fn soft_delete(&self, clip_id: &ClipId, deleted_at_ms: i64) -> Result<()> {
        let mut state = self.state.lock().await;
        let clip = state
            .clips
            .get_mut(clip_id)
            .ok_or_else(|| StoreError::ClipNotFound(clip_id.clone()))?;
        clip.deleted_at_ms.get_or_insert(deleted_at_ms);
        Ok(())
    }

    async fn permanently_erase(&self, clip_id: &ClipId) -> Result<bool> {
        Ok(self.state.lock().await.clips.remove(clip_id).is_some())
    }

    async fn query_by_scope(
        &self,
        collection_id: &CollectionId,
        query: ClipQuery,
    ) -> Result<Vec<Clip>> {
        let state = self.state.lock().await;
        let mut clips: Vec<Clip> = state
            .clips
            .values()
            .filter(|c| &c.collection_id == collection_id)
            .filter(|c| query.include_deleted || !c.is_soft_deleted())
            .cloned()
            .collect();
        clips.sort_by(capture_order);
        if query.newest_first {
            clips.reverse();
        }
        if let Some(limit) = query.limit {
            clips.truncate(limit);
        }
        Ok(clips)
    }

    async fn list_collections(&self) -> Result<Vec<Collection>> {
        let state = self.state.lock().await;
        let mut collections = state.collections.clone();
        collections.sort_by(|a, b| a.sort_key.cmp(&b.sort_key).then_with(|| a.id.cmp(&b.id)));
        Ok(collections)
    }

    async fn save_collection(&self, collection: &Collection) -> Result<()> {
        let mut state = self.state.lock().await;
        match state.collections.iter_mut().find(|c| c.id == collection.id) {
            Some(existing) => *existing = collection.clone(),
            None => state.collections.push(collection.clone()),
        }
        Ok(())
    }

    async fn replace_collections(&self, collections: &[Collection]) -> Result<()> {
        self.state.lock().await.collections = collections.to_vec();
        Ok(())
    }

    async fn most_recent_fingerprint(&self, scope: &CollectionId) -> Result<Option<Fingerprint>> {
        let state = self.state.lock().await;
        Ok(state
            .clips
            .values()
            .filter(|c| &c.collection_id == scope && !c.is_soft_deleted())
            .max_by(|a, b| capture_order(a, b))
            .map(|c| c.fingerprint))
    }

    async fn get_clip(&self, clip_id: &ClipId) -> Result<Option<Clip>> {
        Ok(self.state.lock().await.clips.get(clip_id).cloned())
    }

    async fn touch_clip(&self, clip_id: &ClipId, accessed_at_ms: i64) -> Result<()> {
        let mut state = self.state.lock().await;
        let clip = state
            .clips
            .get_mut(clip_id)
            .ok_or_else(|| StoreError::ClipNotFound(clip_id.clone()))?;
        clip.last_accessed_ms = Some(accessed_at_ms);
        clip.access_count = clip.access_count.saturating_add(1);
        Ok(())
    }

    async fn query_trash(&self, deleted_before_ms: i64) -> Result<Vec<ClipId>> {
        let state = self.state.lock().await;
        let mut trashed: Vec<&Clip> = state
            .clips
            .values()
            .filter(|c| c.deleted_at_ms.is_some_and(|at| at < deleted_before_ms))
            .collect();
        trashed.sort_by(|a, b| capture_order(a, b));
        Ok(trashed.into_iter().map(|c| c.id.clone()).collect())
    }
}

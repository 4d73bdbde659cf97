use anyhow::Result;
use async_trait::async_trait;

use crate::clip::{Clip, Fingerprint};
use crate::collection::Collection;
use crate::ids::{ClipId, CollectionId};

/// Filters for [`ClipStorePort::query_by_scope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClipQuery {
    pub include_deleted: bool,
    pub limit: Option<usize>,
    /// Default order is capture order, oldest first.
    pub newest_first: bool,
}

impl ClipQuery {
    /// Non-deleted clips, oldest first.
    pub fn active() -> Self {
        Self::default()
    }

    pub fn newest(limit: usize) -> Self {
        Self {
            include_deleted: false,
            limit: Some(limit),
            newest_first: true,
        }
    }

    pub fn with_deleted(mut self) -> Self {
        self.include_deleted = true;
        self
    }
}

/// ClipStorePort
///
/// 剪贴板条目与集合的持久化端口。
///
/// 约定：
/// - 每个方法在单条 clip 粒度上是事务性的
/// - reassign 是移动而不是复制：clip 要么在原集合，要么在新集合
#[async_trait]
pub trait ClipStorePort: Send + Sync {
    /// Insert a new clip with all its formats in one transaction.
    async fn insert_clip(&self, clip: &Clip) -> Result<()>;

    /// Move a clip to another collection. Fails if the clip does not exist.
    async fn reassign_collection(&self, clip_id: &ClipId, to: &CollectionId) -> Result<()>;

    /// Mark a clip as deleted (Trashcan). Already deleted clips keep their
    /// original deletion time.
    async fn soft_delete(&self, clip_id: &ClipId, deleted_at_ms: i64) -> Result<()>;

    /// Erase a clip and its formats. Returns `false` if it was already gone.
    async fn permanently_erase(&self, clip_id: &ClipId) -> Result<bool>;

    async fn query_by_scope(&self, collection_id: &CollectionId, query: ClipQuery)
        -> Result<Vec<Clip>>;

    async fn list_collections(&self) -> Result<Vec<Collection>>;

    /// Insert or replace a collection definition.
    async fn save_collection(&self, collection: &Collection) -> Result<()>;

    /// Make `collections` the complete collection set in one transaction.
    /// Definitions not in the list are removed; their clips are kept.
    async fn replace_collections(&self, collections: &[Collection]) -> Result<()>;

    /// Fingerprint of the newest non-deleted clip in `scope`.
    async fn most_recent_fingerprint(&self, scope: &CollectionId) -> Result<Option<Fingerprint>>;

    async fn get_clip(&self, clip_id: &ClipId) -> Result<Option<Clip>>;

    /// Record an access: `last_accessed_ms = accessed_at_ms`, `access_count += 1`.
    async fn touch_clip(&self, clip_id: &ClipId, accessed_at_ms: i64) -> Result<()>;

    /// Ids of clips soft-deleted strictly before `deleted_before_ms`.
    async fn query_trash(&self, deleted_before_ms: i64) -> Result<Vec<ClipId>>;
}

use serde::{Deserialize, Serialize};

use crate::ids::CollectionId;

/// Retention policy attached to a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PurgePolicy {
    /// No automatic action.
    #[default]
    Never,
    /// Keep at most `count` active clips; older ones move to the overflow
    /// collection, or to the Trashcan when there is none.
    KeepLast { count: usize },
    /// Soft-delete clips captured more than `days` days ago.
    PurgeByAge { days: u32 },
}

/// A named bucket of clips with routing and retention policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    /// Bounce-chain precedence; ascending is tried first.
    #[serde(default)]
    pub sort_key: i64,
    #[serde(default)]
    pub accept_new_clips: bool,
    /// Computed/query view. Never a capture target.
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub purge_policy: PurgePolicy,
    #[serde(default, alias = "overflow")]
    pub overflow_collection_id: Option<CollectionId>,
}

impl Collection {
    pub fn new(id: impl Into<CollectionId>, name: impl Into<String>, sort_key: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sort_key,
            accept_new_clips: true,
            is_virtual: false,
            read_only: false,
            purge_policy: PurgePolicy::Never,
            overflow_collection_id: None,
        }
    }

    pub fn accepting(mut self, accept: bool) -> Self {
        self.accept_new_clips = accept;
        self
    }

    pub fn virtual_view(mut self) -> Self {
        self.is_virtual = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn with_policy(mut self, policy: PurgePolicy) -> Self {
        self.purge_policy = policy;
        self
    }

    pub fn with_overflow(mut self, overflow: impl Into<CollectionId>) -> Self {
        self.overflow_collection_id = Some(overflow.into());
        self
    }

    /// Virtual and read-only collections can never receive clips,
    /// neither from capture nor from overflow demotion.
    pub fn is_capture_eligible(&self) -> bool {
        !self.is_virtual && !self.read_only
    }

    pub fn accepts_captures(&self) -> bool {
        self.accept_new_clips && self.is_capture_eligible()
    }
}

mod id_macro;

use serde::{Deserialize, Serialize};

use id_macro::impl_id;

/// Identity of a captured clip.
///
/// Generated as a UUIDv7 so that the textual form sorts in creation order;
/// ties on capture time are broken by comparing ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClipId(String);

/// Identity of a collection. Assigned by configuration, so any string is valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(String);

impl_id!(ClipId, CollectionId, FolderId);

impl ClipId {
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::{CapturedPayload, ClipFormat, Fingerprint, SourceApplication};
use crate::ids::{ClipId, CollectionId, FolderId};

/// One captured clipboard snapshot.
///
/// A clip always belongs to exactly one collection. A clip whose
/// `deleted_at_ms` is set is logically in the Trashcan, whatever its
/// `collection_id` says.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub id: ClipId,
    pub captured_at_ms: i64,
    pub source_app: String,
    pub formats: Vec<ClipFormat>,
    pub fingerprint: Fingerprint,
    pub collection_id: CollectionId,
    pub folder_id: Option<FolderId>,
    pub deleted_at_ms: Option<i64>,
    /// Manual ordering key. Unique only by convention; ties fall back to id order.
    pub sort_key: f64,
    pub last_accessed_ms: Option<i64>,
    pub access_count: u32,
}

impl Clip {
    /// Build a fresh clip from a routed payload.
    pub fn capture(
        payload: CapturedPayload,
        source: &SourceApplication,
        collection_id: CollectionId,
        captured_at_ms: i64,
    ) -> Self {
        let fingerprint = payload.fingerprint();
        Self {
            id: ClipId::new(),
            captured_at_ms,
            source_app: source.process_name.clone(),
            formats: payload.into_formats(),
            fingerprint,
            collection_id,
            folder_id: None,
            deleted_at_ms: None,
            sort_key: captured_at_ms as f64,
            last_accessed_ms: None,
            access_count: 0,
        }
    }

    pub fn is_soft_deleted(&self) -> bool {
        self.deleted_at_ms.is_some()
    }

    pub fn total_size_bytes(&self) -> usize {
        self.formats.iter().map(ClipFormat::size_bytes).sum()
    }
}

/// Capture-time ordering: oldest first, ties broken by id.
pub fn capture_order(a: &Clip, b: &Clip) -> Ordering {
    a.captured_at_ms
        .cmp(&b.captured_at_ms)
        .then_with(|| a.id.cmp(&b.id))
}

use std::collections::HashMap;

use tracing::warn;

use super::{resolve_overflow, DemotionTarget};
use crate::clip::{capture_order, Clip};
use crate::collection::{Collection, PurgePolicy};
use crate::config::ConfigWarning;
use crate::ids::{ClipId, CollectionId};

pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrashReason {
    /// `KeepLast` excess with no overflow collection configured.
    Overflow,
    /// `KeepLast` excess whose overflow configuration is unusable.
    OverflowFallback,
    Age,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetentionAction {
    Demote { clip_id: ClipId, to: CollectionId },
    Trash { clip_id: ClipId, reason: TrashReason },
}

impl RetentionAction {
    pub fn clip_id(&self) -> &ClipId {
        match self {
            RetentionAction::Demote { clip_id, .. } | RetentionAction::Trash { clip_id, .. } => {
                clip_id
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionPlan {
    pub collection_id: CollectionId,
    /// Ordered oldest clip first.
    pub actions: Vec<RetentionAction>,
    pub warnings: Vec<ConfigWarning>,
}

impl RetentionPlan {
    fn empty(collection_id: CollectionId) -> Self {
        Self {
            collection_id,
            actions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Compute the retention actions for one collection.
///
/// `clips` are the collection's clips as seen by this pass; soft-deleted
/// entries are ignored. Virtual and read-only collections are never touched.
pub fn plan_retention(
    collection: &Collection,
    clips: &[Clip],
    collections: &[Collection],
    now_ms: i64,
) -> RetentionPlan {
    let mut plan = RetentionPlan::empty(collection.id.clone());
    if !collection.is_capture_eligible() {
        return plan;
    }

    let mut active: Vec<&Clip> = clips
        .iter()
        .filter(|c| !c.is_soft_deleted() && c.collection_id == collection.id)
        .collect();
    active.sort_by(|a, b| capture_order(a, b));

    match collection.purge_policy {
        PurgePolicy::Never => {}
        PurgePolicy::KeepLast { count } => {
            let excess = active.len().saturating_sub(count);
            if excess == 0 {
                return plan;
            }
            let index: HashMap<&CollectionId, &Collection> =
                collections.iter().map(|c| (&c.id, c)).collect();
            let resolution = resolve_overflow(collection, &index);
            let reason = match resolution.warning {
                Some(warning) => {
                    warn!(collection = %collection.id, %warning, "Overflow unusable, demoting to Trashcan");
                    plan.warnings.push(warning);
                    TrashReason::OverflowFallback
                }
                None => TrashReason::Overflow,
            };
            plan.actions = active
                .into_iter()
                .take(excess)
                .map(|clip| match &resolution.target {
                    DemotionTarget::Collection(to) => RetentionAction::Demote {
                        clip_id: clip.id.clone(),
                        to: to.clone(),
                    },
                    DemotionTarget::Trash => RetentionAction::Trash {
                        clip_id: clip.id.clone(),
                        reason,
                    },
                })
                .collect();
        }
        PurgePolicy::PurgeByAge { days } => {
            let cutoff = now_ms.saturating_sub(i64::from(days).saturating_mul(DAY_MS));
            plan.actions = active
                .into_iter()
                .filter(|clip| clip.captured_at_ms < cutoff)
                .map(|clip| RetentionAction::Trash {
                    clip_id: clip.id.clone(),
                    reason: TrashReason::Age,
                })
                .collect();
        }
    }

    plan
}

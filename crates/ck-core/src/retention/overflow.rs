use std::collections::{HashMap, HashSet};

use crate::collection::Collection;
use crate::config::ConfigWarning;
use crate::ids::CollectionId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemotionTarget {
    Collection(CollectionId),
    Trash,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverflowResolution {
    pub target: DemotionTarget,
    /// Set when the configured overflow could not be used.
    pub warning: Option<ConfigWarning>,
}

impl OverflowResolution {
    fn trash() -> Self {
        Self {
            target: DemotionTarget::Trash,
            warning: None,
        }
    }

    fn fallback(warning: ConfigWarning) -> Self {
        Self {
            target: DemotionTarget::Trash,
            warning: Some(warning),
        }
    }
}

/// Where excess clips of `collection` go.
///
/// The first hop of the overflow chain is the move target. It must exist and
/// be capture-eligible. The rest of the chain is walked with a visited set;
/// revisiting any collection means the configuration loops, and the excess
/// goes to the Trashcan instead.
pub fn resolve_overflow(
    collection: &Collection,
    index: &HashMap<&CollectionId, &Collection>,
) -> OverflowResolution {
    let Some(first_id) = collection.overflow_collection_id.as_ref() else {
        return OverflowResolution::trash();
    };

    let Some(first) = index.get(first_id).copied() else {
        return OverflowResolution::fallback(ConfigWarning::UnknownOverflow {
            collection: collection.id.clone(),
            overflow: first_id.clone(),
        });
    };

    if !first.is_capture_eligible() {
        return OverflowResolution::fallback(ConfigWarning::IneligibleOverflow {
            collection: collection.id.clone(),
            overflow: first_id.clone(),
        });
    }

    let mut visited: HashSet<&CollectionId> = HashSet::new();
    visited.insert(&collection.id);
    let mut current = first;
    loop {
        if !visited.insert(&current.id) {
            return OverflowResolution::fallback(ConfigWarning::OverflowCycle {
                collection: collection.id.clone(),
            });
        }
        // A dangling reference further down is that collection's own problem.
        match current
            .overflow_collection_id
            .as_ref()
            .and_then(|next| index.get(next).copied())
        {
            Some(next) => current = next,
            None => break,
        }
    }

    OverflowResolution {
        target: DemotionTarget::Collection(first.id.clone()),
        warning: None,
    }
}

use std::collections::{HashMap, HashSet};

use crate::collection::Collection;
use crate::config::ConfigWarning;
use crate::ids::CollectionId;
use crate::retention::{resolve_overflow, DemotionTarget};

/// Report configuration inconsistencies in a collection set.
///
/// Nothing here is fatal: the router and the retention enforcer re-check the
/// same conditions at the point of use and fall back safely.
pub fn validate_collections(collections: &[Collection]) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    let mut seen: HashSet<&CollectionId> = HashSet::new();
    for collection in collections {
        if !seen.insert(&collection.id) {
            warnings.push(ConfigWarning::DuplicateCollectionId {
                collection: collection.id.clone(),
            });
        }
    }

    let index: HashMap<&CollectionId, &Collection> =
        collections.iter().map(|c| (&c.id, c)).collect();
    for collection in collections {
        if collection.overflow_collection_id.is_none() {
            continue;
        }
        let resolution = resolve_overflow(collection, &index);
        if let Some(warning) = resolution.warning {
            warnings.push(warning);
        } else {
            debug_assert!(matches!(resolution.target, DemotionTarget::Collection(_)));
        }
    }

    warnings
}

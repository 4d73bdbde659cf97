use thiserror::Error;

use crate::ids::CollectionId;

/// Configuration inconsistency detected at the point of use.
///
/// Warnings never abort a pass; the affected rule or policy is skipped or
/// falls back to the Trashcan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigWarning {
    #[error("collection id {collection} is defined more than once")]
    DuplicateCollectionId { collection: CollectionId },

    #[error("collection {collection} overflows into unknown collection {overflow}")]
    UnknownOverflow {
        collection: CollectionId,
        overflow: CollectionId,
    },

    #[error("collection {collection} overflows into virtual or read-only collection {overflow}")]
    IneligibleOverflow {
        collection: CollectionId,
        overflow: CollectionId,
    },

    #[error("overflow chain starting at {collection} loops back on itself")]
    OverflowCycle { collection: CollectionId },

    #[error("application filter #{index} is malformed: {reason}")]
    MalformedFilter { index: usize, reason: String },
}

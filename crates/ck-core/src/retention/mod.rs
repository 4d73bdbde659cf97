//! Retention planning.
//!
//! Planning is pure: given one collection, its active clips and the full
//! collection set, compute which clips must move or be trashed. Applying a
//! plan is the job of the enforcement use case in `ck-app`.
mod overflow;
mod plan;

pub use overflow::{resolve_overflow, DemotionTarget, OverflowResolution};
pub use plan::{plan_retention, RetentionAction, RetentionPlan, TrashReason, DAY_MS};

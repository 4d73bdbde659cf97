//! Collections and bounce-tracking routing.
mod model;
mod router;
mod validation;

pub use model::{Collection, PurgePolicy};
pub use router::{route, DropReason, RouteDecision};
pub use validation::validate_collections;

pub use crate::config::ConfigWarning;

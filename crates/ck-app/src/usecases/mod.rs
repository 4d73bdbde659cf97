mod capture_clip;
mod enforce_retention;
mod purge_trash;
mod register_pending_echo;
mod restore_clip;

pub use capture_clip::CaptureClipUseCase;
pub use enforce_retention::{EnforceRetentionUseCase, RetentionReport, RetentionScope};
pub use purge_trash::{PurgeError, PurgeReport, PurgeTrashUseCase};
pub use register_pending_echo::RegisterPendingEchoUseCase;
pub use restore_clip::RestoreClipUseCase;

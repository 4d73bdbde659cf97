use thiserror::Error;

use ck_core::ClipId;

/// Errors raised by clip store adapters. Returned wrapped in `anyhow::Error`
/// and can be recovered with `downcast_ref`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("clip {0} not found")]
    ClipNotFound(ClipId),
    #[error("clip {0} already exists")]
    DuplicateClip(ClipId),
}

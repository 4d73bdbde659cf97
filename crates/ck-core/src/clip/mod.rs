//! Clip domain models.
//!
//! A capture starts as a [`RawCaptureEvent`] (whatever the platform adapter
//! could read), is narrowed by the [`normalizer`] into a [`CapturedPayload`],
//! and becomes a persisted [`Clip`] once it has been routed.
mod fingerprint;
mod format;
mod model;
pub mod normalizer;
mod payload;

pub use fingerprint::Fingerprint;
pub use format::{ClipFormat, FormatKind};
pub use model::{capture_order, Clip};
pub use normalizer::{normalize, DEFAULT_MAX_FORMAT_BYTES};
pub use payload::{CapturedPayload, RawCaptureEvent, SourceApplication};

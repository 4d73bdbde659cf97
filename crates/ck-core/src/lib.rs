//! # ck-core
//!
//! Core domain models and capture/retention policies for ClipKeep.
//!
//! This crate contains pure business logic without any infrastructure dependencies.
//! Everything that touches the OS clipboard, the database or the clock is reached
//! through the traits in [`ports`].

// Public module exports
pub mod capture;
pub mod clip;
pub mod collection;
pub mod config;
pub mod filter;
pub mod ids;
pub mod ports;
pub mod retention;

// Re-export commonly used types at the crate root
pub use capture::{CaptureError, CaptureOutcome, ClipboardChangeSignal, ClipboardReadError};
pub use clip::{
    CapturedPayload, Clip, ClipFormat, Fingerprint, FormatKind, RawCaptureEvent,
    SourceApplication,
};
pub use collection::{Collection, ConfigWarning, DropReason, PurgePolicy, RouteDecision};
pub use config::EngineConfig;
pub use filter::{ApplicationFilter, SourceFilter};
pub use ids::{ClipId, CollectionId, FolderId};

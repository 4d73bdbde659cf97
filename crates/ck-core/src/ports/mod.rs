//! Port interfaces for the application layer
//!
//! Ports define the contract between the capture/retention use cases and the
//! adapters in `ck-infra` and `ck-platform`. Clipboard access is synchronous
//! (the OS APIs block and are driven from `spawn_blocking`); everything else
//! is async.

mod capture_sink;
mod clip_store;
mod clipboard_source;
mod clipboard_writer;
mod clock;
mod echo_registry;

pub use capture_sink::CaptureEventSinkPort;
pub use clip_store::{ClipQuery, ClipStorePort};
pub use clipboard_source::ClipboardSourcePort;
pub use clipboard_writer::ClipboardWriterPort;
pub use clock::*;
pub use echo_registry::EchoRegistryPort;

//! # ck-platform
//!
//! Operating-system clipboard adapters for ClipKeep.
//!
//! The listener only forwards change signals; reading, writing and owner
//! lookup are exposed through the synchronous clipboard ports of `ck-core`
//! and are driven from `spawn_blocking` by the application layer.

pub mod clipboard;
pub mod owner;
pub mod runtime;

pub use clipboard::LocalClipboard;
pub use runtime::{start_listener, ListenerHandle};

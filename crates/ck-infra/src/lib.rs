pub mod clipboard;
pub mod db;
pub mod observability;
pub mod store;
pub mod time;

pub use clipboard::InMemoryEchoRegistry;
pub use observability::TracingCaptureSink;
pub use store::{InMemoryClipStore, StoreError};
pub use time::SystemClock;

mod error;
mod in_memory;

pub use error::StoreError;
pub use in_memory::InMemoryClipStore;

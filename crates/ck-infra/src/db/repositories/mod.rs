mod clip_store_repo;

pub use clip_store_repo::{DieselClipStore, SqliteClipStore};

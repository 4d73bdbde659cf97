pub mod clip_format_row;
pub mod clip_row;
pub mod collection_row;

pub use clip_format_row::ClipFormatRow;
pub use clip_row::{ClipRow, NewClipRows};
pub use collection_row::CollectionRow;

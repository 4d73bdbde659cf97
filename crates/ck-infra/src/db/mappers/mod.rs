pub mod clip_mapper;
pub mod collection_mapper;

pub use clip_mapper::ClipRowMapper;
pub use collection_mapper::CollectionRowMapper;

//! # Engine configuration / 引擎配置
//!
//! Data transfer objects only. Loading the file and resolving paths happens in
//! the bootstrap layer, which also parses the file; this module only names the
//! typed sections and the defaults the engine falls back to.

mod engine;
mod warning;

pub use engine::{CaptureConfig, EngineConfig, RetentionConfig};
pub use warning::ConfigWarning;

//! Source filter: decides whether a clipboard change should be captured based
//! on the window/process that owns the clipboard.
mod pattern;
mod rule;

pub use pattern::Pattern;
pub use rule::{ApplicationFilter, SourceFilter};

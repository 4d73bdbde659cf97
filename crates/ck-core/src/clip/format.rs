use serde::{Deserialize, Serialize};
use std::fmt;

const OTHER_PREFIX: &str = "other:";

/// Closed set of clipboard formats the engine understands.
///
/// Formats the platform registers under arbitrary names are preserved
/// opaquely as [`FormatKind::OtherRegistered`] instead of being dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatKind {
    Text,
    RichText,
    Html,
    Bitmap,
    FileList,
    OtherRegistered(String),
}

impl FormatKind {
    /// Stable storage key, e.g. `"rich_text"` or `"other:com.example.custom"`.
    pub fn storage_key(&self) -> String {
        match self {
            FormatKind::Text => "text".to_string(),
            FormatKind::RichText => "rich_text".to_string(),
            FormatKind::Html => "html".to_string(),
            FormatKind::Bitmap => "bitmap".to_string(),
            FormatKind::FileList => "file_list".to_string(),
            FormatKind::OtherRegistered(name) => format!("{OTHER_PREFIX}{name}"),
        }
    }

    pub fn from_storage_key(key: &str) -> Self {
        match key {
            "text" => FormatKind::Text,
            "rich_text" => FormatKind::RichText,
            "html" => FormatKind::Html,
            "bitmap" => FormatKind::Bitmap,
            "file_list" => FormatKind::FileList,
            other => FormatKind::OtherRegistered(
                other.strip_prefix(OTHER_PREFIX).unwrap_or(other).to_string(),
            ),
        }
    }

    pub fn is_text_channel(&self) -> bool {
        matches!(
            self,
            FormatKind::Text | FormatKind::RichText | FormatKind::Html
        )
    }

    /// Rank used when picking the representation shown to the user.
    /// Lower is preferred.
    pub(crate) fn display_rank(&self) -> u8 {
        match self {
            FormatKind::RichText => 0,
            FormatKind::Text => 1,
            FormatKind::Html => 2,
            FormatKind::FileList => 3,
            FormatKind::Bitmap => 4,
            FormatKind::OtherRegistered(_) => 5,
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}

/// One `(FormatKind, bytes)` payload of a clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipFormat {
    pub kind: FormatKind,
    pub bytes: Vec<u8>,
}

impl ClipFormat {
    pub fn new(kind: FormatKind, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            bytes: bytes.into(),
        }
    }

    pub fn text(text: &str) -> Self {
        Self::new(FormatKind::Text, text.as_bytes())
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

use anyhow::{anyhow, Result};
use clipboard_rs::common::RustImage;
use clipboard_rs::{ClipboardContent, ContentFormat, RustImageData};

use ck_core::{ClipFormat, ClipboardReadError, FormatKind};

/// Native format names that clipboard-rs already surfaces through one of the
/// well-known kinds. Anything else is kept as an opaque registered format.
const STANDARD_FORMAT_NAMES: &[&str] = &[
    // Windows
    "CF_TEXT",
    "CF_OEMTEXT",
    "CF_UNICODETEXT",
    "CF_LOCALE",
    "CF_BITMAP",
    "CF_DIB",
    "CF_DIBV5",
    "CF_HDROP",
    "HTML Format",
    "Rich Text Format",
    "PNG",
    // macOS
    "public.utf8-plain-text",
    "public.utf16-external-plain-text",
    "public.html",
    "public.rtf",
    "public.png",
    "public.tiff",
    "public.file-url",
    "NSStringPboardType",
    "NSFilenamesPboardType",
    // X11 / Wayland
    "TARGETS",
    "TIMESTAMP",
    "MULTIPLE",
    "SAVE_TARGETS",
    "UTF8_STRING",
    "STRING",
    "TEXT",
    "COMPOUND_TEXT",
    "text/plain",
    "text/plain;charset=utf-8",
    "text/html",
    "text/rtf",
    "text/richtext",
    "text/uri-list",
    "image/png",
];

pub fn is_standard_format_name(name: &str) -> bool {
    STANDARD_FORMAT_NAMES
        .iter()
        .any(|standard| standard.eq_ignore_ascii_case(name))
}

/// Map a clipboard-rs error message to a read error.
///
/// clipboard-rs only exposes boxed errors, so contention is recognised by
/// the wording the platform backends use when another process holds the
/// clipboard open.
pub fn classify_error(message: &str) -> ClipboardReadError {
    let lower = message.to_ascii_lowercase();
    let busy = ["busy", "locked", "openclipboard", "access is denied", "failed to open"]
        .iter()
        .any(|needle| lower.contains(needle));
    if busy {
        ClipboardReadError::Busy
    } else {
        ClipboardReadError::Platform(message.to_string())
    }
}

pub(super) fn content_format(kind: &FormatKind) -> ContentFormat {
    match kind {
        FormatKind::Text => ContentFormat::Text,
        FormatKind::RichText => ContentFormat::Rtf,
        FormatKind::Html => ContentFormat::Html,
        FormatKind::Bitmap => ContentFormat::Image,
        FormatKind::FileList => ContentFormat::Files,
        FormatKind::OtherRegistered(name) => ContentFormat::Other(name.clone()),
    }
}

/// Well-known kinds in the order they are probed.
pub(super) const WELL_KNOWN: [FormatKind; 5] = [
    FormatKind::Text,
    FormatKind::RichText,
    FormatKind::Html,
    FormatKind::Bitmap,
    FormatKind::FileList,
];

/// File lists are stored as newline-separated paths; bitmaps as PNG.
pub(super) fn to_content(format: &ClipFormat) -> Result<ClipboardContent> {
    let utf8 = |bytes: &[u8]| {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| anyhow!("{} payload is not valid UTF-8: {}", format.kind, e))
    };
    let content = match &format.kind {
        FormatKind::Text => ClipboardContent::Text(utf8(&format.bytes)?),
        FormatKind::RichText => ClipboardContent::Rtf(utf8(&format.bytes)?),
        FormatKind::Html => ClipboardContent::Html(utf8(&format.bytes)?),
        FormatKind::FileList => ClipboardContent::Files(
            utf8(&format.bytes)?
                .lines()
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        FormatKind::Bitmap => ClipboardContent::Image(
            RustImageData::from_bytes(&format.bytes)
                .map_err(|e| anyhow!("failed to decode bitmap: {}", e))?,
        ),
        FormatKind::OtherRegistered(name) => {
            ClipboardContent::Other(name.clone(), format.bytes.clone())
        }
    };
    Ok(content)
}

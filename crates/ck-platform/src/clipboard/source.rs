use clipboard_rs::common::RustImage;
use clipboard_rs::{Clipboard, ClipboardContext};
use tracing::trace;

use ck_core::ports::ClipboardSourcePort;
use ck_core::{ClipboardReadError, FormatKind, SourceApplication};

use super::formats::{classify_error, content_format, is_standard_format_name, WELL_KNOWN};
use super::LocalClipboard;
use crate::owner;

fn platform_err(e: impl std::fmt::Display) -> ClipboardReadError {
    classify_error(&e.to_string())
}

impl ClipboardSourcePort for LocalClipboard {
    fn current_owner(&self) -> SourceApplication {
        owner::clipboard_owner()
    }

    fn enumerate_formats(&self) -> Result<Vec<FormatKind>, ClipboardReadError> {
        let mut ctx = self
            .context()
            .map_err(|e| ClipboardReadError::Platform(e.to_string()))?;
        enumerate(&mut ctx)
    }

    fn read_format(&self, kind: &FormatKind) -> Result<Vec<u8>, ClipboardReadError> {
        let mut ctx = self
            .context()
            .map_err(|e| ClipboardReadError::Platform(e.to_string()))?;
        read(&mut ctx, kind)
    }
}

fn enumerate(ctx: &mut ClipboardContext) -> Result<Vec<FormatKind>, ClipboardReadError> {
    let available = ctx.available_formats().map_err(platform_err)?;

    let mut kinds: Vec<FormatKind> = WELL_KNOWN
        .iter()
        .filter(|kind| ctx.has(content_format(kind)))
        .cloned()
        .collect();

    for name in available {
        if is_standard_format_name(&name) {
            continue;
        }
        let kind = FormatKind::OtherRegistered(name);
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }

    trace!(formats = kinds.len(), "Enumerated clipboard formats");
    Ok(kinds)
}

fn read(ctx: &mut ClipboardContext, kind: &FormatKind) -> Result<Vec<u8>, ClipboardReadError> {
    // The owner may have replaced the content since enumeration.
    if !ctx.has(content_format(kind)) {
        return Err(ClipboardReadError::FormatUnavailable(kind.clone()));
    }

    let bytes = match kind {
        FormatKind::Text => ctx.get_text().map(String::into_bytes),
        FormatKind::RichText => ctx.get_rich_text().map(String::into_bytes),
        FormatKind::Html => ctx.get_html().map(String::into_bytes),
        FormatKind::FileList => ctx.get_files().map(|files| files.join("\n").into_bytes()),
        FormatKind::Bitmap => ctx
            .get_image()
            .and_then(|image| image.to_png())
            .map(|png| png.get_bytes().to_vec()),
        FormatKind::OtherRegistered(name) => ctx.get_buffer(name),
    };
    bytes.map_err(platform_err)
}

//! Format normalizer.
//!
//! Keeps every supported format that is present, dropping only the
//! individual formats that are empty or exceed the per-format ceiling.

use tracing::warn;

use super::{CapturedPayload, ClipFormat, RawCaptureEvent};

/// Per-format ceiling used when configuration does not override it.
pub const DEFAULT_MAX_FORMAT_BYTES: usize = 64 * 1024 * 1024;

/// Narrow a raw capture into a [`CapturedPayload`].
///
/// Returns `None` when nothing usable is left.
pub fn normalize(raw: &RawCaptureEvent, max_format_bytes: usize) -> Option<CapturedPayload> {
    let mut kept: Vec<ClipFormat> = Vec::with_capacity(raw.formats.len());

    for format in &raw.formats {
        if format.bytes.is_empty() {
            continue;
        }
        if format.size_bytes() > max_format_bytes {
            warn!(
                sequence = raw.sequence,
                format = %format.kind,
                size_bytes = format.size_bytes(),
                max_format_bytes,
                "Dropping clipboard format above size ceiling"
            );
            continue;
        }
        if kept.iter().any(|k| k.kind == format.kind) {
            continue;
        }
        kept.push(format.clone());
    }

    if kept.is_empty() {
        return None;
    }
    Some(CapturedPayload::from_formats(kept))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::{FormatKind, SourceApplication};

    fn raw(formats: Vec<ClipFormat>) -> RawCaptureEvent {
        RawCaptureEvent {
            sequence: 7,
            observed_at_ms: 0,
            source: SourceApplication::unknown(),
            formats,
        }
    }

    #[test]
    fn keeps_every_supported_format() {
        let payload = normalize(
            &raw(vec![
                ClipFormat::text("hi"),
                ClipFormat::new(FormatKind::Html, "<p>hi</p>"),
                ClipFormat::new(FormatKind::Bitmap, vec![1, 2, 3]),
                ClipFormat::new(FormatKind::OtherRegistered("x-custom".into()), vec![9]),
            ]),
            DEFAULT_MAX_FORMAT_BYTES,
        )
        .unwrap();
        assert_eq!(payload.formats().len(), 4);
        assert!(payload
            .get(&FormatKind::OtherRegistered("x-custom".into()))
            .is_some());
    }

    #[test]
    fn rich_text_wins_display_over_plain_text() {
        let payload = normalize(
            &raw(vec![
                ClipFormat::text("hi"),
                ClipFormat::new(FormatKind::RichText, "{\\rtf1 hi}"),
            ]),
            DEFAULT_MAX_FORMAT_BYTES,
        )
        .unwrap();
        assert_eq!(payload.display_kind(), Some(&FormatKind::RichText));
    }

    #[test]
    fn oversized_format_is_dropped_but_capture_survives() {
        let payload = normalize(
            &raw(vec![
                ClipFormat::new(FormatKind::Bitmap, vec![0u8; 32]),
                ClipFormat::text("small"),
            ]),
            16,
        )
        .unwrap();
        assert_eq!(payload.formats().len(), 1);
        assert_eq!(payload.formats()[0].kind, FormatKind::Text);
    }

    #[test]
    fn all_empty_or_oversized_yields_none() {
        assert!(normalize(&raw(vec![]), 16).is_none());
        assert!(normalize(&raw(vec![ClipFormat::text("")]), 16).is_none());
        assert!(normalize(&raw(vec![ClipFormat::new(FormatKind::Bitmap, vec![0u8; 17])]), 16)
            .is_none());
    }

    #[test]
    fn duplicate_kinds_keep_first_occurrence() {
        let payload = normalize(
            &raw(vec![ClipFormat::text("first"), ClipFormat::text("second")]),
            DEFAULT_MAX_FORMAT_BYTES,
        )
        .unwrap();
        assert_eq!(payload.formats(), &[ClipFormat::text("first")]);
    }
}

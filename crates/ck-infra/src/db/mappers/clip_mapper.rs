use anyhow::{Context, Result};

use crate::db::models::{ClipFormatRow, ClipRow, NewClipRows};
use crate::db::ports::{InsertMapper, RowMapper};
use ck_core::{Clip, ClipFormat, ClipId, Fingerprint, FormatKind};

pub struct ClipRowMapper;

impl InsertMapper<Clip, NewClipRows> for ClipRowMapper {
    fn to_row(&self, domain: &Clip) -> Result<NewClipRows> {
        let formats = domain
            .formats
            .iter()
            .enumerate()
            .map(|(position, format)| -> Result<ClipFormatRow> {
                Ok(ClipFormatRow {
                    clip_id: domain.id.to_string(),
                    format_kind: format.kind.storage_key(),
                    position: i32::try_from(position)?,
                    bytes: format.bytes.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(NewClipRows {
            clip: ClipRow {
                id: domain.id.to_string(),
                captured_at_ms: domain.captured_at_ms,
                source_app: domain.source_app.clone(),
                fingerprint: domain.fingerprint.to_hex(),
                collection_id: domain.collection_id.to_string(),
                folder_id: domain.folder_id.as_ref().map(|f| f.to_string()),
                deleted_at_ms: domain.deleted_at_ms,
                sort_key: domain.sort_key,
                last_accessed_ms: domain.last_accessed_ms,
                access_count: i32::try_from(domain.access_count)
                    .context("access_count does not fit the column")?,
            },
            formats,
        })
    }
}

/// Format rows must already be in `position` order.
impl RowMapper<(ClipRow, Vec<ClipFormatRow>), Clip> for ClipRowMapper {
    fn to_domain(&self, row: &(ClipRow, Vec<ClipFormatRow>)) -> Result<Clip> {
        let (clip, formats) = row;
        Ok(Clip {
            id: ClipId::from_string(clip.id.clone()),
            captured_at_ms: clip.captured_at_ms,
            source_app: clip.source_app.clone(),
            formats: formats
                .iter()
                .map(|f| ClipFormat::new(FormatKind::from_storage_key(&f.format_kind), f.bytes.clone()))
                .collect(),
            fingerprint: Fingerprint::from_hex(&clip.fingerprint)
                .with_context(|| format!("corrupt fingerprint for clip {}", clip.id))?,
            collection_id: clip.collection_id.clone().into(),
            folder_id: clip.folder_id.clone().map(Into::into),
            deleted_at_ms: clip.deleted_at_ms,
            sort_key: clip.sort_key,
            last_accessed_ms: clip.last_accessed_ms,
            access_count: u32::try_from(clip.access_count).unwrap_or(0),
        })
    }
}

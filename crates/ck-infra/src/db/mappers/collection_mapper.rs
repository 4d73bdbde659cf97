use anyhow::{Context, Result};

use crate::db::models::CollectionRow;
use crate::db::ports::{InsertMapper, RowMapper};
use ck_core::{Collection, PurgePolicy};

pub struct CollectionRowMapper;

impl InsertMapper<Collection, CollectionRow> for CollectionRowMapper {
    fn to_row(&self, domain: &Collection) -> Result<CollectionRow> {
        Ok(CollectionRow {
            id: domain.id.to_string(),
            name: domain.name.clone(),
            sort_key: domain.sort_key,
            accept_new_clips: domain.accept_new_clips,
            is_virtual: domain.is_virtual,
            read_only: domain.read_only,
            purge_policy: serde_json::to_string(&domain.purge_policy)?,
            overflow_collection_id: domain.overflow_collection_id.as_ref().map(|c| c.to_string()),
        })
    }
}

impl RowMapper<CollectionRow, Collection> for CollectionRowMapper {
    fn to_domain(&self, row: &CollectionRow) -> Result<Collection> {
        let purge_policy: PurgePolicy = serde_json::from_str(&row.purge_policy)
            .with_context(|| format!("invalid purge policy for collection {}", row.id))?;
        Ok(Collection {
            id: row.id.clone().into(),
            name: row.name.clone(),
            sort_key: row.sort_key,
            accept_new_clips: row.accept_new_clips,
            is_virtual: row.is_virtual,
            read_only: row.read_only,
            purge_policy,
            overflow_collection_id: row.overflow_collection_id.clone().map(Into::into),
        })
    }
}

use diesel::prelude::*;

use super::ClipFormatRow;
use crate::db::schema::clips;

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = clips)]
pub struct ClipRow {
    pub id: String,
    pub captured_at_ms: i64,
    pub source_app: String,
    pub fingerprint: String,
    pub collection_id: String,
    pub folder_id: Option<String>,
    pub deleted_at_ms: Option<i64>,
    pub sort_key: f64,
    pub last_accessed_ms: Option<i64>,
    pub access_count: i32,
}

/// A clip row together with its format rows, written in one transaction.
#[derive(Debug, Clone)]
pub struct NewClipRows {
    pub clip: ClipRow,
    pub formats: Vec<ClipFormatRow>,
}

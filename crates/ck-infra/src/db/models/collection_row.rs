use diesel::prelude::*;

use crate::db::schema::collections;

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = collections)]
pub struct CollectionRow {
    pub id: String,
    pub name: String,
    pub sort_key: i64,
    pub accept_new_clips: bool,
    pub is_virtual: bool,
    pub read_only: bool,
    /// JSON encoded `PurgePolicy`.
    pub purge_policy: String,
    pub overflow_collection_id: Option<String>,
}

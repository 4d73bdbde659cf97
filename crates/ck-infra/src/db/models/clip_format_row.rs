use diesel::prelude::*;

use crate::db::schema::clip_formats;

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = clip_formats)]
pub struct ClipFormatRow {
    pub clip_id: String,
    pub format_kind: String,
    /// Order in which the source enumerated the format.
    pub position: i32,
    pub bytes: Vec<u8>,
}

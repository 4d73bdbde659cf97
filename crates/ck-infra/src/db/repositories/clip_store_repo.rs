use std::collections::HashMap;

use anyhow::Result;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use tracing::debug_span;

use crate::db::executor::DieselSqliteExecutor;
use crate::db::mappers::{ClipRowMapper, CollectionRowMapper};
use crate::db::models::{ClipFormatRow, ClipRow, CollectionRow, NewClipRows};
use crate::db::pool::DbPool;
use crate::db::ports::{DbExecutor, InsertMapper, RowMapper};
use crate::db::schema::{clip_formats, clips, collections};
use crate::store::StoreError;
use ck_core::ports::{ClipQuery, ClipStorePort};
use ck_core::{Clip, ClipId, Collection, CollectionId, Fingerprint};

pub struct DieselClipStore<E, MC, MK> {
    executor: E,
    clip_mapper: MC,
    collection_mapper: MK,
}

/// The store as wired in production.
pub type SqliteClipStore = DieselClipStore<DieselSqliteExecutor, ClipRowMapper, CollectionRowMapper>;

impl<E, MC, MK> DieselClipStore<E, MC, MK> {
    pub fn new(executor: E, clip_mapper: MC, collection_mapper: MK) -> Self {
        Self {
            executor,
            clip_mapper,
            collection_mapper,
        }
    }
}

impl SqliteClipStore {
    pub fn from_pool(pool: DbPool) -> Self {
        Self::new(
            DieselSqliteExecutor::new(pool),
            ClipRowMapper,
            CollectionRowMapper,
        )
    }
}

fn load_formats(
    conn: &mut SqliteConnection,
    clip_ids: &[String],
) -> QueryResult<HashMap<String, Vec<ClipFormatRow>>> {
    let rows = clip_formats::table
        .filter(clip_formats::clip_id.eq_any(clip_ids))
        .order((clip_formats::clip_id.asc(), clip_formats::position.asc()))
        .load::<ClipFormatRow>(conn)?;

    let mut grouped: HashMap<String, Vec<ClipFormatRow>> = HashMap::new();
    for row in rows {
        grouped.entry(row.clip_id.clone()).or_default().push(row);
    }
    Ok(grouped)
}

impl<E, MC, MK> DieselClipStore<E, MC, MK>
where
    MC: RowMapper<(ClipRow, Vec<ClipFormatRow>), Clip>,
{
    /// Attach format rows to clip rows, keeping the order of `rows`.
    fn hydrate(&self, conn: &mut SqliteConnection, rows: Vec<ClipRow>) -> Result<Vec<Clip>> {
        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let mut formats = load_formats(conn, &ids)?;
        rows.into_iter()
            .map(|row| {
                let clip_formats = formats.remove(&row.id).unwrap_or_default();
                self.clip_mapper.to_domain(&(row, clip_formats))
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl<E, MC, MK> ClipStorePort for DieselClipStore<E, MC, MK>
where
    E: DbExecutor,
    MC: InsertMapper<Clip, NewClipRows> + RowMapper<(ClipRow, Vec<ClipFormatRow>), Clip>,
    MK: InsertMapper<Collection, CollectionRow> + RowMapper<CollectionRow, Collection>,
{
    async fn insert_clip(&self, clip: &Clip) -> Result<()> {
        let span = debug_span!(
            "infra.sqlite.insert_clip",
            table = "clips",
            clip_id = %clip.id,
            collection_id = %clip.collection_id,
        );
        let _enter = span.enter();

        let rows = self.clip_mapper.to_row(clip)?;
        self.executor.run_in_transaction(|conn| {
            diesel::insert_into(clips::table)
                .values(&rows.clip)
                .execute(conn)?;

            for format in &rows.formats {
                diesel::insert_into(clip_formats::table)
                    .values(format)
                    .execute(conn)?;
            }

            Ok(())
        })
    }

    async fn reassign_collection(&self, clip_id: &ClipId, to: &CollectionId) -> Result<()> {
        let span = debug_span!(
            "infra.sqlite.reassign_collection",
            clip_id = %clip_id,
            to = %to,
        );
        let _enter = span.enter();

        self.executor.run(|conn| {
            let updated = diesel::update(clips::table.filter(clips::id.eq(clip_id.as_str())))
                .set(clips::collection_id.eq(to.as_str()))
                .execute(conn)?;
            if updated == 0 {
                return Err(StoreError::ClipNotFound(clip_id.clone()).into());
            }
            Ok(())
        })
    }

    async fn soft_delete(&self, clip_id: &ClipId, deleted_at_ms: i64) -> Result<()> {
        self.executor.run_in_transaction(|conn| {
            let current = clips::table
                .filter(clips::id.eq(clip_id.as_str()))
                .select(clips::deleted_at_ms)
                .first::<Option<i64>>(conn)
                .optional()?;

            match current {
                None => Err(StoreError::ClipNotFound(clip_id.clone()).into()),
                // Keep the original deletion time so the trash window is not extended.
                Some(Some(_)) => Ok(()),
                Some(None) => {
                    diesel::update(clips::table.filter(clips::id.eq(clip_id.as_str())))
                        .set(clips::deleted_at_ms.eq(Some(deleted_at_ms)))
                        .execute(conn)?;
                    Ok(())
                }
            }
        })
    }

    async fn permanently_erase(&self, clip_id: &ClipId) -> Result<bool> {
        let span = debug_span!("infra.sqlite.permanently_erase", clip_id = %clip_id);
        let _enter = span.enter();

        self.executor.run_in_transaction(|conn| {
            diesel::delete(clip_formats::table.filter(clip_formats::clip_id.eq(clip_id.as_str())))
                .execute(conn)?;
            let erased = diesel::delete(clips::table.filter(clips::id.eq(clip_id.as_str())))
                .execute(conn)?;
            Ok(erased > 0)
        })
    }

    async fn query_by_scope(
        &self,
        collection_id: &CollectionId,
        query: ClipQuery,
    ) -> Result<Vec<Clip>> {
        self.executor.run(|conn| {
            let mut statement: clips::BoxedQuery<'_, Sqlite> = clips::table
                .filter(clips::collection_id.eq(collection_id.as_str()))
                .into_boxed();
            if !query.include_deleted {
                statement = statement.filter(clips::deleted_at_ms.is_null());
            }
            statement = if query.newest_first {
                statement.order((clips::captured_at_ms.desc(), clips::id.desc()))
            } else {
                statement.order((clips::captured_at_ms.asc(), clips::id.asc()))
            };
            if let Some(limit) = query.limit {
                statement = statement.limit(i64::try_from(limit)?);
            }

            let rows = statement.load::<ClipRow>(conn)?;
            self.hydrate(conn, rows)
        })
    }

    async fn list_collections(&self) -> Result<Vec<Collection>> {
        self.executor.run(|conn| {
            let rows = collections::table
                .order((collections::sort_key.asc(), collections::id.asc()))
                .load::<CollectionRow>(conn)?;

            rows.iter()
                .map(|row| self.collection_mapper.to_domain(row))
                .collect()
        })
    }

    async fn save_collection(&self, collection: &Collection) -> Result<()> {
        let row = self.collection_mapper.to_row(collection)?;
        self.executor.run(|conn| {
            diesel::replace_into(collections::table)
                .values(&row)
                .execute(conn)?;
            Ok(())
        })
    }

    async fn replace_collections(&self, collections: &[Collection]) -> Result<()> {
        let span = debug_span!(
            "infra.sqlite.replace_collections",
            table = "collections",
            count = collections.len(),
        );
        let _enter = span.enter();

        let rows = collections
            .iter()
            .map(|c| self.collection_mapper.to_row(c))
            .collect::<Result<Vec<CollectionRow>>>()?;
        self.executor.run_in_transaction(|conn| {
            diesel::delete(collections::table).execute(conn)?;
            for row in &rows {
                diesel::replace_into(collections::table)
                    .values(row)
                    .execute(conn)?;
            }
            Ok(())
        })
    }

    async fn most_recent_fingerprint(&self, scope: &CollectionId) -> Result<Option<Fingerprint>> {
        self.executor.run(|conn| {
            let hex = clips::table
                .filter(clips::collection_id.eq(scope.as_str()))
                .filter(clips::deleted_at_ms.is_null())
                .order((clips::captured_at_ms.desc(), clips::id.desc()))
                .select(clips::fingerprint)
                .first::<String>(conn)
                .optional()?;

            hex.map(|hex| Fingerprint::from_hex(&hex)).transpose()
        })
    }

    async fn get_clip(&self, clip_id: &ClipId) -> Result<Option<Clip>> {
        self.executor.run(|conn| {
            let row = clips::table
                .filter(clips::id.eq(clip_id.as_str()))
                .first::<ClipRow>(conn)
                .optional()?;

            match row {
                Some(row) => Ok(self.hydrate(conn, vec![row])?.pop()),
                None => Ok(None),
            }
        })
    }

    async fn touch_clip(&self, clip_id: &ClipId, accessed_at_ms: i64) -> Result<()> {
        self.executor.run(|conn| {
            let updated = diesel::update(clips::table.filter(clips::id.eq(clip_id.as_str())))
                .set((
                    clips::last_accessed_ms.eq(Some(accessed_at_ms)),
                    clips::access_count.eq(clips::access_count + 1),
                ))
                .execute(conn)?;
            if updated == 0 {
                return Err(StoreError::ClipNotFound(clip_id.clone()).into());
            }
            Ok(())
        })
    }

    async fn query_trash(&self, deleted_before_ms: i64) -> Result<Vec<ClipId>> {
        self.executor.run(|conn| {
            let ids = clips::table
                .filter(clips::deleted_at_ms.lt(deleted_before_ms))
                .order((clips::captured_at_ms.asc(), clips::id.asc()))
                .select(clips::id)
                .load::<String>(conn)?;

            Ok(ids.into_iter().map(ClipId::from_string).collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::init_db_pool;
    use ck_core::{ClipFormat, FormatKind, PurgePolicy};
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        store: SqliteClipStore,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("clips.db");
        let pool = init_db_pool(path.to_str().expect("utf-8 path")).expect("Failed to create test DB pool");
        Fixture {
            _dir: dir,
            store: SqliteClipStore::from_pool(pool),
        }
    }

    fn clip(id: &str, collection: &str, at: i64, text: &str) -> Clip {
        let formats = vec![
            ClipFormat::text(text),
            ClipFormat::new(FormatKind::OtherRegistered("x-custom".into()), vec![1, 2, 3]),
        ];
        Clip {
            id: ClipId::from_string(id.to_string()),
            captured_at_ms: at,
            source_app: "editor.exe".into(),
            fingerprint: Fingerprint::of_formats(&formats),
            formats,
            collection_id: collection.into(),
            folder_id: None,
            deleted_at_ms: None,
            sort_key: at as f64,
            last_accessed_ms: None,
            access_count: 0,
        }
    }

    #[tokio::test]
    async fn insert_and_get_roundtrips_formats_in_order() {
        let f = fixture();
        let original = clip("c1", "inbox", 10, "hello");
        f.store.insert_clip(&original).await.unwrap();

        let loaded = f.store.get_clip(&original.id).await.unwrap().unwrap();
        assert_eq!(loaded, original);
        assert!(f
            .store
            .get_clip(&ClipId::from_string("missing".into()))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn duplicate_insert_leaves_no_partial_rows() {
        let f = fixture();
        let original = clip("c1", "inbox", 10, "hello");
        f.store.insert_clip(&original).await.unwrap();
        assert!(f.store.insert_clip(&original).await.is_err());

        let clips = f
            .store
            .query_by_scope(&"inbox".into(), ClipQuery::active())
            .await
            .unwrap();
        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0].formats.len(), 2);
    }

    #[tokio::test]
    async fn query_by_scope_orders_and_filters() {
        let f = fixture();
        for (id, at) in [("b", 20), ("a", 20), ("c", 5)] {
            f.store.insert_clip(&clip(id, "inbox", at, id)).await.unwrap();
        }
        f.store.insert_clip(&clip("z", "other", 1, "z")).await.unwrap();
        f.store
            .soft_delete(&ClipId::from_string("c".into()), 100)
            .await
            .unwrap();

        let active = f
            .store
            .query_by_scope(&"inbox".into(), ClipQuery::active())
            .await
            .unwrap();
        let ids: Vec<&str> = active.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);

        let newest = f
            .store
            .query_by_scope(&"inbox".into(), ClipQuery::newest(1).with_deleted())
            .await
            .unwrap();
        assert_eq!(newest[0].id.as_str(), "b");
    }

    #[tokio::test]
    async fn most_recent_fingerprint_ignores_deleted_clips() {
        let f = fixture();
        let older = clip("old", "inbox", 1, "x");
        let newer = clip("new", "inbox", 2, "y");
        f.store.insert_clip(&older).await.unwrap();
        f.store.insert_clip(&newer).await.unwrap();
        assert_eq!(
            f.store.most_recent_fingerprint(&"inbox".into()).await.unwrap(),
            Some(newer.fingerprint)
        );

        f.store.soft_delete(&newer.id, 5).await.unwrap();
        assert_eq!(
            f.store.most_recent_fingerprint(&"inbox".into()).await.unwrap(),
            Some(older.fingerprint)
        );
        assert_eq!(
            f.store.most_recent_fingerprint(&"empty".into()).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn reassign_moves_and_reports_missing_clip() {
        let f = fixture();
        let c = clip("c1", "inbox", 1, "x");
        f.store.insert_clip(&c).await.unwrap();
        f.store
            .reassign_collection(&c.id, &"archive".into())
            .await
            .unwrap();
        assert_eq!(
            f.store.get_clip(&c.id).await.unwrap().unwrap().collection_id,
            CollectionId::from("archive")
        );

        let err = f
            .store
            .reassign_collection(&ClipId::from_string("nope".into()), &"archive".into())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::ClipNotFound(_))
        ));
    }

    #[tokio::test]
    async fn soft_delete_keeps_first_deletion_time_and_trash_is_queryable() {
        let f = fixture();
        let c = clip("c1", "inbox", 1, "x");
        f.store.insert_clip(&c).await.unwrap();
        f.store.soft_delete(&c.id, 100).await.unwrap();
        f.store.soft_delete(&c.id, 900).await.unwrap();

        assert_eq!(
            f.store.get_clip(&c.id).await.unwrap().unwrap().deleted_at_ms,
            Some(100)
        );
        assert_eq!(f.store.query_trash(100).await.unwrap(), Vec::<ClipId>::new());
        assert_eq!(f.store.query_trash(101).await.unwrap(), vec![c.id.clone()]);
    }

    #[tokio::test]
    async fn permanently_erase_is_idempotent() {
        let f = fixture();
        let c = clip("c1", "inbox", 1, "x");
        f.store.insert_clip(&c).await.unwrap();
        assert!(f.store.permanently_erase(&c.id).await.unwrap());
        assert!(!f.store.permanently_erase(&c.id).await.unwrap());
        assert!(f.store.get_clip(&c.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn touch_records_access() {
        let f = fixture();
        let c = clip("c1", "inbox", 1, "x");
        f.store.insert_clip(&c).await.unwrap();
        f.store.touch_clip(&c.id, 50).await.unwrap();
        f.store.touch_clip(&c.id, 60).await.unwrap();
        let loaded = f.store.get_clip(&c.id).await.unwrap().unwrap();
        assert_eq!(loaded.last_accessed_ms, Some(60));
        assert_eq!(loaded.access_count, 2);
    }

    #[tokio::test]
    async fn collections_are_upserted_and_listed_by_sort_key() {
        let f = fixture();
        f.store
            .save_collection(&Collection::new("b", "B", 5))
            .await
            .unwrap();
        f.store
            .save_collection(&Collection::new("a", "A", 9))
            .await
            .unwrap();
        f.store
            .save_collection(
                &Collection::new("a", "A renamed", 1).with_policy(PurgePolicy::PurgeByAge { days: 3 }),
            )
            .await
            .unwrap();

        let listed = f.store.list_collections().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "A renamed");
        assert_eq!(listed[0].purge_policy, PurgePolicy::PurgeByAge { days: 3 });
        assert_eq!(listed[1].id, CollectionId::from("b"));
    }

    #[tokio::test]
    async fn replace_collections_drops_definitions_but_keeps_clips() {
        let f = fixture();
        f.store
            .save_collection(&Collection::new("inbox", "Inbox", 0))
            .await
            .unwrap();
        f.store
            .save_collection(&Collection::new("work", "Work", 1))
            .await
            .unwrap();
        f.store.insert_clip(&clip("c1", "inbox", 1, "x")).await.unwrap();

        f.store
            .replace_collections(&[
                Collection::new("work", "Work", 9).accepting(false),
                Collection::new("notes", "Notes", 5),
            ])
            .await
            .unwrap();

        let listed = f.store.list_collections().await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["notes", "work"]);
        assert!(!listed[1].accept_new_clips);
        assert!(f
            .store
            .get_clip(&ClipId::from_string("c1".into()))
            .await
            .unwrap()
            .is_some());
    }
}

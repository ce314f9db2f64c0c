//! Content-block persistence: four identically-shaped block tables (one per
//! parent kind) plus the entity tables they point at. Every composite write
//! runs in a single transaction.

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{ContentRepo, RepoError};
use crate::domain::content::{
    ContentSnapshot, EntitySnapshot, KeySnapshot, KeySource, NewContentEntity, PictureSnapshot,
};
use crate::domain::entities::{
    ContentBlockRecord, GalleryPictureRecord, GalleryRecord, MarkdownRecord, VideoContentRecord,
};
use crate::domain::types::{ContentKind, GalleryLayout, ParentKind, ParentRef};

use super::PostgresRepositories;
use super::util::map_sqlx_error;

/// Offset used to stage listed rows out of the live order range while a
/// reorder transaction rewrites them, so a swap never transits a state that
/// would collide with a uniqueness constraint on `(parent_id, sort_order)`.
const REORDER_STAGING_OFFSET: i32 = 1_000_000;

pub(super) fn block_table(kind: ParentKind) -> &'static str {
    match kind {
        ParentKind::BlogPostDraft => "blog_post_draft_contents",
        ParentKind::BlogPost => "blog_post_contents",
        ParentKind::CreationDraft => "creation_draft_contents",
        ParentKind::Creation => "creation_contents",
    }
}

#[derive(sqlx::FromRow)]
struct ContentBlockRow {
    id: Uuid,
    parent_id: Uuid,
    content_type: String,
    content_id: Uuid,
    sort_order: i32,
}

impl ContentBlockRow {
    fn into_record(self, kind: ParentKind) -> Result<ContentBlockRecord, RepoError> {
        let content_type =
            ContentKind::try_from(self.content_type.as_str()).map_err(|()| RepoError::Integrity {
                message: format!("unknown content_type `{}`", self.content_type),
            })?;
        Ok(ContentBlockRecord {
            id: self.id,
            parent: kind,
            parent_id: self.parent_id,
            content_type,
            content_id: self.content_id,
            sort_order: self.sort_order,
        })
    }
}

#[derive(sqlx::FromRow)]
struct GalleryPictureRow {
    picture_id: Uuid,
    sort_order: i32,
    caption_translation_key_id: Option<Uuid>,
}

impl From<GalleryPictureRow> for GalleryPictureRecord {
    fn from(row: GalleryPictureRow) -> Self {
        Self {
            picture_id: row.picture_id,
            sort_order: row.sort_order,
            caption_translation_key_id: row.caption_translation_key_id,
        }
    }
}

#[async_trait]
impl ContentRepo for PostgresRepositories {
    async fn list_blocks(&self, parent: ParentRef) -> Result<Vec<ContentBlockRecord>, RepoError> {
        let sql = format!(
            "SELECT id, parent_id, content_type, content_id, sort_order \
             FROM {} WHERE parent_id = $1 ORDER BY sort_order ASC, id ASC",
            block_table(parent.kind)
        );
        let rows = sqlx::query_as::<_, ContentBlockRow>(&sql)
            .bind(parent.id)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter()
            .map(|row| row.into_record(parent.kind))
            .collect()
    }

    async fn find_block(
        &self,
        parent: ParentRef,
        block_id: Uuid,
    ) -> Result<Option<ContentBlockRecord>, RepoError> {
        let sql = format!(
            "SELECT id, parent_id, content_type, content_id, sort_order \
             FROM {} WHERE parent_id = $1 AND id = $2",
            block_table(parent.kind)
        );
        let row = sqlx::query_as::<_, ContentBlockRow>(&sql)
            .bind(parent.id)
            .bind(block_id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(|row| row.into_record(parent.kind)).transpose()
    }

    async fn count_blocks(&self, parent: ParentRef) -> Result<u64, RepoError> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE parent_id = $1",
            block_table(parent.kind)
        );
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(parent.id)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        count
            .try_into()
            .map_err(|_| RepoError::from_persistence("count exceeds supported range"))
    }

    async fn next_sort_order(&self, parent: ParentRef) -> Result<i32, RepoError> {
        let sql = format!(
            "SELECT COALESCE(MAX(sort_order), 0) + 1 FROM {} WHERE parent_id = $1",
            block_table(parent.kind)
        );
        sqlx::query_scalar(&sql)
            .bind(parent.id)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn insert_block(
        &self,
        parent: ParentRef,
        entity: NewContentEntity,
        sort_order: i32,
    ) -> Result<ContentBlockRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        let block = insert_block_in_tx(&mut tx, parent, entity, sort_order).await?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(block)
    }

    async fn update_markdown(
        &self,
        markdown_id: Uuid,
        translation_key_id: Uuid,
    ) -> Result<MarkdownRecord, RepoError> {
        let row: Option<(Uuid, Uuid)> = sqlx::query_as(
            "UPDATE markdown_contents SET translation_key_id = $2 \
             WHERE id = $1 RETURNING id, translation_key_id",
        )
        .bind(markdown_id)
        .bind(translation_key_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        let (id, translation_key_id) = row.ok_or(RepoError::NotFound)?;
        Ok(MarkdownRecord {
            id,
            translation_key_id,
        })
    }

    async fn update_gallery(
        &self,
        gallery_id: Uuid,
        layout: GalleryLayout,
        columns: Option<i32>,
        pictures: Option<&[Uuid]>,
    ) -> Result<GalleryRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let updated = sqlx::query(
            "UPDATE gallery_contents SET layout = $2, columns = $3 WHERE id = $1",
        )
        .bind(gallery_id)
        .bind(layout.as_str())
        .bind(columns)
        .execute(tx.as_mut())
        .await
        .map_err(map_sqlx_error)?;
        if updated.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        if let Some(picture_ids) = pictures {
            detach_gallery_pictures(&mut tx, gallery_id).await?;
            for (index, picture_id) in picture_ids.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO gallery_pictures \
                     (gallery_id, picture_id, sort_order, caption_translation_key_id) \
                     VALUES ($1, $2, $3, NULL)",
                )
                .bind(gallery_id)
                .bind(picture_id)
                .bind(index as i32 + 1)
                .execute(tx.as_mut())
                .await
                .map_err(map_sqlx_error)?;
            }
        }

        let pivots = sqlx::query_as::<_, GalleryPictureRow>(
            "SELECT picture_id, sort_order, caption_translation_key_id \
             FROM gallery_pictures WHERE gallery_id = $1 ORDER BY sort_order ASC",
        )
        .bind(gallery_id)
        .fetch_all(tx.as_mut())
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(GalleryRecord {
            id: gallery_id,
            layout,
            columns,
            pictures: pivots.into_iter().map(Into::into).collect(),
        })
    }

    async fn update_video(
        &self,
        video_content_id: Uuid,
        video_id: Uuid,
        caption_translation_key_id: Option<Uuid>,
    ) -> Result<VideoContentRecord, RepoError> {
        let row: Option<(Uuid, Uuid, Option<Uuid>)> = sqlx::query_as(
            "UPDATE video_contents SET video_id = $2, caption_translation_key_id = $3 \
             WHERE id = $1 RETURNING id, video_id, caption_translation_key_id",
        )
        .bind(video_content_id)
        .bind(video_id)
        .bind(caption_translation_key_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        let (id, video_id, caption_translation_key_id) = row.ok_or(RepoError::NotFound)?;
        Ok(VideoContentRecord {
            id,
            video_id,
            caption_translation_key_id,
        })
    }

    async fn apply_sort_orders(
        &self,
        parent: ParentRef,
        assignments: &[(Uuid, i32)],
    ) -> Result<(), RepoError> {
        if assignments.is_empty() {
            return Ok(());
        }

        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        let table = block_table(parent.kind);
        let listed: Vec<Uuid> = assignments.iter().map(|(id, _)| *id).collect();

        let sql = format!(
            "UPDATE {table} SET sort_order = sort_order + $3 \
             WHERE parent_id = $1 AND id = ANY($2)"
        );
        sqlx::query(&sql)
            .bind(parent.id)
            .bind(&listed)
            .bind(REORDER_STAGING_OFFSET)
            .execute(tx.as_mut())
            .await
            .map_err(map_sqlx_error)?;

        let sql = format!("UPDATE {table} SET sort_order = $3 WHERE parent_id = $1 AND id = $2");
        for (block_id, sort_order) in assignments {
            sqlx::query(&sql)
                .bind(parent.id)
                .bind(block_id)
                .bind(sort_order)
                .execute(tx.as_mut())
                .await
                .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)
    }

    async fn delete_block(&self, parent: ParentRef, block_id: Uuid) -> Result<(), RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let sql = format!(
            "SELECT id, parent_id, content_type, content_id, sort_order \
             FROM {} WHERE parent_id = $1 AND id = $2",
            block_table(parent.kind)
        );
        let row = sqlx::query_as::<_, ContentBlockRow>(&sql)
            .bind(parent.id)
            .bind(block_id)
            .fetch_optional(tx.as_mut())
            .await
            .map_err(map_sqlx_error)?;
        let block = row.ok_or(RepoError::NotFound)?.into_record(parent.kind)?;

        delete_block_in_tx(&mut tx, parent.kind, &block).await?;
        tx.commit().await.map_err(map_sqlx_error)
    }

    async fn load_snapshot(
        &self,
        parent: ParentRef,
        block_id: Uuid,
    ) -> Result<Option<ContentSnapshot>, RepoError> {
        let Some(block) = self.find_block(parent, block_id).await? else {
            return Ok(None);
        };
        let entity = self.load_entity(&block).await?;
        Ok(Some(ContentSnapshot { block, entity }))
    }

    async fn load_snapshots(&self, parent: ParentRef) -> Result<Vec<ContentSnapshot>, RepoError> {
        let blocks = self.list_blocks(parent).await?;
        let mut snapshots = Vec::with_capacity(blocks.len());
        for block in blocks {
            let entity = self.load_entity(&block).await?;
            snapshots.push(ContentSnapshot { block, entity });
        }
        Ok(snapshots)
    }
}

impl PostgresRepositories {
    async fn load_entity(&self, block: &ContentBlockRecord) -> Result<EntitySnapshot, RepoError> {
        match block.content_type {
            ContentKind::Markdown => {
                let key_id: Uuid = sqlx::query_scalar(
                    "SELECT translation_key_id FROM markdown_contents WHERE id = $1",
                )
                .bind(block.content_id)
                .fetch_optional(self.pool())
                .await
                .map_err(map_sqlx_error)?
                .ok_or_else(|| orphaned(block))?;

                Ok(EntitySnapshot::Markdown {
                    id: block.content_id,
                    key: self.load_key_snapshot(key_id).await?,
                })
            }
            ContentKind::Gallery => {
                let row: Option<(String, Option<i32>)> = sqlx::query_as(
                    "SELECT layout, columns FROM gallery_contents WHERE id = $1",
                )
                .bind(block.content_id)
                .fetch_optional(self.pool())
                .await
                .map_err(map_sqlx_error)?;
                let (layout, columns) = row.ok_or_else(|| orphaned(block))?;
                let layout = GalleryLayout::try_from(layout.as_str()).map_err(|()| {
                    RepoError::Integrity {
                        message: format!("unknown gallery layout `{layout}`"),
                    }
                })?;

                let pivots = sqlx::query_as::<_, GalleryPictureRow>(
                    "SELECT picture_id, sort_order, caption_translation_key_id \
                     FROM gallery_pictures WHERE gallery_id = $1 ORDER BY sort_order ASC",
                )
                .bind(block.content_id)
                .fetch_all(self.pool())
                .await
                .map_err(map_sqlx_error)?;

                let mut pictures = Vec::with_capacity(pivots.len());
                for pivot in pivots {
                    let caption = match pivot.caption_translation_key_id {
                        Some(key_id) => Some(self.load_key_snapshot(key_id).await?),
                        None => None,
                    };
                    pictures.push(PictureSnapshot {
                        picture_id: pivot.picture_id,
                        sort_order: pivot.sort_order,
                        caption,
                    });
                }

                Ok(EntitySnapshot::Gallery {
                    id: block.content_id,
                    layout,
                    columns,
                    pictures,
                })
            }
            ContentKind::Video => {
                let row: Option<(Uuid, Option<Uuid>)> = sqlx::query_as(
                    "SELECT video_id, caption_translation_key_id FROM video_contents WHERE id = $1",
                )
                .bind(block.content_id)
                .fetch_optional(self.pool())
                .await
                .map_err(map_sqlx_error)?;
                let (video_id, caption_key_id) = row.ok_or_else(|| orphaned(block))?;

                let caption = match caption_key_id {
                    Some(key_id) => Some(self.load_key_snapshot(key_id).await?),
                    None => None,
                };
                Ok(EntitySnapshot::Video {
                    id: block.content_id,
                    video_id,
                    caption,
                })
            }
        }
    }

    async fn load_key_snapshot(&self, key_id: Uuid) -> Result<KeySnapshot, RepoError> {
        let name: String =
            sqlx::query_scalar("SELECT name FROM translation_keys WHERE id = $1")
                .bind(key_id)
                .fetch_optional(self.pool())
                .await
                .map_err(map_sqlx_error)?
                .ok_or(RepoError::NotFound)?;

        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT locale, text FROM translation_texts WHERE key_id = $1 ORDER BY locale",
        )
        .bind(key_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(KeySnapshot {
            id: key_id,
            name,
            texts: rows.into_iter().collect(),
        })
    }
}

fn orphaned(block: &ContentBlockRecord) -> RepoError {
    RepoError::Integrity {
        message: format!(
            "content block `{}` references missing {} entity `{}`",
            block.id,
            block.content_type.as_str(),
            block.content_id
        ),
    }
}

pub(super) async fn resolve_key_source(
    tx: &mut Transaction<'_, Postgres>,
    source: KeySource,
) -> Result<Uuid, RepoError> {
    match source {
        KeySource::Existing(id) => Ok(id),
        KeySource::Copied { name, texts } => {
            let id = Uuid::new_v4();
            sqlx::query("INSERT INTO translation_keys (id, name, created_at) VALUES ($1, $2, $3)")
                .bind(id)
                .bind(&name)
                .bind(OffsetDateTime::now_utc())
                .execute(tx.as_mut())
                .await
                .map_err(map_sqlx_error)?;

            for (locale, text) in &texts {
                sqlx::query(
                    "INSERT INTO translation_texts (key_id, locale, text) VALUES ($1, $2, $3)",
                )
                .bind(id)
                .bind(locale)
                .bind(text)
                .execute(tx.as_mut())
                .await
                .map_err(map_sqlx_error)?;
            }
            Ok(id)
        }
    }
}

/// Delete a translation key unless another entity still references it.
/// Shallow duplicates share their source's keys, so a key is released only
/// when the last referencing row is gone. Must run after the caller has
/// deleted its own referencing row.
async fn delete_key_if_unreferenced(
    tx: &mut Transaction<'_, Postgres>,
    key_id: Uuid,
) -> Result<(), RepoError> {
    let referenced: bool = sqlx::query_scalar(
        "SELECT EXISTS ( \
            SELECT 1 FROM markdown_contents WHERE translation_key_id = $1 \
            UNION ALL \
            SELECT 1 FROM gallery_pictures WHERE caption_translation_key_id = $1 \
            UNION ALL \
            SELECT 1 FROM video_contents WHERE caption_translation_key_id = $1 \
        )",
    )
    .bind(key_id)
    .fetch_one(tx.as_mut())
    .await
    .map_err(map_sqlx_error)?;
    if referenced {
        return Ok(());
    }

    // translation_texts cascade from the key row.
    sqlx::query("DELETE FROM translation_keys WHERE id = $1")
        .bind(key_id)
        .execute(tx.as_mut())
        .await
        .map_err(map_sqlx_error)?;
    Ok(())
}

pub(super) async fn insert_block_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    parent: ParentRef,
    entity: NewContentEntity,
    sort_order: i32,
) -> Result<ContentBlockRecord, RepoError> {
    let content_id = Uuid::new_v4();
    let content_type = match entity {
        NewContentEntity::Markdown { key } => {
            let key_id = resolve_key_source(tx, key).await?;
            sqlx::query("INSERT INTO markdown_contents (id, translation_key_id) VALUES ($1, $2)")
                .bind(content_id)
                .bind(key_id)
                .execute(tx.as_mut())
                .await
                .map_err(map_sqlx_error)?;
            ContentKind::Markdown
        }
        NewContentEntity::Gallery {
            layout,
            columns,
            pictures,
        } => {
            sqlx::query("INSERT INTO gallery_contents (id, layout, columns) VALUES ($1, $2, $3)")
                .bind(content_id)
                .bind(layout.as_str())
                .bind(columns)
                .execute(tx.as_mut())
                .await
                .map_err(map_sqlx_error)?;

            for picture in pictures {
                let caption = match picture.caption {
                    Some(source) => Some(resolve_key_source(tx, source).await?),
                    None => None,
                };
                sqlx::query(
                    "INSERT INTO gallery_pictures \
                     (gallery_id, picture_id, sort_order, caption_translation_key_id) \
                     VALUES ($1, $2, $3, $4)",
                )
                .bind(content_id)
                .bind(picture.picture_id)
                .bind(picture.sort_order)
                .bind(caption)
                .execute(tx.as_mut())
                .await
                .map_err(map_sqlx_error)?;
            }
            ContentKind::Gallery
        }
        NewContentEntity::Video { video_id, caption } => {
            let caption = match caption {
                Some(source) => Some(resolve_key_source(tx, source).await?),
                None => None,
            };
            sqlx::query(
                "INSERT INTO video_contents (id, video_id, caption_translation_key_id) \
                 VALUES ($1, $2, $3)",
            )
            .bind(content_id)
            .bind(video_id)
            .bind(caption)
            .execute(tx.as_mut())
            .await
            .map_err(map_sqlx_error)?;
            ContentKind::Video
        }
    };

    let block_id = Uuid::new_v4();
    let sql = format!(
        "INSERT INTO {} (id, parent_id, content_type, content_id, sort_order) \
         VALUES ($1, $2, $3, $4, $5)",
        block_table(parent.kind)
    );
    sqlx::query(&sql)
        .bind(block_id)
        .bind(parent.id)
        .bind(content_type.as_str())
        .bind(content_id)
        .bind(sort_order)
        .execute(tx.as_mut())
        .await
        .map_err(map_sqlx_error)?;

    Ok(ContentBlockRecord {
        id: block_id,
        parent: parent.kind,
        parent_id: parent.id,
        content_type,
        content_id,
        sort_order,
    })
}

async fn detach_gallery_pictures(
    tx: &mut Transaction<'_, Postgres>,
    gallery_id: Uuid,
) -> Result<(), RepoError> {
    let caption_keys: Vec<Uuid> = sqlx::query_scalar(
        "SELECT caption_translation_key_id FROM gallery_pictures \
         WHERE gallery_id = $1 AND caption_translation_key_id IS NOT NULL",
    )
    .bind(gallery_id)
    .fetch_all(tx.as_mut())
    .await
    .map_err(map_sqlx_error)?;

    sqlx::query("DELETE FROM gallery_pictures WHERE gallery_id = $1")
        .bind(gallery_id)
        .execute(tx.as_mut())
        .await
        .map_err(map_sqlx_error)?;

    // Caption keys are owned by their pivot row; the pictures are shared and
    // survive detachment.
    for key_id in caption_keys {
        delete_key_if_unreferenced(tx, key_id).await?;
    }
    Ok(())
}

/// Delete one block with its entity tree: pivots, owned translation keys,
/// entity row, block row. Never touches shared picture or video rows.
pub(super) async fn delete_block_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    kind: ParentKind,
    block: &ContentBlockRecord,
) -> Result<(), RepoError> {
    match block.content_type {
        ContentKind::Markdown => {
            let key_id: Option<Uuid> = sqlx::query_scalar(
                "SELECT translation_key_id FROM markdown_contents WHERE id = $1",
            )
            .bind(block.content_id)
            .fetch_optional(tx.as_mut())
            .await
            .map_err(map_sqlx_error)?;

            sqlx::query("DELETE FROM markdown_contents WHERE id = $1")
                .bind(block.content_id)
                .execute(tx.as_mut())
                .await
                .map_err(map_sqlx_error)?;

            if let Some(key_id) = key_id {
                delete_key_if_unreferenced(tx, key_id).await?;
            }
        }
        ContentKind::Gallery => {
            detach_gallery_pictures(tx, block.content_id).await?;
            sqlx::query("DELETE FROM gallery_contents WHERE id = $1")
                .bind(block.content_id)
                .execute(tx.as_mut())
                .await
                .map_err(map_sqlx_error)?;
        }
        ContentKind::Video => {
            let caption: Option<Option<Uuid>> = sqlx::query_scalar(
                "SELECT caption_translation_key_id FROM video_contents WHERE id = $1",
            )
            .bind(block.content_id)
            .fetch_optional(tx.as_mut())
            .await
            .map_err(map_sqlx_error)?;

            sqlx::query("DELETE FROM video_contents WHERE id = $1")
                .bind(block.content_id)
                .execute(tx.as_mut())
                .await
                .map_err(map_sqlx_error)?;

            if let Some(Some(key_id)) = caption {
                delete_key_if_unreferenced(tx, key_id).await?;
            }
        }
    }

    let sql = format!("DELETE FROM {} WHERE id = $1", block_table(kind));
    sqlx::query(&sql)
        .bind(block.id)
        .execute(tx.as_mut())
        .await
        .map_err(map_sqlx_error)?;
    Ok(())
}

/// Delete the listed blocks (with entity trees) of one parent. Used for
/// retirement during publish and for parent deletion.
pub(super) async fn delete_blocks_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    kind: ParentKind,
    parent_id: Uuid,
    block_ids: &[Uuid],
) -> Result<(), RepoError> {
    for block_id in block_ids {
        let sql = format!(
            "SELECT id, parent_id, content_type, content_id, sort_order \
             FROM {} WHERE parent_id = $1 AND id = $2",
            block_table(kind)
        );
        let row = sqlx::query_as::<_, ContentBlockRow>(&sql)
            .bind(parent_id)
            .bind(block_id)
            .fetch_optional(tx.as_mut())
            .await
            .map_err(map_sqlx_error)?;

        // A block already gone is not an error during retirement.
        let Some(row) = row else {
            continue;
        };
        let block = row.into_record(kind)?;
        delete_block_in_tx(tx, kind, &block).await?;
    }
    Ok(())
}

/// Delete every block of a parent, entity trees included.
pub(super) async fn delete_all_blocks_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    kind: ParentKind,
    parent_id: Uuid,
) -> Result<(), RepoError> {
    let sql = format!(
        "SELECT id, parent_id, content_type, content_id, sort_order \
         FROM {} WHERE parent_id = $1",
        block_table(kind)
    );
    let rows = sqlx::query_as::<_, ContentBlockRow>(&sql)
        .bind(parent_id)
        .fetch_all(tx.as_mut())
        .await
        .map_err(map_sqlx_error)?;

    for row in rows {
        let block = row.into_record(kind)?;
        delete_block_in_tx(tx, kind, &block).await?;
    }
    Ok(())
}

/// Insert a planned set of block copies onto a parent inside an existing
/// transaction; used by the draft/publish composites.
pub(super) async fn insert_copies_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    parent: ParentRef,
    blocks: &[crate::domain::content::BlockCopy],
) -> Result<(), RepoError> {
    for copy in blocks {
        insert_block_in_tx(tx, parent, copy.entity.clone(), copy.sort_order).await?;
    }
    Ok(())
}

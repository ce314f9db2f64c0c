use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{CreationFields, CreationRepo, NewCreationDraft, RepoError};
use crate::domain::content::BlockCopy;
use crate::domain::entities::{CreationDraftRecord, CreationRecord};
use crate::domain::types::{ParentKind, ParentRef};

use super::PostgresRepositories;
use super::content::{delete_all_blocks_in_tx, delete_blocks_in_tx, insert_copies_in_tx};
use super::util::map_sqlx_error;

#[derive(sqlx::FromRow)]
struct CreationRow {
    id: Uuid,
    name: String,
    slug: String,
    summary: Option<String>,
    cover_picture_id: Option<Uuid>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<CreationRow> for CreationRecord {
    fn from(row: CreationRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            summary: row.summary,
            cover_picture_id: row.cover_picture_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CreationDraftRow {
    id: Uuid,
    original_creation_id: Option<Uuid>,
    name: String,
    slug: String,
    summary: Option<String>,
    cover_picture_id: Option<Uuid>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<CreationDraftRow> for CreationDraftRecord {
    fn from(row: CreationDraftRow) -> Self {
        Self {
            id: row.id,
            original_creation_id: row.original_creation_id,
            name: row.name,
            slug: row.slug,
            summary: row.summary,
            cover_picture_id: row.cover_picture_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const CREATION_COLUMNS: &str =
    "id, name, slug, summary, cover_picture_id, created_at, updated_at";
const DRAFT_COLUMNS: &str =
    "id, original_creation_id, name, slug, summary, cover_picture_id, created_at, updated_at";

#[async_trait]
impl CreationRepo for PostgresRepositories {
    async fn find_creation(&self, id: Uuid) -> Result<Option<CreationRecord>, RepoError> {
        let sql = format!("SELECT {CREATION_COLUMNS} FROM creations WHERE id = $1");
        let row = sqlx::query_as::<_, CreationRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn find_draft(&self, id: Uuid) -> Result<Option<CreationDraftRecord>, RepoError> {
        let sql = format!("SELECT {DRAFT_COLUMNS} FROM creation_drafts WHERE id = $1");
        let row = sqlx::query_as::<_, CreationDraftRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn find_draft_for_creation(
        &self,
        creation_id: Uuid,
    ) -> Result<Option<CreationDraftRecord>, RepoError> {
        let sql =
            format!("SELECT {DRAFT_COLUMNS} FROM creation_drafts WHERE original_creation_id = $1");
        let row = sqlx::query_as::<_, CreationDraftRow>(&sql)
            .bind(creation_id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn create_draft(
        &self,
        draft: NewCreationDraft,
        blocks: &[BlockCopy],
    ) -> Result<CreationDraftRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        let now = OffsetDateTime::now_utc();
        let draft_id = Uuid::new_v4();
        let fields = draft.fields;

        sqlx::query(
            "INSERT INTO creation_drafts \
             (id, original_creation_id, name, slug, summary, cover_picture_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)",
        )
        .bind(draft_id)
        .bind(draft.original_creation_id)
        .bind(&fields.name)
        .bind(&fields.slug)
        .bind(&fields.summary)
        .bind(fields.cover_picture_id)
        .bind(now)
        .execute(tx.as_mut())
        .await
        .map_err(map_sqlx_error)?;

        insert_copies_in_tx(&mut tx, ParentRef::creation_draft(draft_id), blocks).await?;
        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(CreationDraftRecord {
            id: draft_id,
            original_creation_id: draft.original_creation_id,
            name: fields.name,
            slug: fields.slug,
            summary: fields.summary,
            cover_picture_id: fields.cover_picture_id,
            created_at: now,
            updated_at: now,
        })
    }

    async fn create_creation_from_draft(
        &self,
        draft_id: Uuid,
        fields: CreationFields,
        blocks: &[BlockCopy],
    ) -> Result<CreationRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        let now = OffsetDateTime::now_utc();
        let creation_id = Uuid::new_v4();

        sqlx::query(
            "INSERT INTO creations \
             (id, name, slug, summary, cover_picture_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $6)",
        )
        .bind(creation_id)
        .bind(&fields.name)
        .bind(&fields.slug)
        .bind(&fields.summary)
        .bind(fields.cover_picture_id)
        .bind(now)
        .execute(tx.as_mut())
        .await
        .map_err(map_sqlx_error)?;

        insert_copies_in_tx(&mut tx, ParentRef::creation(creation_id), blocks).await?;

        let updated = sqlx::query(
            "UPDATE creation_drafts SET original_creation_id = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(draft_id)
        .bind(creation_id)
        .bind(now)
        .execute(tx.as_mut())
        .await
        .map_err(map_sqlx_error)?;
        if updated.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(CreationRecord {
            id: creation_id,
            name: fields.name,
            slug: fields.slug,
            summary: fields.summary,
            cover_picture_id: fields.cover_picture_id,
            created_at: now,
            updated_at: now,
        })
    }

    async fn replace_creation(
        &self,
        creation_id: Uuid,
        fields: CreationFields,
        blocks: &[BlockCopy],
        retire_block_ids: &[Uuid],
    ) -> Result<CreationRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        let now = OffsetDateTime::now_utc();

        let sql = format!(
            "UPDATE creations SET name = $2, slug = $3, summary = $4, \
             cover_picture_id = $5, updated_at = $6 \
             WHERE id = $1 RETURNING {CREATION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, CreationRow>(&sql)
            .bind(creation_id)
            .bind(&fields.name)
            .bind(&fields.slug)
            .bind(&fields.summary)
            .bind(fields.cover_picture_id)
            .bind(now)
            .fetch_optional(tx.as_mut())
            .await
            .map_err(map_sqlx_error)?;
        let record: CreationRecord = row.ok_or(RepoError::NotFound)?.into();

        insert_copies_in_tx(&mut tx, ParentRef::creation(creation_id), blocks).await?;

        // Retirement runs last; a failure anywhere rolls the whole swap back.
        delete_blocks_in_tx(&mut tx, ParentKind::Creation, creation_id, retire_block_ids).await?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(record)
    }

    async fn delete_draft(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        delete_all_blocks_in_tx(&mut tx, ParentKind::CreationDraft, id).await?;

        let deleted = sqlx::query("DELETE FROM creation_drafts WHERE id = $1")
            .bind(id)
            .execute(tx.as_mut())
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(deleted.rows_affected() > 0)
    }

    async fn delete_creation(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let draft_ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT id FROM creation_drafts WHERE original_creation_id = $1")
                .bind(id)
                .fetch_all(tx.as_mut())
                .await
                .map_err(map_sqlx_error)?;
        for draft_id in draft_ids {
            delete_all_blocks_in_tx(&mut tx, ParentKind::CreationDraft, draft_id).await?;
            sqlx::query("DELETE FROM creation_drafts WHERE id = $1")
                .bind(draft_id)
                .execute(tx.as_mut())
                .await
                .map_err(map_sqlx_error)?;
        }

        delete_all_blocks_in_tx(&mut tx, ParentKind::Creation, id).await?;
        let deleted = sqlx::query("DELETE FROM creations WHERE id = $1")
            .bind(id)
            .execute(tx.as_mut())
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(deleted.rows_affected() > 0)
    }
}

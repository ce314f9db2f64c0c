use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    BlogPostFields, BlogRepo, GameReviewFields, NewBlogDraft, RepoError,
};
use crate::domain::content::BlockCopy;
use crate::domain::entities::{
    BlogPostDraftRecord, BlogPostRecord, GameReviewDraftRecord, GameReviewRecord,
};
use crate::domain::types::{ParentKind, ParentRef, PostKind};

use super::PostgresRepositories;
use super::content::{delete_all_blocks_in_tx, delete_blocks_in_tx, insert_copies_in_tx};
use super::util::map_sqlx_error;

#[derive(sqlx::FromRow)]
struct BlogPostRow {
    id: Uuid,
    slug: String,
    title: String,
    excerpt: Option<String>,
    cover_picture_id: Option<Uuid>,
    kind: String,
    published_at: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<BlogPostRow> for BlogPostRecord {
    type Error = RepoError;

    fn try_from(row: BlogPostRow) -> Result<Self, RepoError> {
        let kind = parse_kind(&row.kind)?;
        Ok(Self {
            id: row.id,
            slug: row.slug,
            title: row.title,
            excerpt: row.excerpt,
            cover_picture_id: row.cover_picture_id,
            kind,
            published_at: row.published_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct BlogPostDraftRow {
    id: Uuid,
    original_post_id: Option<Uuid>,
    slug: String,
    title: String,
    excerpt: Option<String>,
    cover_picture_id: Option<Uuid>,
    kind: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<BlogPostDraftRow> for BlogPostDraftRecord {
    type Error = RepoError;

    fn try_from(row: BlogPostDraftRow) -> Result<Self, RepoError> {
        let kind = parse_kind(&row.kind)?;
        Ok(Self {
            id: row.id,
            original_post_id: row.original_post_id,
            slug: row.slug,
            title: row.title,
            excerpt: row.excerpt,
            cover_picture_id: row.cover_picture_id,
            kind,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn parse_kind(raw: &str) -> Result<PostKind, RepoError> {
    PostKind::try_from(raw).map_err(|()| RepoError::Integrity {
        message: format!("unknown post kind `{raw}`"),
    })
}

const POST_COLUMNS: &str =
    "id, slug, title, excerpt, cover_picture_id, kind, published_at, created_at, updated_at";
const DRAFT_COLUMNS: &str =
    "id, original_post_id, slug, title, excerpt, cover_picture_id, kind, created_at, updated_at";

#[async_trait]
impl BlogRepo for PostgresRepositories {
    async fn find_post(&self, id: Uuid) -> Result<Option<BlogPostRecord>, RepoError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM blog_posts WHERE id = $1");
        let row = sqlx::query_as::<_, BlogPostRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        row.map(TryInto::try_into).transpose()
    }

    async fn find_draft(&self, id: Uuid) -> Result<Option<BlogPostDraftRecord>, RepoError> {
        let sql = format!("SELECT {DRAFT_COLUMNS} FROM blog_post_drafts WHERE id = $1");
        let row = sqlx::query_as::<_, BlogPostDraftRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        row.map(TryInto::try_into).transpose()
    }

    async fn find_draft_for_post(
        &self,
        post_id: Uuid,
    ) -> Result<Option<BlogPostDraftRecord>, RepoError> {
        let sql = format!("SELECT {DRAFT_COLUMNS} FROM blog_post_drafts WHERE original_post_id = $1");
        let row = sqlx::query_as::<_, BlogPostDraftRow>(&sql)
            .bind(post_id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        row.map(TryInto::try_into).transpose()
    }

    async fn find_game_review(
        &self,
        post_id: Uuid,
    ) -> Result<Option<GameReviewRecord>, RepoError> {
        let row: Option<(Uuid, Uuid, i16, Option<String>, Option<String>)> = sqlx::query_as(
            "SELECT id, blog_post_id, rating, pros, cons FROM game_reviews WHERE blog_post_id = $1",
        )
        .bind(post_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(|(id, blog_post_id, rating, pros, cons)| GameReviewRecord {
            id,
            blog_post_id,
            rating,
            pros,
            cons,
        }))
    }

    async fn find_game_review_draft(
        &self,
        draft_id: Uuid,
    ) -> Result<Option<GameReviewDraftRecord>, RepoError> {
        let row: Option<(Uuid, Uuid, i16, Option<String>, Option<String>)> = sqlx::query_as(
            "SELECT id, blog_post_draft_id, rating, pros, cons FROM game_review_drafts \
             WHERE blog_post_draft_id = $1",
        )
        .bind(draft_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(
            |(id, blog_post_draft_id, rating, pros, cons)| GameReviewDraftRecord {
                id,
                blog_post_draft_id,
                rating,
                pros,
                cons,
            },
        ))
    }

    async fn create_draft(
        &self,
        draft: NewBlogDraft,
        blocks: &[BlockCopy],
    ) -> Result<BlogPostDraftRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        let now = OffsetDateTime::now_utc();
        let draft_id = Uuid::new_v4();
        let fields = draft.fields;

        sqlx::query(
            "INSERT INTO blog_post_drafts \
             (id, original_post_id, slug, title, excerpt, cover_picture_id, kind, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)",
        )
        .bind(draft_id)
        .bind(draft.original_post_id)
        .bind(&fields.slug)
        .bind(&fields.title)
        .bind(&fields.excerpt)
        .bind(fields.cover_picture_id)
        .bind(fields.kind.as_str())
        .bind(now)
        .execute(tx.as_mut())
        .await
        .map_err(map_sqlx_error)?;

        if let Some(review) = &fields.game_review {
            insert_game_review_draft(&mut tx, draft_id, review).await?;
        }

        insert_copies_in_tx(&mut tx, ParentRef::blog_post_draft(draft_id), blocks).await?;
        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(BlogPostDraftRecord {
            id: draft_id,
            original_post_id: draft.original_post_id,
            slug: fields.slug,
            title: fields.title,
            excerpt: fields.excerpt,
            cover_picture_id: fields.cover_picture_id,
            kind: fields.kind,
            created_at: now,
            updated_at: now,
        })
    }

    async fn create_post_from_draft(
        &self,
        draft_id: Uuid,
        fields: BlogPostFields,
        blocks: &[BlockCopy],
    ) -> Result<BlogPostRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        let now = OffsetDateTime::now_utc();
        let post_id = Uuid::new_v4();

        sqlx::query(
            "INSERT INTO blog_posts \
             (id, slug, title, excerpt, cover_picture_id, kind, published_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7, $7)",
        )
        .bind(post_id)
        .bind(&fields.slug)
        .bind(&fields.title)
        .bind(&fields.excerpt)
        .bind(fields.cover_picture_id)
        .bind(fields.kind.as_str())
        .bind(now)
        .execute(tx.as_mut())
        .await
        .map_err(map_sqlx_error)?;

        if let Some(review) = &fields.game_review {
            insert_game_review(&mut tx, post_id, review).await?;
        }

        insert_copies_in_tx(&mut tx, ParentRef::blog_post(post_id), blocks).await?;

        let updated = sqlx::query(
            "UPDATE blog_post_drafts SET original_post_id = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(draft_id)
        .bind(post_id)
        .bind(now)
        .execute(tx.as_mut())
        .await
        .map_err(map_sqlx_error)?;
        if updated.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(BlogPostRecord {
            id: post_id,
            slug: fields.slug,
            title: fields.title,
            excerpt: fields.excerpt,
            cover_picture_id: fields.cover_picture_id,
            kind: fields.kind,
            published_at: Some(now),
            created_at: now,
            updated_at: now,
        })
    }

    async fn replace_post(
        &self,
        post_id: Uuid,
        fields: BlogPostFields,
        blocks: &[BlockCopy],
        retire_block_ids: &[Uuid],
    ) -> Result<BlogPostRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        let now = OffsetDateTime::now_utc();

        let sql = format!(
            "UPDATE blog_posts SET slug = $2, title = $3, excerpt = $4, \
             cover_picture_id = $5, kind = $6, updated_at = $7 \
             WHERE id = $1 RETURNING {POST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, BlogPostRow>(&sql)
            .bind(post_id)
            .bind(&fields.slug)
            .bind(&fields.title)
            .bind(&fields.excerpt)
            .bind(fields.cover_picture_id)
            .bind(fields.kind.as_str())
            .bind(now)
            .fetch_optional(tx.as_mut())
            .await
            .map_err(map_sqlx_error)?;
        let record: BlogPostRecord = row.ok_or(RepoError::NotFound)?.try_into()?;

        sqlx::query("DELETE FROM game_reviews WHERE blog_post_id = $1")
            .bind(post_id)
            .execute(tx.as_mut())
            .await
            .map_err(map_sqlx_error)?;
        if let Some(review) = &fields.game_review {
            insert_game_review(&mut tx, post_id, review).await?;
        }

        insert_copies_in_tx(&mut tx, ParentRef::blog_post(post_id), blocks).await?;

        // Retirement runs last; a failure anywhere rolls the whole swap back.
        delete_blocks_in_tx(&mut tx, ParentKind::BlogPost, post_id, retire_block_ids).await?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(record)
    }

    async fn delete_draft(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        delete_all_blocks_in_tx(&mut tx, ParentKind::BlogPostDraft, id).await?;

        // game_review_drafts cascade from the draft row.
        let deleted = sqlx::query("DELETE FROM blog_post_drafts WHERE id = $1")
            .bind(id)
            .execute(tx.as_mut())
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(deleted.rows_affected() > 0)
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let draft_ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT id FROM blog_post_drafts WHERE original_post_id = $1")
                .bind(id)
                .fetch_all(tx.as_mut())
                .await
                .map_err(map_sqlx_error)?;
        for draft_id in draft_ids {
            delete_all_blocks_in_tx(&mut tx, ParentKind::BlogPostDraft, draft_id).await?;
            sqlx::query("DELETE FROM blog_post_drafts WHERE id = $1")
                .bind(draft_id)
                .execute(tx.as_mut())
                .await
                .map_err(map_sqlx_error)?;
        }

        delete_all_blocks_in_tx(&mut tx, ParentKind::BlogPost, id).await?;
        let deleted = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(tx.as_mut())
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(deleted.rows_affected() > 0)
    }
}

async fn insert_game_review(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
    review: &GameReviewFields,
) -> Result<(), RepoError> {
    sqlx::query(
        "INSERT INTO game_reviews (id, blog_post_id, rating, pros, cons) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(Uuid::new_v4())
    .bind(post_id)
    .bind(review.rating)
    .bind(&review.pros)
    .bind(&review.cons)
    .execute(tx.as_mut())
    .await
    .map_err(map_sqlx_error)?;
    Ok(())
}

async fn insert_game_review_draft(
    tx: &mut Transaction<'_, Postgres>,
    draft_id: Uuid,
    review: &GameReviewFields,
) -> Result<(), RepoError> {
    sqlx::query(
        "INSERT INTO game_review_drafts (id, blog_post_draft_id, rating, pros, cons) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(Uuid::new_v4())
    .bind(draft_id)
    .bind(review.rating)
    .bind(&review.pros)
    .bind(&review.cons)
    .execute(tx.as_mut())
    .await
    .map_err(map_sqlx_error)?;
    Ok(())
}

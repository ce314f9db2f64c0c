//! Repository traits describing persistence adapters.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::content::{BlockCopy, ContentSnapshot, NewContentEntity};
use crate::domain::entities::{
    BlogPostDraftRecord, BlogPostRecord, ContentBlockRecord, CreationDraftRecord, CreationRecord,
    GalleryRecord, GameReviewDraftRecord, GameReviewRecord, MarkdownRecord, TranslationKeyRecord,
    VideoContentRecord,
};
use crate::domain::types::{GalleryLayout, ParentRef, PostKind};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Opaque per-locale text storage. Keys are singly owned by the content
/// entity or pivot slot referencing them; deleting a key cascades its texts.
#[async_trait]
pub trait TranslationKeyStore: Send + Sync {
    async fn create_key(&self, name: &str) -> Result<TranslationKeyRecord, RepoError>;

    async fn find_key(&self, id: Uuid) -> Result<Option<TranslationKeyRecord>, RepoError>;

    async fn set_text(&self, key_id: Uuid, locale: &str, text: &str) -> Result<(), RepoError>;

    async fn text(&self, key_id: Uuid, locale: &str) -> Result<Option<String>, RepoError>;

    async fn all_translations(
        &self,
        key_id: Uuid,
    ) -> Result<BTreeMap<String, String>, RepoError>;
}

/// Existence checks only; this core never mutates shared picture rows.
#[async_trait]
pub trait PictureRepo: Send + Sync {
    async fn exists(&self, id: Uuid) -> Result<bool, RepoError>;
}

/// Existence checks only; this core never mutates shared video rows.
#[async_trait]
pub trait VideoRepo: Send + Sync {
    async fn exists(&self, id: Uuid) -> Result<bool, RepoError>;
}

/// Persistence of content blocks and their entities for every parent kind.
///
/// Every method that writes more than one row executes as a single
/// transaction in the Postgres implementation; callers observe either full
/// success or no change.
#[async_trait]
pub trait ContentRepo: Send + Sync {
    async fn list_blocks(&self, parent: ParentRef) -> Result<Vec<ContentBlockRecord>, RepoError>;

    async fn find_block(
        &self,
        parent: ParentRef,
        block_id: Uuid,
    ) -> Result<Option<ContentBlockRecord>, RepoError>;

    async fn count_blocks(&self, parent: ParentRef) -> Result<u64, RepoError>;

    /// `max(sort_order) + 1` for the parent, `1` when no blocks exist.
    async fn next_sort_order(&self, parent: ParentRef) -> Result<i32, RepoError>;

    /// Create the entity (resolving any `KeySource::Copied` into fresh
    /// translation keys) and its block row at the given order.
    async fn insert_block(
        &self,
        parent: ParentRef,
        entity: NewContentEntity,
        sort_order: i32,
    ) -> Result<ContentBlockRecord, RepoError>;

    async fn update_markdown(
        &self,
        markdown_id: Uuid,
        translation_key_id: Uuid,
    ) -> Result<MarkdownRecord, RepoError>;

    /// Update layout/columns; `pictures: Some(..)` (even empty) replaces the
    /// whole pivot set, `None` leaves attachments untouched.
    async fn update_gallery(
        &self,
        gallery_id: Uuid,
        layout: GalleryLayout,
        columns: Option<i32>,
        pictures: Option<&[Uuid]>,
    ) -> Result<GalleryRecord, RepoError>;

    async fn update_video(
        &self,
        video_content_id: Uuid,
        video_id: Uuid,
        caption_translation_key_id: Option<Uuid>,
    ) -> Result<VideoContentRecord, RepoError>;

    /// Apply explicit `(block_id, sort_order)` assignments for blocks of the
    /// given parent, staging through out-of-range values so swaps never
    /// transit a colliding state.
    async fn apply_sort_orders(
        &self,
        parent: ParentRef,
        assignments: &[(Uuid, i32)],
    ) -> Result<(), RepoError>;

    /// Delete the block, its entity, and its pivot rows. Translation keys
    /// are dropped only when no other entity still references them; shared
    /// picture/video rows are left intact.
    async fn delete_block(&self, parent: ParentRef, block_id: Uuid) -> Result<(), RepoError>;

    async fn load_snapshot(
        &self,
        parent: ParentRef,
        block_id: Uuid,
    ) -> Result<Option<ContentSnapshot>, RepoError>;

    async fn load_snapshots(&self, parent: ParentRef) -> Result<Vec<ContentSnapshot>, RepoError>;
}

#[derive(Debug, Clone)]
pub struct GameReviewFields {
    pub rating: i16,
    pub pros: Option<String>,
    pub cons: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BlogPostFields {
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub cover_picture_id: Option<Uuid>,
    pub kind: PostKind,
    pub game_review: Option<GameReviewFields>,
}

#[derive(Debug, Clone)]
pub struct NewBlogDraft {
    pub original_post_id: Option<Uuid>,
    pub fields: BlogPostFields,
}

/// Blog aggregate persistence. The composite operations (`create_draft`,
/// `create_post_from_draft`, `replace_post`, the deletes) are each one
/// transaction covering parent scalars, game-review sub-entity, block
/// copies, and retirement.
#[async_trait]
pub trait BlogRepo: Send + Sync {
    async fn find_post(&self, id: Uuid) -> Result<Option<BlogPostRecord>, RepoError>;

    async fn find_draft(&self, id: Uuid) -> Result<Option<BlogPostDraftRecord>, RepoError>;

    async fn find_draft_for_post(
        &self,
        post_id: Uuid,
    ) -> Result<Option<BlogPostDraftRecord>, RepoError>;

    async fn find_game_review(&self, post_id: Uuid)
    -> Result<Option<GameReviewRecord>, RepoError>;

    async fn find_game_review_draft(
        &self,
        draft_id: Uuid,
    ) -> Result<Option<GameReviewDraftRecord>, RepoError>;

    async fn create_draft(
        &self,
        draft: NewBlogDraft,
        blocks: &[BlockCopy],
    ) -> Result<BlogPostDraftRecord, RepoError>;

    /// Create a brand-new published post from the draft's fields and block
    /// copies, and set the draft's back-reference to it.
    async fn create_post_from_draft(
        &self,
        draft_id: Uuid,
        fields: BlogPostFields,
        blocks: &[BlockCopy],
    ) -> Result<BlogPostRecord, RepoError>;

    /// Update the published post's scalars, insert the new block copies,
    /// then delete exactly the listed old blocks with their entities and
    /// owned keys. Runs retirement last so a failure never leaves the post
    /// without content.
    async fn replace_post(
        &self,
        post_id: Uuid,
        fields: BlogPostFields,
        blocks: &[BlockCopy],
        retire_block_ids: &[Uuid],
    ) -> Result<BlogPostRecord, RepoError>;

    /// Delete the draft and its block trees. Returns false when no such
    /// draft exists. Published data is never touched.
    async fn delete_draft(&self, id: Uuid) -> Result<bool, RepoError>;

    /// Delete the published post, its block trees, and any draft (with its
    /// block trees) referencing it.
    async fn delete_post(&self, id: Uuid) -> Result<bool, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreationFields {
    pub name: String,
    pub slug: String,
    pub summary: Option<String>,
    pub cover_picture_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewCreationDraft {
    pub original_creation_id: Option<Uuid>,
    pub fields: CreationFields,
}

/// Creation aggregate persistence; same transactional shape as [`BlogRepo`].
#[async_trait]
pub trait CreationRepo: Send + Sync {
    async fn find_creation(&self, id: Uuid) -> Result<Option<CreationRecord>, RepoError>;

    async fn find_draft(&self, id: Uuid) -> Result<Option<CreationDraftRecord>, RepoError>;

    async fn find_draft_for_creation(
        &self,
        creation_id: Uuid,
    ) -> Result<Option<CreationDraftRecord>, RepoError>;

    async fn create_draft(
        &self,
        draft: NewCreationDraft,
        blocks: &[BlockCopy],
    ) -> Result<CreationDraftRecord, RepoError>;

    async fn create_creation_from_draft(
        &self,
        draft_id: Uuid,
        fields: CreationFields,
        blocks: &[BlockCopy],
    ) -> Result<CreationRecord, RepoError>;

    async fn replace_creation(
        &self,
        creation_id: Uuid,
        fields: CreationFields,
        blocks: &[BlockCopy],
        retire_block_ids: &[Uuid],
    ) -> Result<CreationRecord, RepoError>;

    async fn delete_draft(&self, id: Uuid) -> Result<bool, RepoError>;

    async fn delete_creation(&self, id: Uuid) -> Result<bool, RepoError>;
}

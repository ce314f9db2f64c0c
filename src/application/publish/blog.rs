use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::application::error::PublishError;
use crate::application::repos::{
    BlogPostFields, BlogRepo, ContentRepo, GameReviewFields, NewBlogDraft,
};
use crate::domain::content::deep_copy;
use crate::domain::entities::{BlogPostDraftRecord, BlogPostRecord};
use crate::domain::types::{ParentRef, PostKind};

/// Draft/publish transitions for the blog aggregate.
#[derive(Clone)]
pub struct BlogPublishService {
    blog: Arc<dyn BlogRepo>,
    content: Arc<dyn ContentRepo>,
}

impl BlogPublishService {
    pub fn new(blog: Arc<dyn BlogRepo>, content: Arc<dyn ContentRepo>) -> Self {
        Self { blog, content }
    }

    /// Creates an editable draft of a published post: scalars copied, game
    /// review copied when present, every content block deep-copied with
    /// duplicated translation keys so draft edits never reach the published
    /// text. If a draft already exists for the post it is returned as-is.
    pub async fn create_draft_from_post(
        &self,
        post_id: Uuid,
    ) -> Result<BlogPostDraftRecord, PublishError> {
        let post = self
            .blog
            .find_post(post_id)
            .await?
            .ok_or_else(|| PublishError::not_found("blog post"))?;

        if let Some(existing) = self.blog.find_draft_for_post(post_id).await? {
            info!(post_id = %post_id, draft_id = %existing.id, "draft already exists, returning it");
            return Ok(existing);
        }

        let snapshots = self
            .content
            .load_snapshots(ParentRef::blog_post(post_id))
            .await?;
        let blocks = deep_copy(&snapshots);

        let game_review = match post.kind {
            PostKind::GameReview => self
                .blog
                .find_game_review(post_id)
                .await?
                .map(|review| GameReviewFields {
                    rating: review.rating,
                    pros: review.pros,
                    cons: review.cons,
                }),
            PostKind::Article => None,
        };

        let draft = self
            .blog
            .create_draft(
                NewBlogDraft {
                    original_post_id: Some(post_id),
                    fields: BlogPostFields {
                        slug: post.slug,
                        title: post.title,
                        excerpt: post.excerpt,
                        cover_picture_id: post.cover_picture_id,
                        kind: post.kind,
                        game_review,
                    },
                },
                &blocks,
            )
            .await?;

        info!(post_id = %post_id, draft_id = %draft.id, blocks = blocks.len(), "created draft from post");
        Ok(draft)
    }

    /// Promotes a draft. Without a back-reference this creates a brand-new
    /// published post; with one it updates the post in place: new deep
    /// copies are inserted first and the previously published blocks (with
    /// their entities and owned keys) are retired last, all in one
    /// transaction. The draft keeps its own content and stays
    /// re-publishable.
    pub async fn publish_draft(&self, draft_id: Uuid) -> Result<BlogPostRecord, PublishError> {
        let draft = self
            .blog
            .find_draft(draft_id)
            .await?
            .ok_or_else(|| PublishError::not_found("blog post draft"))?;

        let snapshots = self
            .content
            .load_snapshots(ParentRef::blog_post_draft(draft_id))
            .await?;
        if snapshots.is_empty() {
            return Err(PublishError::EmptyDraft);
        }
        let blocks = deep_copy(&snapshots);

        let game_review = match draft.kind {
            PostKind::GameReview => self
                .blog
                .find_game_review_draft(draft_id)
                .await?
                .map(|review| GameReviewFields {
                    rating: review.rating,
                    pros: review.pros,
                    cons: review.cons,
                }),
            PostKind::Article => None,
        };

        let fields = BlogPostFields {
            slug: draft.slug,
            title: draft.title,
            excerpt: draft.excerpt,
            cover_picture_id: draft.cover_picture_id,
            kind: draft.kind,
            game_review,
        };

        let post = match draft.original_post_id {
            None => {
                let post = self
                    .blog
                    .create_post_from_draft(draft_id, fields, &blocks)
                    .await?;
                info!(draft_id = %draft_id, post_id = %post.id, "published draft as new post");
                post
            }
            Some(post_id) => {
                self.blog
                    .find_post(post_id)
                    .await?
                    .ok_or_else(|| PublishError::not_found("blog post"))?;

                let retired: Vec<Uuid> = self
                    .content
                    .list_blocks(ParentRef::blog_post(post_id))
                    .await?
                    .into_iter()
                    .map(|block| block.id)
                    .collect();

                let post = self
                    .blog
                    .replace_post(post_id, fields, &blocks, &retired)
                    .await?;
                info!(
                    draft_id = %draft_id,
                    post_id = %post_id,
                    published = blocks.len(),
                    retired = retired.len(),
                    "published draft over existing post"
                );
                post
            }
        };

        Ok(post)
    }

    /// Deletes the draft and its content trees; the published counterpart is
    /// untouched. Returns false when the draft does not exist.
    pub async fn delete_draft(&self, draft_id: Uuid) -> Result<bool, PublishError> {
        let deleted = self.blog.delete_draft(draft_id).await?;
        if deleted {
            info!(draft_id = %draft_id, "deleted blog draft");
        }
        Ok(deleted)
    }

    /// Deletes the published post, its content trees, and any draft that
    /// references it.
    pub async fn delete_post(&self, post_id: Uuid) -> Result<bool, PublishError> {
        let deleted = self.blog.delete_post(post_id).await?;
        if deleted {
            info!(post_id = %post_id, "deleted blog post");
        }
        Ok(deleted)
    }
}

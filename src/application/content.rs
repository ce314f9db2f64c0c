//! Generic content-block service: CRUD, reorder, duplicate, and the
//! has-content signal over every parent container kind.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::application::error::ContentError;
use crate::application::repos::{
    ContentRepo, PictureRepo, RepoError, TranslationKeyStore, VideoRepo,
};
use crate::domain::content::{KeySource, NewContentEntity, NewGalleryPicture, shallow_copy};
use crate::domain::entities::{
    ContentBlockRecord, GalleryRecord, MarkdownRecord, VideoContentRecord,
};
use crate::domain::types::{GalleryLayout, ParentRef};

/// Caller-supplied gallery payload. `pictures: Some(..)` (even when empty)
/// replaces the attachment set on update; `None` leaves it untouched.
#[derive(Debug, Clone)]
pub struct GalleryData {
    pub layout: GalleryLayout,
    pub columns: Option<i32>,
    pub pictures: Option<Vec<Uuid>>,
}

#[derive(Clone)]
pub struct ContentBlockService {
    content: Arc<dyn ContentRepo>,
    translations: Arc<dyn TranslationKeyStore>,
    pictures: Arc<dyn PictureRepo>,
    videos: Arc<dyn VideoRepo>,
}

impl ContentBlockService {
    pub fn new(
        content: Arc<dyn ContentRepo>,
        translations: Arc<dyn TranslationKeyStore>,
        pictures: Arc<dyn PictureRepo>,
        videos: Arc<dyn VideoRepo>,
    ) -> Self {
        Self {
            content,
            translations,
            pictures,
            videos,
        }
    }

    pub async fn create_markdown(
        &self,
        parent: ParentRef,
        translation_key_id: Uuid,
        sort_order: Option<i32>,
    ) -> Result<ContentBlockRecord, ContentError> {
        self.ensure_key_exists(translation_key_id).await?;
        let sort_order = self.resolve_sort_order(parent, sort_order).await?;
        let block = self
            .content
            .insert_block(
                parent,
                NewContentEntity::Markdown {
                    key: KeySource::Existing(translation_key_id),
                },
                sort_order,
            )
            .await?;
        debug!(block_id = %block.id, parent = parent.kind.as_str(), "created markdown block");
        Ok(block)
    }

    pub async fn create_gallery(
        &self,
        parent: ParentRef,
        data: GalleryData,
        sort_order: Option<i32>,
    ) -> Result<ContentBlockRecord, ContentError> {
        let picture_ids = data.pictures.unwrap_or_default();
        self.ensure_pictures_exist(&picture_ids).await?;

        let pictures = picture_ids
            .iter()
            .enumerate()
            .map(|(index, picture_id)| NewGalleryPicture {
                picture_id: *picture_id,
                sort_order: index as i32 + 1,
                caption: None,
            })
            .collect();

        let sort_order = self.resolve_sort_order(parent, sort_order).await?;
        let block = self
            .content
            .insert_block(
                parent,
                NewContentEntity::Gallery {
                    layout: data.layout,
                    columns: data.columns,
                    pictures,
                },
                sort_order,
            )
            .await?;
        debug!(block_id = %block.id, parent = parent.kind.as_str(), "created gallery block");
        Ok(block)
    }

    pub async fn create_video(
        &self,
        parent: ParentRef,
        video_id: Uuid,
        caption_translation_key_id: Option<Uuid>,
        sort_order: Option<i32>,
    ) -> Result<ContentBlockRecord, ContentError> {
        if !self.videos.exists(video_id).await? {
            return Err(ContentError::not_found("video"));
        }
        if let Some(key_id) = caption_translation_key_id {
            self.ensure_key_exists(key_id).await?;
        }

        let sort_order = self.resolve_sort_order(parent, sort_order).await?;
        let block = self
            .content
            .insert_block(
                parent,
                NewContentEntity::Video {
                    video_id,
                    caption: caption_translation_key_id.map(KeySource::Existing),
                },
                sort_order,
            )
            .await?;
        debug!(block_id = %block.id, parent = parent.kind.as_str(), "created video block");
        Ok(block)
    }

    /// Repoints the markdown entity's key reference. The previous key is
    /// deliberately left alive: some call sites repoint to shared keys.
    pub async fn update_markdown(
        &self,
        markdown_id: Uuid,
        translation_key_id: Uuid,
    ) -> Result<MarkdownRecord, ContentError> {
        self.ensure_key_exists(translation_key_id).await?;
        self.content
            .update_markdown(markdown_id, translation_key_id)
            .await
            .map_err(|err| not_found_as("markdown content", err))
    }

    pub async fn update_gallery(
        &self,
        gallery_id: Uuid,
        data: GalleryData,
    ) -> Result<GalleryRecord, ContentError> {
        if let Some(picture_ids) = data.pictures.as_deref() {
            self.ensure_pictures_exist(picture_ids).await?;
        }
        self.content
            .update_gallery(
                gallery_id,
                data.layout,
                data.columns,
                data.pictures.as_deref(),
            )
            .await
            .map_err(|err| not_found_as("gallery content", err))
    }

    /// Repoints both the video reference and the caption key. Passing `None`
    /// clears the caption without deleting the old key.
    pub async fn update_video(
        &self,
        video_content_id: Uuid,
        video_id: Uuid,
        caption_translation_key_id: Option<Uuid>,
    ) -> Result<VideoContentRecord, ContentError> {
        if !self.videos.exists(video_id).await? {
            return Err(ContentError::not_found("video"));
        }
        if let Some(key_id) = caption_translation_key_id {
            self.ensure_key_exists(key_id).await?;
        }
        self.content
            .update_video(video_content_id, video_id, caption_translation_key_id)
            .await
            .map_err(|err| not_found_as("video content", err))
    }

    /// Assigns `index + 1` to each listed block. Blocks of the parent not in
    /// the list keep their current order; an id belonging to a different
    /// parent (or listed twice) fails validation before any write.
    pub async fn reorder(
        &self,
        parent: ParentRef,
        ordered_block_ids: &[Uuid],
    ) -> Result<(), ContentError> {
        if ordered_block_ids.is_empty() {
            return Ok(());
        }

        let blocks = self.content.list_blocks(parent).await?;
        let owned: HashSet<Uuid> = blocks.iter().map(|block| block.id).collect();

        let mut seen = HashSet::new();
        for block_id in ordered_block_ids {
            if !owned.contains(block_id) {
                return Err(ContentError::validation(format!(
                    "content block `{block_id}` does not belong to this parent"
                )));
            }
            if !seen.insert(*block_id) {
                return Err(ContentError::validation(format!(
                    "content block `{block_id}` listed more than once"
                )));
            }
        }

        let assignments: Vec<(Uuid, i32)> = ordered_block_ids
            .iter()
            .enumerate()
            .map(|(index, block_id)| (*block_id, index as i32 + 1))
            .collect();

        self.content.apply_sort_orders(parent, &assignments).await?;
        debug!(parent = parent.kind.as_str(), count = assignments.len(), "reordered blocks");
        Ok(())
    }

    /// Deletes the block with its entity, pivot rows, and translation keys,
    /// in one transaction. Keys still referenced elsewhere (shallow
    /// duplicates share them) survive, as do shared pictures and videos.
    pub async fn delete(&self, parent: ParentRef, block_id: Uuid) -> Result<(), ContentError> {
        let block = self
            .content
            .find_block(parent, block_id)
            .await?
            .ok_or_else(|| ContentError::not_found("content block"))?;

        self.content.delete_block(parent, block.id).await?;
        debug!(block_id = %block.id, parent = parent.kind.as_str(), "deleted block");
        Ok(())
    }

    /// Shallow-copies the block onto the same parent at `max(order) + 1`:
    /// new entity rows, shared translation keys and picture attachments.
    pub async fn duplicate(
        &self,
        parent: ParentRef,
        block_id: Uuid,
    ) -> Result<ContentBlockRecord, ContentError> {
        let snapshot = self
            .content
            .load_snapshot(parent, block_id)
            .await?
            .ok_or_else(|| ContentError::not_found("content block"))?;

        let sort_order = self.content.next_sort_order(parent).await?;
        let plan = shallow_copy(&snapshot, sort_order);
        let block = self
            .content
            .insert_block(parent, plan.entity, plan.sort_order)
            .await?;
        debug!(
            source = %block_id,
            block_id = %block.id,
            parent = parent.kind.as_str(),
            "duplicated block"
        );
        Ok(block)
    }

    /// True iff the parent has at least one content block. Publishing an
    /// empty parent is refused by the converters; this signal lets callers
    /// check up front.
    pub async fn has_content(&self, parent: ParentRef) -> Result<bool, ContentError> {
        Ok(self.content.count_blocks(parent).await? > 0)
    }

    async fn resolve_sort_order(
        &self,
        parent: ParentRef,
        sort_order: Option<i32>,
    ) -> Result<i32, ContentError> {
        match sort_order {
            Some(sort_order) => Ok(sort_order),
            None => Ok(self.content.next_sort_order(parent).await?),
        }
    }

    async fn ensure_key_exists(&self, key_id: Uuid) -> Result<(), ContentError> {
        self.translations
            .find_key(key_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| ContentError::not_found("translation key"))
    }

    async fn ensure_pictures_exist(&self, picture_ids: &[Uuid]) -> Result<(), ContentError> {
        for picture_id in picture_ids {
            if !self.pictures.exists(*picture_id).await? {
                return Err(ContentError::not_found("picture"));
            }
        }
        Ok(())
    }
}

fn not_found_as(entity: &'static str, err: RepoError) -> ContentError {
    match err {
        RepoError::NotFound => ContentError::not_found(entity),
        other => ContentError::Repo(other),
    }
}

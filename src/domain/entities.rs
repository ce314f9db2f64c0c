//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::types::{ContentKind, GalleryLayout, ParentKind, PostKind};

/// Ordered polymorphic join row linking one parent container to one content
/// entity. `sort_order` is 1-based within the parent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentBlockRecord {
    pub id: Uuid,
    pub parent: ParentKind,
    pub parent_id: Uuid,
    pub content_type: ContentKind,
    pub content_id: Uuid,
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkdownRecord {
    pub id: Uuid,
    pub translation_key_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryRecord {
    pub id: Uuid,
    pub layout: GalleryLayout,
    pub columns: Option<i32>,
    pub pictures: Vec<GalleryPictureRecord>,
}

/// One pivot row of a gallery's picture attachment. The picture itself is
/// shared; the caption key, when present, is owned by this pivot row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryPictureRecord {
    pub picture_id: Uuid,
    pub sort_order: i32,
    pub caption_translation_key_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoContentRecord {
    pub id: Uuid,
    pub video_id: Uuid,
    pub caption_translation_key_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationKeyRecord {
    pub id: Uuid,
    pub name: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogPostRecord {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub cover_picture_id: Option<Uuid>,
    pub kind: PostKind,
    pub published_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogPostDraftRecord {
    pub id: Uuid,
    pub original_post_id: Option<Uuid>,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub cover_picture_id: Option<Uuid>,
    pub kind: PostKind,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameReviewRecord {
    pub id: Uuid,
    pub blog_post_id: Uuid,
    pub rating: i16,
    pub pros: Option<String>,
    pub cons: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameReviewDraftRecord {
    pub id: Uuid,
    pub blog_post_draft_id: Uuid,
    pub rating: i16,
    pub pros: Option<String>,
    pub cons: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreationRecord {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub summary: Option<String>,
    pub cover_picture_id: Option<Uuid>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreationDraftRecord {
    pub id: Uuid,
    pub original_creation_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub summary: Option<String>,
    pub cover_picture_id: Option<Uuid>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

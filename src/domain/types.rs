//! Shared domain enumerations persisted as text columns.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The four containers that own an ordered list of content blocks.
///
/// Draft and published containers share an identical block-table shape; the
/// persistence layer maps each kind to its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentKind {
    BlogPostDraft,
    BlogPost,
    CreationDraft,
    Creation,
}

impl ParentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ParentKind::BlogPostDraft => "blog_post_draft",
            ParentKind::BlogPost => "blog_post",
            ParentKind::CreationDraft => "creation_draft",
            ParentKind::Creation => "creation",
        }
    }
}

/// A concrete parent container instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParentRef {
    pub kind: ParentKind,
    pub id: Uuid,
}

impl ParentRef {
    pub fn new(kind: ParentKind, id: Uuid) -> Self {
        Self { kind, id }
    }

    pub fn blog_post(id: Uuid) -> Self {
        Self::new(ParentKind::BlogPost, id)
    }

    pub fn blog_post_draft(id: Uuid) -> Self {
        Self::new(ParentKind::BlogPostDraft, id)
    }

    pub fn creation(id: Uuid) -> Self {
        Self::new(ParentKind::Creation, id)
    }

    pub fn creation_draft(id: Uuid) -> Self {
        Self::new(ParentKind::CreationDraft, id)
    }
}

/// Discriminator for the content-entity variant a block points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Markdown,
    Gallery,
    Video,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Markdown => "markdown",
            ContentKind::Gallery => "gallery",
            ContentKind::Video => "video",
        }
    }
}

impl TryFrom<&str> for ContentKind {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "markdown" => Ok(ContentKind::Markdown),
            "gallery" => Ok(ContentKind::Gallery),
            "video" => Ok(ContentKind::Video),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GalleryLayout {
    Grid,
    Masonry,
    Carousel,
}

impl GalleryLayout {
    pub fn as_str(self) -> &'static str {
        match self {
            GalleryLayout::Grid => "grid",
            GalleryLayout::Masonry => "masonry",
            GalleryLayout::Carousel => "carousel",
        }
    }
}

impl TryFrom<&str> for GalleryLayout {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "grid" => Ok(GalleryLayout::Grid),
            "masonry" => Ok(GalleryLayout::Masonry),
            "carousel" => Ok(GalleryLayout::Carousel),
            _ => Err(()),
        }
    }
}

/// Blog post category; `GameReview` posts carry a review sub-entity whose
/// scalars follow the post through the draft/publish transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostKind {
    Article,
    GameReview,
}

impl PostKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PostKind::Article => "article",
            PostKind::GameReview => "game_review",
        }
    }
}

impl TryFrom<&str> for PostKind {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "article" => Ok(PostKind::Article),
            "game_review" => Ok(PostKind::GameReview),
            _ => Err(()),
        }
    }
}

//! Copy planning for content blocks.
//!
//! Two distinct copy semantics exist and must not be unified:
//!
//! - [`shallow_copy`] backs "duplicate this block in place": new entity rows,
//!   but translation keys (markdown bodies, gallery/video captions) stay
//!   shared with the source block.
//! - [`deep_copy`] backs the draft/publish transitions: every owned
//!   translation key is duplicated (all locales), so edits on one side of the
//!   draft/published pair never leak into the other.
//!
//! Plans are pure values; the persistence layer applies a plan inside a
//! single transaction.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::domain::entities::ContentBlockRecord;
use crate::domain::types::GalleryLayout;

/// Suffix appended to duplicated translation-key names so a copy never
/// collides with its source.
const COPY_SUFFIX: &str = "_copy";

/// A fully loaded content block: the join row plus its entity and every
/// owned translation key with all locale texts.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentSnapshot {
    pub block: ContentBlockRecord,
    pub entity: EntitySnapshot,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntitySnapshot {
    Markdown {
        id: Uuid,
        key: KeySnapshot,
    },
    Gallery {
        id: Uuid,
        layout: GalleryLayout,
        columns: Option<i32>,
        pictures: Vec<PictureSnapshot>,
    },
    Video {
        id: Uuid,
        video_id: Uuid,
        caption: Option<KeySnapshot>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeySnapshot {
    pub id: Uuid,
    pub name: String,
    pub texts: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PictureSnapshot {
    pub picture_id: Uuid,
    pub sort_order: i32,
    pub caption: Option<KeySnapshot>,
}

/// Where a copied entity's translation-key reference comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum KeySource {
    /// Reuse an existing key by id (shallow copy, or caller-supplied key).
    Existing(Uuid),
    /// Create a fresh key with this name and these locale texts.
    Copied {
        name: String,
        texts: BTreeMap<String, String>,
    },
}

/// One block to materialize on a target parent.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockCopy {
    pub sort_order: i32,
    pub entity: NewContentEntity,
}

/// Payload for a content entity about to be created.
#[derive(Debug, Clone, PartialEq)]
pub enum NewContentEntity {
    Markdown {
        key: KeySource,
    },
    Gallery {
        layout: GalleryLayout,
        columns: Option<i32>,
        pictures: Vec<NewGalleryPicture>,
    },
    Video {
        video_id: Uuid,
        caption: Option<KeySource>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewGalleryPicture {
    pub picture_id: Uuid,
    pub sort_order: i32,
    pub caption: Option<KeySource>,
}

pub fn copied_key_name(name: &str) -> String {
    format!("{name}{COPY_SUFFIX}")
}

/// Plan an independent copy of every block: translation keys are duplicated
/// with all locale texts and a disambiguated name; shared pictures and
/// videos are referenced, never cloned. Block orders are preserved.
pub fn deep_copy(snapshots: &[ContentSnapshot]) -> Vec<BlockCopy> {
    snapshots
        .iter()
        .map(|snapshot| BlockCopy {
            sort_order: snapshot.block.sort_order,
            entity: deep_copy_entity(&snapshot.entity),
        })
        .collect()
}

fn deep_copy_entity(entity: &EntitySnapshot) -> NewContentEntity {
    match entity {
        EntitySnapshot::Markdown { key, .. } => NewContentEntity::Markdown {
            key: duplicated_key(key),
        },
        EntitySnapshot::Gallery {
            layout,
            columns,
            pictures,
            ..
        } => NewContentEntity::Gallery {
            layout: *layout,
            columns: *columns,
            pictures: pictures
                .iter()
                .map(|picture| NewGalleryPicture {
                    picture_id: picture.picture_id,
                    sort_order: picture.sort_order,
                    caption: picture.caption.as_ref().map(duplicated_key),
                })
                .collect(),
        },
        EntitySnapshot::Video {
            video_id, caption, ..
        } => NewContentEntity::Video {
            video_id: *video_id,
            caption: caption.as_ref().map(duplicated_key),
        },
    }
}

fn duplicated_key(key: &KeySnapshot) -> KeySource {
    KeySource::Copied {
        name: copied_key_name(&key.name),
        texts: key.texts.clone(),
    }
}

/// Plan an in-place duplicate of one block: new entity rows at the given
/// order, with every translation-key reference shared with the source.
pub fn shallow_copy(snapshot: &ContentSnapshot, sort_order: i32) -> BlockCopy {
    let entity = match &snapshot.entity {
        EntitySnapshot::Markdown { key, .. } => NewContentEntity::Markdown {
            key: KeySource::Existing(key.id),
        },
        EntitySnapshot::Gallery {
            layout,
            columns,
            pictures,
            ..
        } => NewContentEntity::Gallery {
            layout: *layout,
            columns: *columns,
            pictures: pictures
                .iter()
                .map(|picture| NewGalleryPicture {
                    picture_id: picture.picture_id,
                    sort_order: picture.sort_order,
                    caption: picture
                        .caption
                        .as_ref()
                        .map(|key| KeySource::Existing(key.id)),
                })
                .collect(),
        },
        EntitySnapshot::Video {
            video_id, caption, ..
        } => NewContentEntity::Video {
            video_id: *video_id,
            caption: caption.as_ref().map(|key| KeySource::Existing(key.id)),
        },
    };

    BlockCopy { sort_order, entity }
}

/// Translation-key ids owned by this entity, in no particular order. Used to
/// compute what a retirement pass must delete alongside the entity rows.
pub fn owned_key_ids(entity: &EntitySnapshot) -> Vec<Uuid> {
    match entity {
        EntitySnapshot::Markdown { key, .. } => vec![key.id],
        EntitySnapshot::Gallery { pictures, .. } => pictures
            .iter()
            .filter_map(|picture| picture.caption.as_ref().map(|key| key.id))
            .collect(),
        EntitySnapshot::Video { caption, .. } => {
            caption.as_ref().map(|key| vec![key.id]).unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ContentKind, ParentKind};

    fn key(name: &str, locales: &[(&str, &str)]) -> KeySnapshot {
        KeySnapshot {
            id: Uuid::new_v4(),
            name: name.to_string(),
            texts: locales
                .iter()
                .map(|(locale, text)| (locale.to_string(), text.to_string()))
                .collect(),
        }
    }

    fn block(sort_order: i32, content_type: ContentKind) -> ContentBlockRecord {
        ContentBlockRecord {
            id: Uuid::new_v4(),
            parent: ParentKind::BlogPostDraft,
            parent_id: Uuid::new_v4(),
            content_type,
            content_id: Uuid::new_v4(),
            sort_order,
        }
    }

    fn markdown_snapshot(sort_order: i32, key: KeySnapshot) -> ContentSnapshot {
        ContentSnapshot {
            block: block(sort_order, ContentKind::Markdown),
            entity: EntitySnapshot::Markdown {
                id: Uuid::new_v4(),
                key,
            },
        }
    }

    #[test]
    fn deep_copy_duplicates_keys_with_all_locales() {
        let source = key("posts.intro", &[("en", "Hello"), ("fr", "Bonjour")]);
        let plan = deep_copy(&[markdown_snapshot(1, source.clone())]);

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].sort_order, 1);
        match &plan[0].entity {
            NewContentEntity::Markdown {
                key: KeySource::Copied { name, texts },
            } => {
                assert_eq!(name, "posts.intro_copy");
                assert_eq!(texts.get("en").unwrap(), "Hello");
                assert_eq!(texts.get("fr").unwrap(), "Bonjour");
            }
            other => panic!("expected copied markdown key, got {other:?}"),
        }
    }

    #[test]
    fn deep_copy_preserves_block_and_picture_orders() {
        let p1 = Uuid::new_v4();
        let p2 = Uuid::new_v4();
        let gallery = ContentSnapshot {
            block: block(3, ContentKind::Gallery),
            entity: EntitySnapshot::Gallery {
                id: Uuid::new_v4(),
                layout: GalleryLayout::Masonry,
                columns: Some(2),
                pictures: vec![
                    PictureSnapshot {
                        picture_id: p1,
                        sort_order: 1,
                        caption: Some(key("captions.one", &[("en", "First")])),
                    },
                    PictureSnapshot {
                        picture_id: p2,
                        sort_order: 2,
                        caption: None,
                    },
                ],
            },
        };

        let plan = deep_copy(&[gallery]);
        assert_eq!(plan[0].sort_order, 3);
        match &plan[0].entity {
            NewContentEntity::Gallery {
                layout,
                columns,
                pictures,
            } => {
                assert_eq!(*layout, GalleryLayout::Masonry);
                assert_eq!(*columns, Some(2));
                assert_eq!(pictures[0].picture_id, p1);
                assert_eq!(pictures[0].sort_order, 1);
                assert!(matches!(
                    pictures[0].caption,
                    Some(KeySource::Copied { .. })
                ));
                assert_eq!(pictures[1].picture_id, p2);
                assert_eq!(pictures[1].sort_order, 2);
                assert!(pictures[1].caption.is_none());
            }
            other => panic!("expected gallery, got {other:?}"),
        }
    }

    #[test]
    fn deep_copy_references_shared_video_by_id() {
        let video_id = Uuid::new_v4();
        let snapshot = ContentSnapshot {
            block: block(1, ContentKind::Video),
            entity: EntitySnapshot::Video {
                id: Uuid::new_v4(),
                video_id,
                caption: Some(key("captions.video", &[("en", "Clip")])),
            },
        };

        let plan = deep_copy(&[snapshot]);
        match &plan[0].entity {
            NewContentEntity::Video {
                video_id: copied,
                caption,
            } => {
                assert_eq!(*copied, video_id);
                assert!(matches!(caption, Some(KeySource::Copied { .. })));
            }
            other => panic!("expected video, got {other:?}"),
        }
    }

    #[test]
    fn shallow_copy_shares_every_key_reference() {
        let markdown_key = key("posts.body", &[("en", "Body")]);
        let caption_key = key("captions.one", &[("en", "First")]);
        let p1 = Uuid::new_v4();

        let markdown = markdown_snapshot(1, markdown_key.clone());
        let plan = shallow_copy(&markdown, 5);
        assert_eq!(plan.sort_order, 5);
        assert_eq!(
            plan.entity,
            NewContentEntity::Markdown {
                key: KeySource::Existing(markdown_key.id),
            }
        );

        let gallery = ContentSnapshot {
            block: block(2, ContentKind::Gallery),
            entity: EntitySnapshot::Gallery {
                id: Uuid::new_v4(),
                layout: GalleryLayout::Grid,
                columns: None,
                pictures: vec![PictureSnapshot {
                    picture_id: p1,
                    sort_order: 1,
                    caption: Some(caption_key.clone()),
                }],
            },
        };
        let plan = shallow_copy(&gallery, 6);
        match plan.entity {
            NewContentEntity::Gallery { pictures, .. } => {
                assert_eq!(
                    pictures[0].caption,
                    Some(KeySource::Existing(caption_key.id))
                );
            }
            other => panic!("expected gallery, got {other:?}"),
        }
    }

    #[test]
    fn copied_key_names_never_collide_with_source() {
        assert_eq!(copied_key_name("a"), "a_copy");
        assert_eq!(copied_key_name("a_copy"), "a_copy_copy");
        assert_ne!(copied_key_name("x"), "x");
    }

    #[test]
    fn owned_key_ids_skip_missing_captions() {
        let caption = key("captions.only", &[("en", "One")]);
        let entity = EntitySnapshot::Gallery {
            id: Uuid::new_v4(),
            layout: GalleryLayout::Grid,
            columns: None,
            pictures: vec![
                PictureSnapshot {
                    picture_id: Uuid::new_v4(),
                    sort_order: 1,
                    caption: Some(caption.clone()),
                },
                PictureSnapshot {
                    picture_id: Uuid::new_v4(),
                    sort_order: 2,
                    caption: None,
                },
            ],
        };

        assert_eq!(owned_key_ids(&entity), vec![caption.id]);

        let video = EntitySnapshot::Video {
            id: Uuid::new_v4(),
            video_id: Uuid::new_v4(),
            caption: None,
        };
        assert!(owned_key_ids(&video).is_empty());
    }
}

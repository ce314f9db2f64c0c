use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::application::error::PublishError;
use crate::application::repos::{ContentRepo, CreationFields, CreationRepo, NewCreationDraft};
use crate::domain::content::deep_copy;
use crate::domain::entities::{CreationDraftRecord, CreationRecord};
use crate::domain::types::ParentRef;

/// Draft/publish transitions for the creation (portfolio entry) aggregate.
/// Same shape as the blog converter, without the game-review sub-entity.
#[derive(Clone)]
pub struct CreationPublishService {
    creations: Arc<dyn CreationRepo>,
    content: Arc<dyn ContentRepo>,
}

impl CreationPublishService {
    pub fn new(creations: Arc<dyn CreationRepo>, content: Arc<dyn ContentRepo>) -> Self {
        Self { creations, content }
    }

    pub async fn create_draft_from_creation(
        &self,
        creation_id: Uuid,
    ) -> Result<CreationDraftRecord, PublishError> {
        let creation = self
            .creations
            .find_creation(creation_id)
            .await?
            .ok_or_else(|| PublishError::not_found("creation"))?;

        if let Some(existing) = self.creations.find_draft_for_creation(creation_id).await? {
            info!(creation_id = %creation_id, draft_id = %existing.id, "draft already exists, returning it");
            return Ok(existing);
        }

        let snapshots = self
            .content
            .load_snapshots(ParentRef::creation(creation_id))
            .await?;
        let blocks = deep_copy(&snapshots);

        let draft = self
            .creations
            .create_draft(
                NewCreationDraft {
                    original_creation_id: Some(creation_id),
                    fields: CreationFields {
                        name: creation.name,
                        slug: creation.slug,
                        summary: creation.summary,
                        cover_picture_id: creation.cover_picture_id,
                    },
                },
                &blocks,
            )
            .await?;

        info!(creation_id = %creation_id, draft_id = %draft.id, blocks = blocks.len(), "created draft from creation");
        Ok(draft)
    }

    pub async fn publish_draft(&self, draft_id: Uuid) -> Result<CreationRecord, PublishError> {
        let draft = self
            .creations
            .find_draft(draft_id)
            .await?
            .ok_or_else(|| PublishError::not_found("creation draft"))?;

        let snapshots = self
            .content
            .load_snapshots(ParentRef::creation_draft(draft_id))
            .await?;
        if snapshots.is_empty() {
            return Err(PublishError::EmptyDraft);
        }
        let blocks = deep_copy(&snapshots);

        let fields = CreationFields {
            name: draft.name,
            slug: draft.slug,
            summary: draft.summary,
            cover_picture_id: draft.cover_picture_id,
        };

        let creation = match draft.original_creation_id {
            None => {
                let creation = self
                    .creations
                    .create_creation_from_draft(draft_id, fields, &blocks)
                    .await?;
                info!(draft_id = %draft_id, creation_id = %creation.id, "published draft as new creation");
                creation
            }
            Some(creation_id) => {
                self.creations
                    .find_creation(creation_id)
                    .await?
                    .ok_or_else(|| PublishError::not_found("creation"))?;

                let retired: Vec<Uuid> = self
                    .content
                    .list_blocks(ParentRef::creation(creation_id))
                    .await?
                    .into_iter()
                    .map(|block| block.id)
                    .collect();

                let creation = self
                    .creations
                    .replace_creation(creation_id, fields, &blocks, &retired)
                    .await?;
                info!(
                    draft_id = %draft_id,
                    creation_id = %creation_id,
                    published = blocks.len(),
                    retired = retired.len(),
                    "published draft over existing creation"
                );
                creation
            }
        };

        Ok(creation)
    }

    pub async fn delete_draft(&self, draft_id: Uuid) -> Result<bool, PublishError> {
        let deleted = self.creations.delete_draft(draft_id).await?;
        if deleted {
            info!(draft_id = %draft_id, "deleted creation draft");
        }
        Ok(deleted)
    }

    pub async fn delete_creation(&self, creation_id: Uuid) -> Result<bool, PublishError> {
        let deleted = self.creations.delete_creation(creation_id).await?;
        if deleted {
            info!(creation_id = %creation_id, "deleted creation");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use time::OffsetDateTime;

    use crate::application::repos::RepoError;
    use crate::domain::content::{
        BlockCopy, ContentSnapshot, EntitySnapshot, KeySnapshot, KeySource, NewContentEntity,
    };
    use crate::domain::entities::{
        ContentBlockRecord, GalleryRecord, MarkdownRecord, VideoContentRecord,
    };
    use crate::domain::types::{ContentKind, GalleryLayout, ParentKind};

    #[derive(Default)]
    struct SnapshotContentRepo {
        snapshots: Mutex<HashMap<(ParentKind, Uuid), Vec<ContentSnapshot>>>,
    }

    impl SnapshotContentRepo {
        fn seed(&self, parent: ParentRef, snapshots: Vec<ContentSnapshot>) {
            self.snapshots
                .lock()
                .unwrap()
                .insert((parent.kind, parent.id), snapshots);
        }
    }

    #[async_trait]
    impl ContentRepo for SnapshotContentRepo {
        async fn list_blocks(
            &self,
            parent: ParentRef,
        ) -> Result<Vec<ContentBlockRecord>, RepoError> {
            Ok(self
                .load_snapshots(parent)
                .await?
                .into_iter()
                .map(|snapshot| snapshot.block)
                .collect())
        }

        async fn find_block(
            &self,
            _parent: ParentRef,
            _block_id: Uuid,
        ) -> Result<Option<ContentBlockRecord>, RepoError> {
            unreachable!("not used in these tests")
        }

        async fn count_blocks(&self, parent: ParentRef) -> Result<u64, RepoError> {
            Ok(self.load_snapshots(parent).await?.len() as u64)
        }

        async fn next_sort_order(&self, _parent: ParentRef) -> Result<i32, RepoError> {
            unreachable!("not used in these tests")
        }

        async fn insert_block(
            &self,
            _parent: ParentRef,
            _entity: NewContentEntity,
            _sort_order: i32,
        ) -> Result<ContentBlockRecord, RepoError> {
            unreachable!("not used in these tests")
        }

        async fn update_markdown(
            &self,
            _markdown_id: Uuid,
            _translation_key_id: Uuid,
        ) -> Result<MarkdownRecord, RepoError> {
            unreachable!("not used in these tests")
        }

        async fn update_gallery(
            &self,
            _gallery_id: Uuid,
            _layout: GalleryLayout,
            _columns: Option<i32>,
            _pictures: Option<&[Uuid]>,
        ) -> Result<GalleryRecord, RepoError> {
            unreachable!("not used in these tests")
        }

        async fn update_video(
            &self,
            _video_content_id: Uuid,
            _video_id: Uuid,
            _caption: Option<Uuid>,
        ) -> Result<VideoContentRecord, RepoError> {
            unreachable!("not used in these tests")
        }

        async fn apply_sort_orders(
            &self,
            _parent: ParentRef,
            _assignments: &[(Uuid, i32)],
        ) -> Result<(), RepoError> {
            unreachable!("not used in these tests")
        }

        async fn delete_block(&self, _parent: ParentRef, _block_id: Uuid) -> Result<(), RepoError> {
            unreachable!("not used in these tests")
        }

        async fn load_snapshot(
            &self,
            _parent: ParentRef,
            _block_id: Uuid,
        ) -> Result<Option<ContentSnapshot>, RepoError> {
            unreachable!("not used in these tests")
        }

        async fn load_snapshots(
            &self,
            parent: ParentRef,
        ) -> Result<Vec<ContentSnapshot>, RepoError> {
            Ok(self
                .snapshots
                .lock()
                .unwrap()
                .get(&(parent.kind, parent.id))
                .cloned()
                .unwrap_or_default())
        }
    }

    #[derive(Default)]
    struct RecordingCreationRepo {
        creation: Option<CreationRecord>,
        draft: Option<CreationDraftRecord>,
        draft_for_creation: Option<CreationDraftRecord>,
        created_draft: Mutex<Option<(NewCreationDraft, Vec<BlockCopy>)>>,
        created_creation: Mutex<Option<(Uuid, CreationFields, Vec<BlockCopy>)>>,
        replaced_creation: Mutex<Option<(Uuid, CreationFields, Vec<BlockCopy>, Vec<Uuid>)>>,
    }

    #[async_trait]
    impl CreationRepo for RecordingCreationRepo {
        async fn find_creation(&self, id: Uuid) -> Result<Option<CreationRecord>, RepoError> {
            Ok(self.creation.clone().filter(|creation| creation.id == id))
        }

        async fn find_draft(&self, id: Uuid) -> Result<Option<CreationDraftRecord>, RepoError> {
            Ok(self.draft.clone().filter(|draft| draft.id == id))
        }

        async fn find_draft_for_creation(
            &self,
            creation_id: Uuid,
        ) -> Result<Option<CreationDraftRecord>, RepoError> {
            Ok(self
                .draft_for_creation
                .clone()
                .filter(|draft| draft.original_creation_id == Some(creation_id)))
        }

        async fn create_draft(
            &self,
            draft: NewCreationDraft,
            blocks: &[BlockCopy],
        ) -> Result<CreationDraftRecord, RepoError> {
            let record = sample_draft(Uuid::new_v4(), draft.original_creation_id);
            *self.created_draft.lock().unwrap() = Some((draft, blocks.to_vec()));
            Ok(record)
        }

        async fn create_creation_from_draft(
            &self,
            draft_id: Uuid,
            fields: CreationFields,
            blocks: &[BlockCopy],
        ) -> Result<CreationRecord, RepoError> {
            let record = sample_creation(Uuid::new_v4());
            *self.created_creation.lock().unwrap() = Some((draft_id, fields, blocks.to_vec()));
            Ok(record)
        }

        async fn replace_creation(
            &self,
            creation_id: Uuid,
            fields: CreationFields,
            blocks: &[BlockCopy],
            retire_block_ids: &[Uuid],
        ) -> Result<CreationRecord, RepoError> {
            *self.replaced_creation.lock().unwrap() = Some((
                creation_id,
                fields,
                blocks.to_vec(),
                retire_block_ids.to_vec(),
            ));
            Ok(sample_creation(creation_id))
        }

        async fn delete_draft(&self, id: Uuid) -> Result<bool, RepoError> {
            Ok(self.draft.as_ref().is_some_and(|draft| draft.id == id))
        }

        async fn delete_creation(&self, id: Uuid) -> Result<bool, RepoError> {
            Ok(self
                .creation
                .as_ref()
                .is_some_and(|creation| creation.id == id))
        }
    }

    fn sample_creation(id: Uuid) -> CreationRecord {
        CreationRecord {
            id,
            name: "Side project".into(),
            slug: "side-project".into(),
            summary: Some("A small tool".into()),
            cover_picture_id: None,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    fn sample_draft(id: Uuid, original_creation_id: Option<Uuid>) -> CreationDraftRecord {
        CreationDraftRecord {
            id,
            original_creation_id,
            name: "Side project".into(),
            slug: "side-project".into(),
            summary: None,
            cover_picture_id: None,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    fn video_snapshot(parent: ParentRef, sort_order: i32) -> ContentSnapshot {
        ContentSnapshot {
            block: ContentBlockRecord {
                id: Uuid::new_v4(),
                parent: parent.kind,
                parent_id: parent.id,
                content_type: ContentKind::Video,
                content_id: Uuid::new_v4(),
                sort_order,
            },
            entity: EntitySnapshot::Video {
                id: Uuid::new_v4(),
                video_id: Uuid::new_v4(),
                caption: Some(KeySnapshot {
                    id: Uuid::new_v4(),
                    name: "captions.demo".into(),
                    texts: [("en".to_string(), "Demo run".to_string())]
                        .into_iter()
                        .collect(),
                }),
            },
        }
    }

    #[tokio::test]
    async fn create_draft_is_idempotent_per_creation() {
        let creation = sample_creation(Uuid::new_v4());
        let existing = sample_draft(Uuid::new_v4(), Some(creation.id));
        let repo = Arc::new(RecordingCreationRepo {
            creation: Some(creation.clone()),
            draft_for_creation: Some(existing.clone()),
            ..Default::default()
        });
        let service =
            CreationPublishService::new(repo.clone(), Arc::new(SnapshotContentRepo::default()));

        let draft = service
            .create_draft_from_creation(creation.id)
            .await
            .expect("existing draft");
        assert_eq!(draft.id, existing.id);
        assert!(repo.created_draft.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn publish_in_place_replaces_and_retires() {
        let creation = sample_creation(Uuid::new_v4());
        let draft = sample_draft(Uuid::new_v4(), Some(creation.id));
        let repo = Arc::new(RecordingCreationRepo {
            creation: Some(creation.clone()),
            draft: Some(draft.clone()),
            ..Default::default()
        });
        let content = Arc::new(SnapshotContentRepo::default());

        let draft_parent = ParentRef::creation_draft(draft.id);
        content.seed(draft_parent, vec![video_snapshot(draft_parent, 1)]);

        let creation_parent = ParentRef::creation(creation.id);
        let old = vec![video_snapshot(creation_parent, 1)];
        let old_block_id = old[0].block.id;
        content.seed(creation_parent, old);

        let service = CreationPublishService::new(repo.clone(), content);
        service.publish_draft(draft.id).await.expect("published");

        let replaced = repo.replaced_creation.lock().unwrap().take().expect("recorded");
        assert_eq!(replaced.0, creation.id);
        assert_eq!(replaced.3, vec![old_block_id]);
        match &replaced.2[0].entity {
            NewContentEntity::Video { caption, .. } => {
                assert!(matches!(caption, Some(KeySource::Copied { .. })));
            }
            other => panic!("expected video, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn publish_refuses_empty_draft() {
        let draft = sample_draft(Uuid::new_v4(), None);
        let repo = Arc::new(RecordingCreationRepo {
            draft: Some(draft.clone()),
            ..Default::default()
        });
        let service =
            CreationPublishService::new(repo, Arc::new(SnapshotContentRepo::default()));

        let result = service.publish_draft(draft.id).await;
        assert!(matches!(result, Err(PublishError::EmptyDraft)));
    }
}

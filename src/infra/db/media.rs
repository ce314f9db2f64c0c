use async_trait::async_trait;
use uuid::Uuid;

use crate::application::repos::{PictureRepo, RepoError, VideoRepo};

use super::PostgresRepositories;
use super::util::map_sqlx_error;

#[async_trait]
impl PictureRepo for PostgresRepositories {
    async fn exists(&self, id: Uuid) -> Result<bool, RepoError> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pictures WHERE id = $1)")
            .bind(id)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl VideoRepo for PostgresRepositories {
    async fn exists(&self, id: Uuid) -> Result<bool, RepoError> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM videos WHERE id = $1)")
            .bind(id)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)
    }
}

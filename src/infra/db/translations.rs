use std::collections::BTreeMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{RepoError, TranslationKeyStore};
use crate::domain::entities::TranslationKeyRecord;

use super::PostgresRepositories;
use super::util::map_sqlx_error;

#[derive(sqlx::FromRow)]
struct TranslationKeyRow {
    id: Uuid,
    name: String,
    created_at: OffsetDateTime,
}

impl From<TranslationKeyRow> for TranslationKeyRecord {
    fn from(row: TranslationKeyRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl TranslationKeyStore for PostgresRepositories {
    async fn create_key(&self, name: &str) -> Result<TranslationKeyRecord, RepoError> {
        let row = sqlx::query_as::<_, TranslationKeyRow>(
            "INSERT INTO translation_keys (id, name, created_at) VALUES ($1, $2, $3) \
             RETURNING id, name, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn find_key(&self, id: Uuid) -> Result<Option<TranslationKeyRecord>, RepoError> {
        let row = sqlx::query_as::<_, TranslationKeyRow>(
            "SELECT id, name, created_at FROM translation_keys WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn set_text(&self, key_id: Uuid, locale: &str, text: &str) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO translation_texts (key_id, locale, text) VALUES ($1, $2, $3) \
             ON CONFLICT (key_id, locale) DO UPDATE SET text = EXCLUDED.text",
        )
        .bind(key_id)
        .bind(locale)
        .bind(text)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn text(&self, key_id: Uuid, locale: &str) -> Result<Option<String>, RepoError> {
        sqlx::query_scalar(
            "SELECT text FROM translation_texts WHERE key_id = $1 AND locale = $2",
        )
        .bind(key_id)
        .bind(locale)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)
    }

    async fn all_translations(
        &self,
        key_id: Uuid,
    ) -> Result<BTreeMap<String, String>, RepoError> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT locale, text FROM translation_texts WHERE key_id = $1 ORDER BY locale",
        )
        .bind(key_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().collect())
    }
}

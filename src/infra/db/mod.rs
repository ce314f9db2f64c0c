//! Postgres-backed repository implementations.

mod blog;
mod content;
mod creations;
mod media;
mod translations;
mod util;

pub use util::map_sqlx_error;

use std::sync::Arc;

use sqlx::{
    Postgres, Transaction,
    postgres::{PgPool, PgPoolOptions},
    query,
};

use super::error::InfraError;

#[derive(Clone)]
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn begin(&self) -> Result<Transaction<'_, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool, InfraError> {
        PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|err| InfraError::database(err.to_string()))
    }

    pub async fn run_migrations(pool: &PgPool) -> Result<(), InfraError> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(|err| InfraError::database(err.to_string()))
    }

    pub async fn health_check(&self) -> Result<(), InfraError> {
        query("SELECT 1")
            .execute(self.pool())
            .await
            .map(|_| ())
            .map_err(|err| InfraError::database(err.to_string()))
    }
}

use thiserror::Error;

use crate::application::repos::RepoError;

/// Failures surfaced by [`ContentBlockService`](crate::application::content::ContentBlockService).
///
/// `NotFound` and `Validation` are caller-correctable; `Repo` covers storage
/// failures that already rolled back the surrounding transaction.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("`{entity}` not found")]
    NotFound { entity: &'static str },
    #[error("validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl ContentError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// Failures surfaced by the draft/publish converters.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("`{entity}` not found")]
    NotFound { entity: &'static str },
    #[error("draft has no content blocks")]
    EmptyDraft,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl PublishError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }
}

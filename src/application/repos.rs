//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::content::{ContentRecord, RecordKind};
use crate::domain::frame::{TopBarField, TopBarItemRecord, WebsiteSettingsRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[async_trait]
pub trait ContentRepo: Send + Sync {
    /// Name of the visible record of `kind` carrying `slug`, if any.
    async fn find_visible_by_slug(
        &self,
        kind: RecordKind,
        slug: &str,
    ) -> Result<Option<String>, RepoError>;

    async fn load_record(
        &self,
        kind: RecordKind,
        name: &str,
    ) -> Result<Option<ContentRecord>, RepoError>;

    /// Whether a record of `kind` other than `exclude_name` already uses `slug`.
    async fn slug_in_use(
        &self,
        kind: RecordKind,
        slug: &str,
        exclude_name: &str,
    ) -> Result<bool, RepoError>;

    /// Persist a new title together with its slug.
    ///
    /// Fails with [`RepoError::NotFound`] for unknown records and with
    /// [`RepoError::Duplicate`] when another record of `kind` holds `slug` at
    /// write time.
    async fn update_title(
        &self,
        kind: RecordKind,
        name: &str,
        title: &str,
        slug: &str,
    ) -> Result<(), RepoError>;
}

#[async_trait]
pub trait WebsiteSettingsRepo: Send + Sync {
    async fn load_website_settings(&self) -> Result<WebsiteSettingsRecord, RepoError>;

    /// Items of one list, ordered by `idx` ascending.
    async fn list_top_bar_items(
        &self,
        field: TopBarField,
    ) -> Result<Vec<TopBarItemRecord>, RepoError>;
}

//! Repository traits describing persistence adapters.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{
    ArticleRecord, ListRecord, NewArticleRow, SlugEntry, VersionRecord,
};
use crate::domain::types::VersionStatus;

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
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewListParams {
    pub created: i64,
    pub title: String,
    pub slug: String,
    pub maxlength: i64,
    pub options: crate::domain::entities::OptionsMap,
}

#[derive(Debug, Clone)]
pub struct UpdateListParams {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub maxlength: i64,
    pub options: crate::domain::entities::OptionsMap,
}

#[derive(Debug, Clone, Copy)]
pub struct NewVersionParams {
    pub list_id: i64,
    pub status: VersionStatus,
    pub user_id: i64,
    pub created: i64,
}

#[async_trait]
pub trait ListsRepo: Send + Sync {
    async fn insert_list(&self, params: NewListParams) -> Result<i64, RepoError>;

    /// Writes without checking existence first; verifying is the caller's
    /// responsibility.
    async fn update_list(&self, params: UpdateListParams) -> Result<(), RepoError>;

    /// Remove a list with all of its versions and articles, in the order
    /// articles, versions, list.
    async fn delete_list_cascade(&self, id: i64) -> Result<(), RepoError>;

    async fn find_list(&self, id: i64) -> Result<Option<ListRecord>, RepoError>;

    /// Full slug index, ordered by title ascending.
    async fn list_slug_entries(&self) -> Result<Vec<SlugEntry>, RepoError>;
}

#[async_trait]
pub trait VersionsRepo: Send + Sync {
    async fn insert_version(&self, params: NewVersionParams) -> Result<i64, RepoError>;

    /// Most recent version of the list with the given status.
    async fn latest_version(
        &self,
        list_id: i64,
        status: VersionStatus,
    ) -> Result<Option<VersionRecord>, RepoError>;

    /// Version by globally unique id, regardless of list or status.
    async fn find_version(&self, id: i64) -> Result<Option<VersionRecord>, RepoError>;

    /// Ids of the most recent published versions, newest first.
    async fn recent_published_ids(&self, list_id: i64, limit: u32)
    -> Result<Vec<i64>, RepoError>;

    /// Ids of every published version older than the most recent `keep`.
    async fn published_ids_beyond(&self, list_id: i64, keep: u32) -> Result<Vec<i64>, RepoError>;

    /// Ids of every preview version of the list.
    async fn preview_ids(&self, list_id: i64) -> Result<Vec<i64>, RepoError>;

    /// Remove the given versions and their articles (articles first), as one
    /// batch per table.
    async fn delete_versions_cascade(&self, ids: &[i64]) -> Result<(), RepoError>;
}

#[async_trait]
pub trait ArticlesRepo: Send + Sync {
    async fn insert_articles(
        &self,
        version_id: i64,
        rows: &[NewArticleRow],
    ) -> Result<(), RepoError>;

    /// All article rows of a version, ordered by `(parent, sort)` so that
    /// top-level rows come first.
    async fn list_articles(&self, version_id: i64) -> Result<Vec<ArticleRecord>, RepoError>;

    /// Rewrite `publish_date` on every stored row referencing the post,
    /// skipping rows already carrying the value. Returns rows changed.
    async fn update_publish_time(&self, post_id: i64, publish_date: i64)
    -> Result<u64, RepoError>;

    /// Ids of lists with at least one stored article referencing the post.
    async fn lists_referencing_post(&self, post_id: i64) -> Result<Vec<i64>, RepoError>;
}

/// External content-reference resolver: maps post ids to their canonical
/// publish timestamps in one batched lookup.
#[async_trait]
pub trait PublishTimeSource: Send + Sync {
    async fn publish_times(&self, post_ids: &[i64]) -> Result<HashMap<i64, i64>, RepoError>;
}

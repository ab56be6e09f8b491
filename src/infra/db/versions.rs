use async_trait::async_trait;
use sqlx::QueryBuilder;

use crate::application::repos::{NewVersionParams, RepoError, VersionsRepo};
use crate::domain::entities::VersionRecord;
use crate::domain::types::VersionStatus;

use super::{SqliteRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct VersionRow {
    id: i64,
    created: i64,
    status: i64,
    user_id: i64,
}

impl TryFrom<VersionRow> for VersionRecord {
    type Error = RepoError;

    fn try_from(row: VersionRow) -> Result<Self, Self::Error> {
        let status = VersionStatus::from_code(row.status).ok_or_else(|| {
            RepoError::integrity(format!(
                "version {} carries unknown status code {}",
                row.id, row.status
            ))
        })?;
        Ok(Self {
            id: row.id,
            created: row.created,
            status,
            user_id: row.user_id,
        })
    }
}

#[async_trait]
impl VersionsRepo for SqliteRepositories {
    async fn insert_version(&self, params: NewVersionParams) -> Result<i64, RepoError> {
        let result = sqlx::query(
            "INSERT INTO version (created, list_id, status, user_id) VALUES (?, ?, ?, ?)",
        )
        .bind(params.created)
        .bind(params.list_id)
        .bind(params.status.code())
        .bind(params.user_id)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.last_insert_rowid())
    }

    async fn latest_version(
        &self,
        list_id: i64,
        status: VersionStatus,
    ) -> Result<Option<VersionRecord>, RepoError> {
        let row = sqlx::query_as::<_, VersionRow>(
            "SELECT id, created, status, user_id FROM version \
             WHERE list_id = ? AND status = ? ORDER BY id DESC LIMIT 1",
        )
        .bind(list_id)
        .bind(status.code())
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(VersionRecord::try_from).transpose()
    }

    async fn find_version(&self, id: i64) -> Result<Option<VersionRecord>, RepoError> {
        let row = sqlx::query_as::<_, VersionRow>(
            "SELECT id, created, status, user_id FROM version WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(VersionRecord::try_from).transpose()
    }

    async fn recent_published_ids(
        &self,
        list_id: i64,
        limit: u32,
    ) -> Result<Vec<i64>, RepoError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT id FROM version WHERE list_id = ? AND status = ? \
             ORDER BY id DESC LIMIT ?",
        )
        .bind(list_id)
        .bind(VersionStatus::Published.code())
        .bind(i64::from(limit))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)
    }

    async fn published_ids_beyond(&self, list_id: i64, keep: u32) -> Result<Vec<i64>, RepoError> {
        // LIMIT -1 makes OFFSET reach every remaining row in one query.
        sqlx::query_scalar::<_, i64>(
            "SELECT id FROM version WHERE list_id = ? AND status = ? \
             ORDER BY id DESC LIMIT -1 OFFSET ?",
        )
        .bind(list_id)
        .bind(VersionStatus::Published.code())
        .bind(i64::from(keep))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)
    }

    async fn preview_ids(&self, list_id: i64) -> Result<Vec<i64>, RepoError> {
        sqlx::query_scalar::<_, i64>("SELECT id FROM version WHERE list_id = ? AND status = ?")
            .bind(list_id)
            .bind(VersionStatus::Preview.code())
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn delete_versions_cascade(&self, ids: &[i64]) -> Result<(), RepoError> {
        if ids.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool().begin().await.map_err(map_sqlx_error)?;

        let mut delete_articles = QueryBuilder::new("DELETE FROM article WHERE version_id IN (");
        let mut separated = delete_articles.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        delete_articles.push(")");
        delete_articles
            .build()
            .execute(tx.as_mut())
            .await
            .map_err(map_sqlx_error)?;

        let mut delete_versions = QueryBuilder::new("DELETE FROM version WHERE id IN (");
        let mut separated = delete_versions.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        delete_versions.push(")");
        delete_versions
            .build()
            .execute(tx.as_mut())
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}

use async_trait::async_trait;

use crate::application::repos::{ListsRepo, NewListParams, RepoError, UpdateListParams};
use crate::domain::entities::{ListRecord, SlugEntry};

use super::util::{decode_options, encode_options};
use super::{SqliteRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct ListRow {
    id: i64,
    created: i64,
    title: String,
    slug: String,
    maxlength: i64,
    options: String,
}

impl From<ListRow> for ListRecord {
    fn from(row: ListRow) -> Self {
        Self {
            id: row.id,
            created: row.created,
            title: row.title,
            slug: row.slug,
            maxlength: row.maxlength,
            options: decode_options(&row.options),
        }
    }
}

#[derive(sqlx::FromRow)]
struct SlugRow {
    id: i64,
    title: String,
    slug: String,
}

#[async_trait]
impl ListsRepo for SqliteRepositories {
    async fn insert_list(&self, params: NewListParams) -> Result<i64, RepoError> {
        let result = sqlx::query(
            "INSERT INTO list (created, title, slug, maxlength, options) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(params.created)
        .bind(&params.title)
        .bind(&params.slug)
        .bind(params.maxlength)
        .bind(encode_options(&params.options))
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.last_insert_rowid())
    }

    async fn update_list(&self, params: UpdateListParams) -> Result<(), RepoError> {
        sqlx::query(
            "UPDATE list SET title = ?, slug = ?, maxlength = ?, options = ? WHERE id = ?",
        )
        .bind(&params.title)
        .bind(&params.slug)
        .bind(params.maxlength)
        .bind(encode_options(&params.options))
        .bind(params.id)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn delete_list_cascade(&self, id: i64) -> Result<(), RepoError> {
        let mut tx = self.pool().begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            "DELETE FROM article WHERE version_id IN \
             (SELECT id FROM version WHERE list_id = ?)",
        )
        .bind(id)
        .execute(tx.as_mut())
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query("DELETE FROM version WHERE list_id = ?")
            .bind(id)
            .execute(tx.as_mut())
            .await
            .map_err(map_sqlx_error)?;

        sqlx::query("DELETE FROM list WHERE id = ?")
            .bind(id)
            .execute(tx.as_mut())
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn find_list(&self, id: i64) -> Result<Option<ListRecord>, RepoError> {
        let row = sqlx::query_as::<_, ListRow>(
            "SELECT id, created, title, slug, maxlength, options FROM list WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ListRecord::from))
    }

    async fn list_slug_entries(&self) -> Result<Vec<SlugEntry>, RepoError> {
        let rows = sqlx::query_as::<_, SlugRow>(
            "SELECT id, title, slug FROM list ORDER BY title ASC",
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| SlugEntry {
                id: row.id,
                title: row.title,
                slug: row.slug,
            })
            .collect())
    }
}

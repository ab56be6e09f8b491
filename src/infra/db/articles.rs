use async_trait::async_trait;
use sqlx::QueryBuilder;

use crate::application::repos::{ArticlesRepo, RepoError};
use crate::domain::entities::{ArticleRecord, NewArticleRow};

use super::util::{decode_options, encode_options};
use super::{SqliteRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct ArticleRow {
    id: i64,
    created: i64,
    publish_date: i64,
    post_id: i64,
    title: String,
    text: String,
    sort: i64,
    title_fontsize: i64,
    url: String,
    options: String,
    image: String,
    image_options: String,
    parent: i64,
}

impl From<ArticleRow> for ArticleRecord {
    fn from(row: ArticleRow) -> Self {
        Self {
            id: row.id,
            created: row.created,
            publish_date: row.publish_date,
            post_id: row.post_id,
            title: row.title,
            text: row.text,
            sort: row.sort,
            title_fontsize: row.title_fontsize,
            url: row.url,
            options: decode_options(&row.options),
            image: row.image,
            image_options: decode_options(&row.image_options),
            parent: row.parent,
        }
    }
}

#[async_trait]
impl ArticlesRepo for SqliteRepositories {
    async fn insert_articles(
        &self,
        version_id: i64,
        rows: &[NewArticleRow],
    ) -> Result<(), RepoError> {
        if rows.is_empty() {
            return Ok(());
        }

        let mut builder = QueryBuilder::new(
            "INSERT INTO article (created, publish_date, version_id, post_id, title, text, \
             sort, title_fontsize, url, options, image, image_options, parent) ",
        );
        builder.push_values(rows, |mut b, row| {
            b.push_bind(row.created)
                .push_bind(row.publish_date)
                .push_bind(version_id)
                .push_bind(row.post_id)
                .push_bind(row.title.clone())
                .push_bind(row.text.clone())
                .push_bind(row.sort)
                .push_bind(row.title_fontsize)
                .push_bind(row.url.clone())
                .push_bind(encode_options(&row.options))
                .push_bind(row.image.clone())
                .push_bind(encode_options(&row.image_options))
                .push_bind(row.parent);
        });
        builder
            .build()
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn list_articles(&self, version_id: i64) -> Result<Vec<ArticleRecord>, RepoError> {
        let rows = sqlx::query_as::<_, ArticleRow>(
            "SELECT id, created, publish_date, post_id, title, text, sort, title_fontsize, \
             url, options, image, image_options, parent \
             FROM article WHERE version_id = ? ORDER BY parent, sort",
        )
        .bind(version_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ArticleRecord::from).collect())
    }

    async fn update_publish_time(
        &self,
        post_id: i64,
        publish_date: i64,
    ) -> Result<u64, RepoError> {
        let result = sqlx::query(
            "UPDATE article SET publish_date = ? WHERE post_id = ? AND publish_date != ?",
        )
        .bind(publish_date)
        .bind(post_id)
        .bind(publish_date)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn lists_referencing_post(&self, post_id: i64) -> Result<Vec<i64>, RepoError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT DISTINCT list_id FROM version WHERE id IN \
             (SELECT DISTINCT version_id FROM article WHERE post_id = ?)",
        )
        .bind(post_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)
    }
}

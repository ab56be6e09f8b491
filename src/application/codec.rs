//! Article tree codec: persists trees as flat rows and reads them back.
//!
//! The pure flatten/assemble core lives in [`crate::domain::articles`]; this
//! service adds the store round trips and the batched publish-date backfill
//! against the external content-reference resolver.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::application::repos::{ArticlesRepo, PublishTimeSource, RepoError};
use crate::domain::articles::{Article, assemble, flatten};
use crate::util::clock::now_epoch;

#[derive(Clone)]
pub struct ArticleCodec {
    articles: Arc<dyn ArticlesRepo>,
    publish_times: Arc<dyn PublishTimeSource>,
}

impl ArticleCodec {
    pub fn new(articles: Arc<dyn ArticlesRepo>, publish_times: Arc<dyn PublishTimeSource>) -> Self {
        Self {
            articles,
            publish_times,
        }
    }

    /// Persist a tree into a version, bounded by the list's max length.
    /// Returns the number of rows written.
    pub async fn encode(
        &self,
        version_id: i64,
        articles: &[Article],
        maxlength: i64,
    ) -> Result<usize, RepoError> {
        if articles.is_empty() {
            return Ok(0);
        }

        let mut articles = articles.to_vec();
        self.backfill_publish_dates(&mut articles).await?;

        let rows = flatten(&articles, maxlength, now_epoch());
        if rows.is_empty() {
            return Ok(0);
        }

        self.articles.insert_articles(version_id, &rows).await?;
        Ok(rows.len())
    }

    /// Overwrite `publish_date` on every top-level article that references an
    /// external post, from one batched lookup of the distinct referenced ids.
    async fn backfill_publish_dates(&self, articles: &mut [Article]) -> Result<(), RepoError> {
        let post_ids: Vec<i64> = articles
            .iter()
            .filter(|article| article.post_id > 0)
            .map(|article| article.post_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if post_ids.is_empty() {
            return Ok(());
        }

        let times = self.publish_times.publish_times(&post_ids).await?;
        for article in articles.iter_mut() {
            if let Some(publish_date) = times.get(&article.post_id) {
                article.publish_date = *publish_date;
            }
        }
        Ok(())
    }

    /// Read a version's rows back into an ordered two-level tree.
    pub async fn decode(
        &self,
        version_id: i64,
        exclude_future: bool,
    ) -> Result<Vec<Article>, RepoError> {
        let rows = self.articles.list_articles(version_id).await?;
        Ok(assemble(rows, exclude_future, now_epoch()))
    }
}

//! List store facade composing the record manager, version manager, and
//! article codec over a shared cache gateway.

use std::sync::Arc;

use metrics::counter;
use thiserror::Error;

use crate::application::cache::{CacheGateway, articles_key, get_typed, set_typed};
use crate::application::codec::ArticleCodec;
use crate::application::records::ListRecordManager;
use crate::application::repos::{
    ArticlesRepo, ListsRepo, PublishTimeSource, RepoError, VersionsRepo,
};
use crate::application::versions::{RETENTION_KEEP, VersionManager, VersionSelector};
use crate::domain::articles::Article;
use crate::domain::entities::{OptionsMap, SlugEntry};
use crate::domain::lists::{List, PublishedBundle};
use crate::domain::types::VersionStatus;

#[derive(Debug, Error)]
pub enum ListStoreError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("cannot save a version of a list that does not exist")]
    ListMissing,
    #[error("cannot save a version of an imported list")]
    ListImported,
}

#[derive(Clone)]
pub struct ListStore {
    records: ListRecordManager,
    versions: VersionManager,
    codec: ArticleCodec,
    articles: Arc<dyn ArticlesRepo>,
    cache: Arc<dyn CacheGateway>,
    retention_keep: u32,
}

impl ListStore {
    pub fn new(
        lists: Arc<dyn ListsRepo>,
        versions: Arc<dyn VersionsRepo>,
        articles: Arc<dyn ArticlesRepo>,
        publish_times: Arc<dyn PublishTimeSource>,
        cache: Arc<dyn CacheGateway>,
    ) -> Self {
        Self {
            records: ListRecordManager::new(lists, cache.clone()),
            versions: VersionManager::new(versions),
            codec: ArticleCodec::new(articles.clone(), publish_times),
            articles,
            cache,
            retention_keep: RETENTION_KEEP,
        }
    }

    /// Override the published-version retention count (defaults to 10).
    pub fn with_retention_keep(mut self, keep: u32) -> Self {
        self.retention_keep = keep;
        self
    }

    pub fn records(&self) -> &ListRecordManager {
        &self.records
    }

    pub async fn create_list(
        &self,
        title: &str,
        slug: &str,
        options: OptionsMap,
        maxlength: i64,
    ) -> Result<List, ListStoreError> {
        Ok(self.records.create(title, slug, options, maxlength).await?)
    }

    pub async fn update_list(&self, list: &List) -> Result<(), ListStoreError> {
        Ok(self.records.update(list).await?)
    }

    pub async fn delete_list(&self, list: &List) -> Result<(), ListStoreError> {
        Ok(self.records.delete(list.id).await?)
    }

    /// Load a list, resolving version content per selector.
    ///
    /// `None` means "latest published": the whole bundle (version metadata,
    /// recent history, article tree with future posts excluded) is served
    /// from and written to the cache as one unit, since this is the hot
    /// public read path. Explicit selectors bypass the cache and never
    /// exclude future posts, so editor and preview contexts see everything.
    pub async fn load_by_id(
        &self,
        list_id: i64,
        selector: Option<VersionSelector>,
    ) -> Result<List, ListStoreError> {
        let Some(record) = self.records.load(list_id).await? else {
            return Ok(List::missing());
        };
        let mut list = List::from_record(record);

        match selector {
            None => {
                let bundle = self.published_bundle(list_id).await?;
                if let Some(version) = bundle.version {
                    list.status = Some(VersionStatus::Published);
                    list.version = Some(version);
                    list.versions = bundle.versions;
                    list.articles = bundle.articles;
                }
            }
            Some(selector) => {
                let (version, history) = self.versions.resolve(list_id, selector).await?;
                if let Some(version) = version {
                    list.articles = self.codec.decode(version.id, false).await?;
                    list.status = Some(version.status);
                    list.version = Some(version);
                    list.versions = history;
                }
            }
        }

        Ok(list)
    }

    async fn published_bundle(&self, list_id: i64) -> Result<PublishedBundle, RepoError> {
        let key = articles_key(list_id);
        if let Some(bundle) = get_typed::<PublishedBundle>(self.cache.as_ref(), &key).await {
            counter!("edicola_published_bundle_hit_total").increment(1);
            return Ok(bundle);
        }
        counter!("edicola_published_bundle_miss_total").increment(1);

        let (version, versions) = self
            .versions
            .resolve(list_id, VersionSelector::LatestPublished)
            .await?;
        let articles = match &version {
            Some(version) => self.codec.decode(version.id, true).await?,
            None => Vec::new(),
        };

        let bundle = PublishedBundle {
            version,
            versions,
            articles,
        };
        set_typed(self.cache.as_ref(), &key, &bundle).await;
        Ok(bundle)
    }

    pub async fn load_by_slug(
        &self,
        slug: &str,
        selector: Option<VersionSelector>,
    ) -> Result<List, ListStoreError> {
        match self.records.resolve_id_by_slug(slug).await? {
            Some(id) => self.load_by_id(id, selector).await,
            None => Ok(List::missing()),
        }
    }

    /// Append a new version snapshot of the list.
    ///
    /// Prunes superseded versions first, sanitizes the aggregate's metadata
    /// in place, inserts the version row, and encodes the tree bounded by the
    /// list's max length. Published saves invalidate the cached published
    /// bundle; preview saves never touch it, since previews are never served
    /// from that entry. Returns the new version id.
    pub async fn save_new_version(
        &self,
        list: &mut List,
        articles: &[Article],
        user_id: i64,
        preview: bool,
    ) -> Result<i64, ListStoreError> {
        if !list.exists {
            return Err(ListStoreError::ListMissing);
        }
        if list.imported {
            return Err(ListStoreError::ListImported);
        }

        self.versions.prune(list.id, self.retention_keep).await?;
        list.sanitize();

        let status = if preview {
            VersionStatus::Preview
        } else {
            VersionStatus::Published
        };
        let version_id = self
            .versions
            .create_version(list.id, status, user_id)
            .await?;

        let written = self
            .codec
            .encode(version_id, articles, list.maxlength)
            .await?;

        if !preview {
            self.cache.delete(&articles_key(list.id)).await;
        }

        tracing::info!(
            list_id = list.id,
            version_id,
            preview,
            articles = written,
            "saved new list version"
        );
        Ok(version_id)
    }

    pub async fn load_slug_index(&self) -> Result<Vec<SlugEntry>, ListStoreError> {
        Ok(self.records.slug_index().await?)
    }

    pub async fn resolve_id_by_slug(&self, slug: &str) -> Result<Option<i64>, ListStoreError> {
        Ok(self.records.resolve_id_by_slug(slug).await?)
    }

    /// Maintenance hook for upstream content changes: rewrite the stored
    /// publish date of every article referencing the post and invalidate the
    /// published bundle of each list that carries it. Returns rows changed.
    pub async fn touch_post_publish_time(
        &self,
        post_id: i64,
        publish_date: i64,
    ) -> Result<u64, ListStoreError> {
        let changed = self
            .articles
            .update_publish_time(post_id, publish_date)
            .await?;

        if changed > 0 {
            for list_id in self.articles.lists_referencing_post(post_id).await? {
                self.cache.delete(&articles_key(list_id)).await;
            }
            tracing::debug!(post_id, changed, "propagated post publish time");
        }
        Ok(changed)
    }
}

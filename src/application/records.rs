//! List record manager: CRUD over list metadata and the cached slug index.

use std::sync::Arc;

use metrics::counter;

use crate::application::cache::{CacheGateway, SLUGS_KEY, get_typed, props_key, set_typed};
use crate::application::repos::{ListsRepo, NewListParams, RepoError, UpdateListParams};
use crate::domain::entities::{ListRecord, OptionsMap, SlugEntry};
use crate::domain::lists::List;
use crate::domain::options::{LIST_CREATE_DEFAULTS, merge_defaults};
use crate::util::clock::now_epoch;

#[derive(Clone)]
pub struct ListRecordManager {
    repo: Arc<dyn ListsRepo>,
    cache: Arc<dyn CacheGateway>,
}

impl ListRecordManager {
    pub fn new(repo: Arc<dyn ListsRepo>, cache: Arc<dyn CacheGateway>) -> Self {
        Self { repo, cache }
    }

    /// Create a list and return the fully populated aggregate without a
    /// re-read. Caller options are merged over the defaults table.
    pub async fn create(
        &self,
        title: &str,
        slug: &str,
        options: OptionsMap,
        maxlength: i64,
    ) -> Result<List, RepoError> {
        let options = merge_defaults(options, LIST_CREATE_DEFAULTS);
        let created = now_epoch();

        let id = self
            .repo
            .insert_list(NewListParams {
                created,
                title: title.to_string(),
                slug: slug.to_string(),
                maxlength,
                options: options.clone(),
            })
            .await?;

        self.cache.delete(SLUGS_KEY).await;
        tracing::info!(list_id = id, slug, "created article list");

        Ok(List::from_record(ListRecord {
            id,
            created,
            title: title.to_string(),
            slug: slug.to_string(),
            maxlength,
            options,
        }))
    }

    /// Persist title/slug/maxlength/options for an existing list. Does not
    /// verify existence before writing.
    pub async fn update(&self, list: &List) -> Result<(), RepoError> {
        self.repo
            .update_list(UpdateListParams {
                id: list.id,
                title: list.title.clone(),
                slug: list.slug.clone(),
                maxlength: list.maxlength,
                options: list.options.clone(),
            })
            .await?;

        self.cache.delete(&props_key(list.id)).await;
        Ok(())
    }

    /// Remove a list, its versions and their articles, then drop both cache
    /// entries for the id.
    pub async fn delete(&self, list_id: i64) -> Result<(), RepoError> {
        self.repo.delete_list_cascade(list_id).await?;

        self.cache.delete(&props_key(list_id)).await;
        self.cache
            .delete(&crate::application::cache::articles_key(list_id))
            .await;
        tracing::info!(list_id, "deleted article list");
        Ok(())
    }

    /// Metadata lookup, cache-first.
    pub async fn load(&self, list_id: i64) -> Result<Option<ListRecord>, RepoError> {
        let key = props_key(list_id);
        if let Some(record) = get_typed::<ListRecord>(self.cache.as_ref(), &key).await {
            counter!("edicola_list_props_hit_total").increment(1);
            return Ok(Some(record));
        }
        counter!("edicola_list_props_miss_total").increment(1);

        let Some(record) = self.repo.find_list(list_id).await? else {
            return Ok(None);
        };
        set_typed(self.cache.as_ref(), &key, &record).await;
        Ok(Some(record))
    }

    /// Full slug index ordered by title; rebuilt whenever the cache entry is
    /// absent.
    pub async fn slug_index(&self) -> Result<Vec<SlugEntry>, RepoError> {
        if let Some(entries) = get_typed::<Vec<SlugEntry>>(self.cache.as_ref(), SLUGS_KEY).await {
            return Ok(entries);
        }

        let entries = self.repo.list_slug_entries().await?;
        set_typed(self.cache.as_ref(), SLUGS_KEY, &entries).await;
        Ok(entries)
    }

    /// First exact slug match in index order, if any.
    pub async fn resolve_id_by_slug(&self, slug: &str) -> Result<Option<i64>, RepoError> {
        let entries = self.slug_index().await?;
        Ok(entries
            .iter()
            .find(|entry| entry.slug == slug)
            .map(|entry| entry.id))
    }
}

//! Version manager: snapshot creation, resolution, and retention pruning.

use std::sync::Arc;

use crate::application::repos::{NewVersionParams, RepoError, VersionsRepo};
use crate::domain::entities::VersionRecord;
use crate::domain::types::VersionStatus;
use crate::util::clock::now_epoch;

/// Published versions kept per list after pruning.
pub const RETENTION_KEEP: u32 = 10;

/// Recent published version ids attached to read results.
pub const HISTORY_LIMIT: u32 = 10;

/// Which version snapshot a read should resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSelector {
    LatestPublished,
    LatestPreview,
    /// A version by globally unique id, regardless of list or status.
    Specific(i64),
}

#[derive(Clone)]
pub struct VersionManager {
    repo: Arc<dyn VersionsRepo>,
}

impl VersionManager {
    pub fn new(repo: Arc<dyn VersionsRepo>) -> Self {
        Self { repo }
    }

    /// Insert a new version row; the status is fixed for its lifetime.
    pub async fn create_version(
        &self,
        list_id: i64,
        status: VersionStatus,
        user_id: i64,
    ) -> Result<i64, RepoError> {
        self.repo
            .insert_version(NewVersionParams {
                list_id,
                status,
                user_id,
                created: now_epoch(),
            })
            .await
    }

    /// Resolve a selector to its version metadata plus the recent published
    /// history. No matching row is an empty result, not an error: it means
    /// the list has never been published (or previewed).
    ///
    /// Preview reads skip the history query; the list is unused there.
    pub async fn resolve(
        &self,
        list_id: i64,
        selector: VersionSelector,
    ) -> Result<(Option<VersionRecord>, Vec<i64>), RepoError> {
        match selector {
            VersionSelector::LatestPublished => {
                let version = self
                    .repo
                    .latest_version(list_id, VersionStatus::Published)
                    .await?;
                let history = self
                    .repo
                    .recent_published_ids(list_id, HISTORY_LIMIT)
                    .await?;
                Ok((version, history))
            }
            VersionSelector::LatestPreview => {
                let version = self
                    .repo
                    .latest_version(list_id, VersionStatus::Preview)
                    .await?;
                Ok((version, Vec::new()))
            }
            VersionSelector::Specific(id) => {
                let version = self.repo.find_version(id).await?;
                let history = self
                    .repo
                    .recent_published_ids(list_id, HISTORY_LIMIT)
                    .await?;
                Ok((version, history))
            }
        }
    }

    /// Retention pass run before every new version is written: drops all
    /// preview versions plus published versions beyond the most recent
    /// `keep`, one article batch and one version batch regardless of count.
    /// Returns the number of versions removed.
    pub async fn prune(&self, list_id: i64, keep: u32) -> Result<usize, RepoError> {
        let mut stale = self.repo.published_ids_beyond(list_id, keep).await?;
        stale.extend(self.repo.preview_ids(list_id).await?);

        if stale.is_empty() {
            return Ok(0);
        }

        self.repo.delete_versions_cascade(&stale).await?;
        tracing::debug!(list_id, pruned = stale.len(), "pruned superseded versions");
        Ok(stale.len())
    }
}

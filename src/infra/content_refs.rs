//! Publish-time lookup backed by a fixed table.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::application::repos::{PublishTimeSource, RepoError};

/// Static mapping from external post ids to publish epochs.
///
/// Stands in for the real content store in tests and in deployments that
/// carry no external content references; unknown ids simply resolve to
/// nothing, leaving article publish dates untouched.
#[derive(Debug, Default, Clone)]
pub struct StaticPublishTimes {
    times: HashMap<i64, i64>,
}

impl StaticPublishTimes {
    pub fn new(times: HashMap<i64, i64>) -> Self {
        Self { times }
    }

    pub fn insert(&mut self, post_id: i64, publish_date: i64) {
        self.times.insert(post_id, publish_date);
    }
}

#[async_trait]
impl PublishTimeSource for StaticPublishTimes {
    async fn publish_times(&self, post_ids: &[i64]) -> Result<HashMap<i64, i64>, RepoError> {
        Ok(post_ids
            .iter()
            .filter_map(|id| self.times.get(id).map(|publish_date| (*id, *publish_date)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_only_known_ids() {
        let source = StaticPublishTimes::new(HashMap::from([(3, 100), (4, 200)]));
        let times = source.publish_times(&[3, 9]).await.expect("lookup");
        assert_eq!(times, HashMap::from([(3, 100)]));
    }
}

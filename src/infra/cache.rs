//! In-memory cache gateway.

use async_trait::async_trait;
use dashmap::DashMap;
use metrics::counter;
use serde_json::Value;

use crate::application::cache::CacheGateway;

/// Process-local cache gateway backed by a concurrent map.
///
/// Entries are derived and disposable; dropping one only costs callers an
/// extra store round trip. No expiry beyond explicit deletes.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: DashMap<String, Value>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheGateway for InMemoryCache {
    async fn get(&self, key: &str) -> Option<Value> {
        let hit = self.entries.get(key).map(|entry| entry.value().clone());
        match hit {
            Some(value) => {
                counter!("edicola_cache_hit_total").increment(1);
                Some(value)
            }
            None => {
                counter!("edicola_cache_miss_total").increment(1);
                None
            }
        }
    }

    async fn set(&self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }

    async fn delete(&self, key: &str) {
        counter!("edicola_cache_invalidate_total").increment(1);
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn set_get_delete_round_trip() {
        let cache = InMemoryCache::new();
        assert_eq!(cache.get("k").await, None);

        cache.set("k", json!({"a": 1})).await;
        assert_eq!(cache.get("k").await, Some(json!({"a": 1})));
        assert_eq!(cache.len(), 1);

        cache.delete("k").await;
        assert_eq!(cache.get("k").await, None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn delete_of_absent_key_is_a_noop() {
        let cache = InMemoryCache::new();
        cache.delete("missing").await;
        assert!(cache.is_empty());
    }
}

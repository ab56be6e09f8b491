//! Cache gateway contract and key shapes.
//!
//! The cache holds derived, disposable copies only: a stale or missing entry
//! must never change results, just cost an extra store round trip. Failures
//! on the cache side are indistinguishable from misses.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

/// Key for a list's cached metadata. The literal shapes of these keys are an
/// external contract; collaborators invalidate them directly.
pub fn props_key(list_id: i64) -> String {
    format!("list_props_{list_id}")
}

/// Key for a list's cached published bundle.
pub fn articles_key(list_id: i64) -> String {
    format!("list_articles_data_{list_id}")
}

/// Key for the cached slug index.
pub const SLUGS_KEY: &str = "list_slugs";

/// String-keyed key/value store with explicit deletes and no enumeration.
#[async_trait]
pub trait CacheGateway: Send + Sync {
    async fn get(&self, key: &str) -> Option<Value>;
    async fn set(&self, key: &str, value: Value);
    async fn delete(&self, key: &str);
}

/// Typed read; an entry that fails to decode counts as a miss.
pub async fn get_typed<T: DeserializeOwned>(cache: &dyn CacheGateway, key: &str) -> Option<T> {
    let value = cache.get(key).await?;
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            tracing::debug!(key, error = %err, "discarding undecodable cache entry");
            None
        }
    }
}

/// Typed write; an unencodable value is dropped rather than surfaced.
pub async fn set_typed<T: Serialize>(cache: &dyn CacheGateway, key: &str, value: &T) {
    match serde_json::to_value(value) {
        Ok(encoded) => cache.set(key, encoded).await,
        Err(err) => {
            tracing::warn!(key, error = %err, "failed to encode cache entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_shapes_are_stable() {
        assert_eq!(props_key(7), "list_props_7");
        assert_eq!(articles_key(7), "list_articles_data_7");
        assert_eq!(SLUGS_KEY, "list_slugs");
    }
}

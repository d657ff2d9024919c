//! Explicit namespace registry keyed by version tag.

use std::collections::BTreeMap;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::namespace::{CacheKey, CacheNamespace, CachedResponse};
use crate::stats::{CacheStats, NamespaceStats};

/// Owned registry of cache namespaces.
///
/// Replaces the platform's ambient cache storage with an explicit map of
/// version tag to namespace. All operations are open-or-create: writing to a
/// tag that does not exist yet creates it, and lookups on missing tags are
/// misses, never errors.
///
/// Namespaces are held behind a single async `RwLock`; entries are
/// append/overwrite-only with last-write-wins semantics, so concurrent
/// handlers cannot corrupt the store.
#[derive(Debug, Default)]
pub struct CacheStorage {
    namespaces: RwLock<BTreeMap<String, CacheNamespace>>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a namespace, creating it if it does not exist.
    pub async fn open(&self, tag: &str) {
        let mut namespaces = self.namespaces.write().await;
        if !namespaces.contains_key(tag) {
            debug!(tag, "opening cache namespace");
            namespaces.insert(tag.to_string(), CacheNamespace::new(tag));
        }
    }

    /// Delete a namespace outright. Returns `true` if it existed.
    pub async fn delete(&self, tag: &str) -> bool {
        let removed = self.namespaces.write().await.remove(tag).is_some();
        if removed {
            info!(tag, "deleted cache namespace");
        }
        removed
    }

    /// Delete every namespace whose tag is NOT in `allow_list`.
    ///
    /// This is the activation transition: the allow-list names the current
    /// static and runtime tags, and everything else is an obsolete version.
    /// Returns the tags that were deleted.
    pub async fn retain(&self, allow_list: &[&str]) -> Vec<String> {
        let mut namespaces = self.namespaces.write().await;
        let doomed: Vec<String> = namespaces
            .keys()
            .filter(|tag| !allow_list.contains(&tag.as_str()))
            .cloned()
            .collect();

        for tag in &doomed {
            namespaces.remove(tag);
            info!(tag = %tag, "deleted obsolete cache namespace");
        }
        doomed
    }

    /// Delete all namespaces unconditionally.
    pub async fn clear(&self) {
        let mut namespaces = self.namespaces.write().await;
        let count = namespaces.len();
        namespaces.clear();
        info!(count, "cleared all cache namespaces");
    }

    /// Tags of all currently open namespaces, in lexicographic order.
    pub async fn tags(&self) -> Vec<String> {
        self.namespaces.read().await.keys().cloned().collect()
    }

    /// Store an entry under `tag`, creating the namespace if needed.
    pub async fn put(&self, tag: &str, key: CacheKey, response: CachedResponse) {
        let mut namespaces = self.namespaces.write().await;
        namespaces
            .entry(tag.to_string())
            .or_insert_with(|| CacheNamespace::new(tag))
            .put(key, response);
    }

    /// Look up an entry in one specific namespace.
    pub async fn match_in(&self, tag: &str, key: &CacheKey) -> Option<CachedResponse> {
        let mut namespaces = self.namespaces.write().await;
        namespaces.get_mut(tag)?.match_request(key)
    }

    /// Look up an entry across every namespace, tags in lexicographic order.
    pub async fn match_any(&self, key: &CacheKey) -> Option<CachedResponse> {
        let mut namespaces = self.namespaces.write().await;
        for namespace in namespaces.values_mut() {
            if let Some(entry) = namespace.match_request(key) {
                return Some(entry);
            }
        }
        None
    }

    /// Whether any namespace holds an entry for `key`.
    pub async fn contains(&self, key: &CacheKey) -> bool {
        self.namespaces
            .read()
            .await
            .values()
            .any(|ns| ns.contains(key))
    }

    /// Aggregate statistics across all namespaces.
    pub async fn stats(&self) -> CacheStats {
        let namespaces = self.namespaces.read().await;
        let per_namespace: Vec<NamespaceStats> = namespaces
            .values()
            .map(|ns| NamespaceStats {
                tag: ns.tag().to_string(),
                entry_count: ns.len(),
                total_bytes: ns.total_bytes(),
            })
            .collect();

        CacheStats {
            namespace_count: per_namespace.len(),
            entry_count: per_namespace.iter().map(|n| n.entry_count).sum(),
            total_bytes: per_namespace.iter().map(|n| n.total_bytes).sum(),
            namespaces: per_namespace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::fetch::FetchResponse;
    use bytes::Bytes;

    fn entry(body: &'static [u8]) -> CachedResponse {
        CachedResponse::capture(&FetchResponse::new(200, Bytes::from_static(body)), 0)
    }

    #[tokio::test]
    async fn test_open_is_idempotent() {
        let storage = CacheStorage::new();
        storage.open("static-v1").await;
        storage.open("static-v1").await;
        assert_eq!(storage.tags().await, vec!["static-v1"]);
    }

    #[tokio::test]
    async fn test_put_creates_namespace() {
        let storage = CacheStorage::new();
        let key = CacheKey::get("https://app.example/app.js");
        storage.put("runtime-v1", key.clone(), entry(b"js")).await;

        assert!(storage.match_in("runtime-v1", &key).await.is_some());
        assert_eq!(storage.tags().await, vec!["runtime-v1"]);
    }

    #[tokio::test]
    async fn test_match_any_searches_all_namespaces() {
        let storage = CacheStorage::new();
        let key = CacheKey::get("https://app.example/data.json");
        storage.put("runtime-v1", key.clone(), entry(b"{}")).await;

        assert!(storage.match_in("static-v1", &key).await.is_none());
        assert!(storage.match_any(&key).await.is_some());
    }

    #[tokio::test]
    async fn test_retain_deletes_obsolete_tags() {
        let storage = CacheStorage::new();
        storage.open("static-v1").await;
        storage.open("runtime-v1").await;
        storage.open("static-v2").await;
        storage.open("runtime-v2").await;

        let deleted = storage.retain(&["static-v2", "runtime-v2"]).await;

        assert_eq!(deleted, vec!["runtime-v1", "static-v1"]);
        assert_eq!(storage.tags().await, vec!["runtime-v2", "static-v2"]);
    }

    #[tokio::test]
    async fn test_clear_deletes_everything() {
        let storage = CacheStorage::new();
        storage
            .put("static-v1", CacheKey::get("https://a/x"), entry(b"x"))
            .await;
        storage
            .put("runtime-v1", CacheKey::get("https://a/y"), entry(b"y"))
            .await;

        storage.clear().await;

        assert!(storage.tags().await.is_empty());
        assert!(storage.match_any(&CacheKey::get("https://a/x")).await.is_none());
    }

    #[tokio::test]
    async fn test_stats_aggregation() {
        let storage = CacheStorage::new();
        storage
            .put("static-v1", CacheKey::get("https://a/x"), entry(b"1234"))
            .await;
        storage
            .put("runtime-v1", CacheKey::get("https://a/y"), entry(b"56"))
            .await;

        let stats = storage.stats().await;
        assert_eq!(stats.namespace_count, 2);
        assert_eq!(stats.entry_count, 2);
        assert_eq!(stats.total_bytes, 6);
    }

    #[tokio::test]
    async fn test_cache_fidelity_round_trip() {
        let storage = CacheStorage::new();
        let key = CacheKey::get("https://app.example/styles.css");
        let live = FetchResponse::new(200, Bytes::from_static(b"body { margin: 0 }"))
            .header("Content-Type", "text/css");

        storage
            .put("static-v1", key.clone(), CachedResponse::capture(&live, 42))
            .await;

        let restored = storage.match_any(&key).await.unwrap().to_response();
        assert_eq!(restored.status, live.status);
        assert_eq!(restored.body, live.body);
        assert_eq!(restored.headers, live.headers);
    }
}

//! Cache keys, captured responses, and the single-namespace entry map.

use bridge_traits::fetch::{FetchRequest, FetchResponse};
use bytes::Bytes;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Canonical identity of a cacheable request: method plus URL.
///
/// Fragments never reach the network, so they are stripped during
/// canonicalization. Query strings are significant and kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub method: String,
    pub url: String,
}

impl CacheKey {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: canonicalize(&url.into()),
        }
    }

    /// Key for a GET request to `url`, the common case.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    pub fn from_request(request: &FetchRequest) -> Self {
        Self::new(request.method.as_str(), request.url.clone())
    }
}

fn canonicalize(url: &str) -> String {
    match url.split_once('#') {
        Some((base, _fragment)) => base.to_string(),
        None => url.to_string(),
    }
}

/// A full captured response: headers, body, and status at time of caching.
///
/// Entries are immutable once stored; a fresh successful fetch for the same
/// key overwrites the whole entry.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
    /// Unix millis at which the entry was stored.
    pub stored_at_ms: u64,
    /// Hex SHA-256 of the body, checked on read.
    pub digest: String,
}

impl CachedResponse {
    /// Capture a live response for storage.
    pub fn capture(response: &FetchResponse, now_millis: u64) -> Self {
        Self {
            status: response.status,
            status_text: response.status_text.clone(),
            headers: response.headers.clone(),
            body: response.body.clone(),
            stored_at_ms: now_millis,
            digest: body_digest(&response.body),
        }
    }

    /// Reconstruct the response exactly as it was captured.
    pub fn to_response(&self) -> FetchResponse {
        let mut response = FetchResponse::new(self.status, self.body.clone())
            .status_text(self.status_text.clone());
        response.headers = self.headers.clone();
        response
    }

    /// Recompute the body digest and compare with the stored one.
    pub fn verify(&self) -> bool {
        body_digest(&self.body) == self.digest
    }

    pub fn body_len(&self) -> usize {
        self.body.len()
    }
}

fn body_digest(body: &Bytes) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    hex::encode(hasher.finalize())
}

/// A tagged bucket of cached request/response pairs.
///
/// Plain data, no interior locking; [`CacheStorage`](crate::storage::CacheStorage)
/// owns the concurrency story.
#[derive(Debug, Default)]
pub struct CacheNamespace {
    tag: String,
    entries: HashMap<CacheKey, CachedResponse>,
}

impl CacheNamespace {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            entries: HashMap::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Insert or overwrite the entry for `key`. Last write wins.
    pub fn put(&mut self, key: CacheKey, response: CachedResponse) {
        self.entries.insert(key, response);
    }

    /// Look up a captured response, evicting the entry if its digest no
    /// longer matches (corrupt entries read as misses).
    pub fn match_request(&mut self, key: &CacheKey) -> Option<CachedResponse> {
        match self.entries.get(key) {
            Some(entry) if entry.verify() => Some(entry.clone()),
            Some(_) => {
                tracing::warn!(tag = %self.tag, url = %key.url, "evicting corrupt cache entry");
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// URLs of every entry, for diagnostics.
    pub fn urls(&self) -> Vec<String> {
        self.entries.keys().map(|k| k.url.clone()).collect()
    }

    /// Sum of body sizes in bytes.
    pub fn total_bytes(&self) -> u64 {
        self.entries.values().map(|e| e.body_len() as u64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(body: &'static [u8]) -> FetchResponse {
        FetchResponse::new(200, Bytes::from_static(body))
    }

    #[test]
    fn test_cache_key_strips_fragment() {
        let key = CacheKey::get("https://app.example/index.html#section");
        assert_eq!(key.url, "https://app.example/index.html");

        let with_query = CacheKey::get("https://app.example/search?q=rust#top");
        assert_eq!(with_query.url, "https://app.example/search?q=rust");
    }

    #[test]
    fn test_cache_key_equality() {
        let a = CacheKey::get("https://app.example/app.js");
        let b = CacheKey::new("GET", "https://app.example/app.js#frag");
        assert_eq!(a, b);

        let post = CacheKey::new("POST", "https://app.example/app.js");
        assert_ne!(a, post);
    }

    #[test]
    fn test_capture_round_trip() {
        let live = response(b"console.log('hi')").header("Content-Type", "text/javascript");
        let captured = CachedResponse::capture(&live, 1_700_000_000_000);

        let restored = captured.to_response();
        assert_eq!(restored.status, live.status);
        assert_eq!(restored.body, live.body);
        assert_eq!(
            restored.headers.get("Content-Type"),
            Some(&"text/javascript".to_string())
        );
    }

    #[test]
    fn test_digest_verification() {
        let captured = CachedResponse::capture(&response(b"payload"), 0);
        assert!(captured.verify());

        let mut tampered = captured.clone();
        tampered.body = Bytes::from_static(b"other");
        assert!(!tampered.verify());
    }

    #[test]
    fn test_namespace_last_write_wins() {
        let mut ns = CacheNamespace::new("static-v1");
        let key = CacheKey::get("https://app.example/styles.css");

        ns.put(key.clone(), CachedResponse::capture(&response(b"old"), 1));
        ns.put(key.clone(), CachedResponse::capture(&response(b"new"), 2));

        assert_eq!(ns.len(), 1);
        let entry = ns.match_request(&key).unwrap();
        assert_eq!(entry.body, Bytes::from_static(b"new"));
        assert_eq!(entry.stored_at_ms, 2);
    }

    #[test]
    fn test_corrupt_entry_reads_as_miss() {
        let mut ns = CacheNamespace::new("static-v1");
        let key = CacheKey::get("https://app.example/app.js");

        let mut entry = CachedResponse::capture(&response(b"intact"), 0);
        entry.body = Bytes::from_static(b"flipped");
        ns.put(key.clone(), entry);

        assert!(ns.match_request(&key).is_none());
        assert!(!ns.contains(&key));
    }

    #[test]
    fn test_total_bytes() {
        let mut ns = CacheNamespace::new("runtime-v1");
        ns.put(
            CacheKey::get("https://app.example/a"),
            CachedResponse::capture(&response(b"1234"), 0),
        );
        ns.put(
            CacheKey::get("https://app.example/b"),
            CachedResponse::capture(&response(b"12"), 0),
        );
        assert_eq!(ns.total_bytes(), 6);
    }
}

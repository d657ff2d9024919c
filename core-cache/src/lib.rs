//! # Cache Namespace Store
//!
//! Versioned, namespace-managed request/response cache for the offline worker.
//!
//! ## Overview
//!
//! The store replaces the platform's ambient cache storage with an explicit,
//! owned registry of namespaces keyed by version tag. In steady state exactly
//! two namespaces exist: a static-assets bucket populated eagerly at install,
//! and a runtime bucket populated lazily as requests succeed. Activation of a
//! new worker version deletes every namespace whose tag is not in the current
//! allow-list.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │     CacheStorage                       │
//! │  - open() / delete() / retain()        │
//! │  - put() / match_in() / match_any()    │
//! └────────┬───────────────────────────────┘
//!          │ tag → namespace
//!          ▼
//! ┌────────────────────────────────────────┐
//! │     CacheNamespace                     │
//! │  CacheKey → CachedResponse             │
//! │  (last-write-wins, no merge logic)     │
//! └────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_cache::{CacheKey, CacheStorage, CachedResponse};
//! use bridge_traits::fetch::FetchResponse;
//! use bytes::Bytes;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let storage = CacheStorage::new();
//! storage.open("static-v1").await;
//!
//! let key = CacheKey::get("https://app.example/styles.css");
//! let response = FetchResponse::new(200, Bytes::from_static(b"body { margin: 0 }"));
//! storage.put("static-v1", key.clone(), CachedResponse::capture(&response, 0)).await;
//!
//! assert!(storage.match_any(&key).await.is_some());
//! # }
//! ```

pub mod namespace;
pub mod stats;
pub mod storage;

pub use namespace::{CacheKey, CacheNamespace, CachedResponse};
pub use stats::{CacheStats, NamespaceStats};
pub use storage::CacheStorage;

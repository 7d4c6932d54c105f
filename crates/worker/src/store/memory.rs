//! In-memory cache store.
//!
//! A `RwLock`-guarded map, suitable for tests and short-lived processes.
//! Entries carry an insertion sequence so ignore-search lookups return the
//! earliest stored match; re-storing a key assigns a fresh sequence.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use seawall_core::Error;
use tokio::sync::RwLock;

use super::{CacheStore, MatchOptions, path_part};
use crate::http::WorkerResponse;

struct StoredEntry {
    seq: u64,
    response: WorkerResponse,
}

/// One named in-memory store.
pub struct MemoryCache {
    name: &'static str,
    entries: RwLock<HashMap<String, StoredEntry>>,
    seq: AtomicU64,
}

impl MemoryCache {
    pub fn new(name: &'static str) -> Self {
        Self { name, entries: RwLock::new(HashMap::new()), seq: AtomicU64::new(0) }
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// True if nothing has been stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn lookup(&self, key: &str, options: MatchOptions) -> Result<Option<WorkerResponse>, Error> {
        let entries = self.entries.read().await;

        if options.ignore_search {
            let wanted = path_part(key);
            let hit = entries
                .iter()
                .filter(|(stored, _)| path_part(stored) == wanted)
                .min_by_key(|(_, entry)| entry.seq)
                .map(|(_, entry)| entry.response.clone());
            return Ok(hit);
        }

        Ok(entries.get(key).map(|entry| entry.response.clone()))
    }

    async fn put(&self, key: &str, response: WorkerResponse) -> Result<(), Error> {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), StoredEntry { seq, response });
        tracing::debug!("stored {} in {}", key, self.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use reqwest::StatusCode;
    use reqwest::header::HeaderMap;

    fn response(body: &str) -> WorkerResponse {
        WorkerResponse::new(StatusCode::OK, HeaderMap::new(), Bytes::from(body.to_string()))
    }

    #[tokio::test]
    async fn test_exact_key_roundtrip() {
        let cache = MemoryCache::new("test-cache");
        cache.put("/build/entry.js", response("bundle")).await.unwrap();

        let hit = cache.lookup("/build/entry.js", MatchOptions::default()).await.unwrap();
        assert_eq!(hit.unwrap().body.as_ref(), b"bundle");

        let miss = cache.lookup("/build/other.js", MatchOptions::default()).await.unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_ignore_search_matches_across_query() {
        let cache = MemoryCache::new("test-cache");
        cache.put("/build/entry.js?v=2", response("bundle")).await.unwrap();

        let miss = cache.lookup("/build/entry.js", MatchOptions::default()).await.unwrap();
        assert!(miss.is_none());

        let hit = cache
            .lookup("/build/entry.js", MatchOptions { ignore_search: true, ignore_vary: true })
            .await
            .unwrap();
        assert!(hit.is_some());
    }

    #[tokio::test]
    async fn test_ignore_search_returns_earliest_match() {
        let cache = MemoryCache::new("test-cache");
        cache.put("/page?a=1", response("first")).await.unwrap();
        cache.put("/page?b=2", response("second")).await.unwrap();

        let hit = cache
            .lookup("/page", MatchOptions { ignore_search: true, ignore_vary: false })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hit.body.as_ref(), b"first");
    }

    #[tokio::test]
    async fn test_put_replaces_previous_entry() {
        let cache = MemoryCache::new("test-cache");
        cache.put("/doc", response("old")).await.unwrap();
        cache.put("/doc", response("new")).await.unwrap();

        let hit = cache.lookup("/doc", MatchOptions::default()).await.unwrap().unwrap();
        assert_eq!(hit.body.as_ref(), b"new");
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_contains_uses_exact_key() {
        let cache = MemoryCache::new("test-cache");
        cache.put("/products?_data=root", response("data")).await.unwrap();

        assert!(cache.contains("/products?_data=root").await.unwrap());
        assert!(!cache.contains("/products").await.unwrap());
    }
}

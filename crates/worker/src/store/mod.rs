//! Cache store facade.
//!
//! Three independently named key-value blob stores back the three request
//! classes. Strategies and the synchronizer only see the `CacheStore`
//! trait; the bundled backends are an in-memory map and a shared SQLite
//! database, and hosts may plug in their own.

pub mod memory;
pub mod migrations;
pub mod sqlite;

pub use memory::MemoryCache;
pub use sqlite::{SqliteCache, StoreDb};

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use seawall_core::Error;

use crate::http::WorkerResponse;

/// Store for static assets.
pub const ASSET_CACHE: &str = "asset-cache";

/// Store for loader-data responses.
pub const DATA_CACHE: &str = "data-cache";

/// Store for rendered documents.
pub const DOCUMENT_CACHE: &str = "document-cache";

/// Lookup options.
///
/// `ignore_vary` is part of the facade contract for host-provided stores;
/// the bundled backends accept it but never record request headers, so
/// they have no vary state to consult.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Match on the query-less path instead of the exact key.
    pub ignore_search: bool,
    /// Disregard `Vary` header constraints when matching.
    pub ignore_vary: bool,
}

/// One named key-value blob store.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Find a stored response for `key`.
    async fn lookup(&self, key: &str, options: MatchOptions) -> Result<Option<WorkerResponse>, Error>;

    /// Store a response under `key`, replacing any previous entry.
    async fn put(&self, key: &str, response: WorkerResponse) -> Result<(), Error>;

    /// True if an exact-key entry exists.
    async fn contains(&self, key: &str) -> Result<bool, Error> {
        Ok(self.lookup(key, MatchOptions::default()).await?.is_some())
    }
}

/// The three stores the worker serves from, as shared handles.
#[derive(Clone)]
pub struct CacheSet {
    pub assets: Arc<dyn CacheStore>,
    pub data: Arc<dyn CacheStore>,
    pub documents: Arc<dyn CacheStore>,
}

impl CacheSet {
    /// Three in-memory stores. State is lost on drop.
    pub fn in_memory() -> Self {
        Self {
            assets: Arc::new(MemoryCache::new(ASSET_CACHE)),
            data: Arc::new(MemoryCache::new(DATA_CACHE)),
            documents: Arc::new(MemoryCache::new(DOCUMENT_CACHE)),
        }
    }

    /// Three stores sharing one SQLite database file.
    pub async fn sqlite(path: impl AsRef<Path>) -> Result<Self, Error> {
        let db = StoreDb::open(path).await?;
        Ok(Self {
            assets: Arc::new(SqliteCache::new(db.clone(), ASSET_CACHE)),
            data: Arc::new(SqliteCache::new(db.clone(), DATA_CACHE)),
            documents: Arc::new(SqliteCache::new(db, DOCUMENT_CACHE)),
        })
    }
}

/// The query-less part of a cache key.
pub(crate) fn path_part(key: &str) -> &str {
    key.split_once('?').map_or(key, |(path, _)| path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_part() {
        assert_eq!(path_part("/products?_data=routes%2Fproducts"), "/products");
        assert_eq!(path_part("/products"), "/products");
        assert_eq!(path_part("/"), "/");
    }
}

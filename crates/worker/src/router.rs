//! Strategy dispatch for intercepted requests.
//!
//! One strategy per request class, each request handled independently:
//!
//! - asset: cache-first, no fallback (assets are pre-warmed)
//! - data: network-first, falling back to cache, then to a synthesized 500
//! - document: network-first, falling back to cache, else the error
//! - other: passthrough
//!
//! Strategy selection depends only on method, URL, and mode; response
//! content never influences routing.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use seawall_core::Error;

use crate::classify::{RequestClass, classify};
use crate::fetch::Fetcher;
use crate::http::{WorkerRequest, WorkerResponse, X_REMIX_CATCH, X_REMIX_WORKER, cache_key_for, json_response};
use crate::store::{CacheSet, MatchOptions};

pub struct Router {
    caches: CacheSet,
    fetcher: Arc<dyn Fetcher>,
    static_asset_prefixes: Vec<String>,
}

impl Router {
    pub fn new(caches: CacheSet, fetcher: Arc<dyn Fetcher>, static_asset_prefixes: Vec<String>) -> Self {
        Self { caches, fetcher, static_asset_prefixes }
    }

    /// Route one request through its class strategy.
    pub async fn handle(&self, request: &WorkerRequest) -> Result<WorkerResponse, Error> {
        match classify(request, &self.static_asset_prefixes) {
            RequestClass::Asset => self.handle_asset(request).await,
            RequestClass::Data => self.handle_data(request).await,
            RequestClass::Document => self.handle_document(request).await,
            RequestClass::Other => self.fetcher.fetch(request).await,
        }
    }

    /// Cache-first. Lookups ignore query string and vary headers; only a
    /// status-200 response is stored on miss. Failures propagate.
    async fn handle_asset(&self, request: &WorkerRequest) -> Result<WorkerResponse, Error> {
        let key = cache_key_for(&request.url);
        let options = MatchOptions { ignore_search: true, ignore_vary: true };

        if let Some(cached) = self.caches.assets.lookup(&key, options).await? {
            tracing::debug!("asset cache hit for {}", key);
            return Ok(cached);
        }

        let response = self.fetcher.fetch(request).await?;
        if response.status == StatusCode::OK {
            self.caches.assets.put(&key, response.clone()).await?;
        }
        Ok(response)
    }

    /// Network-first. A data request never surfaces a raw error: failure
    /// falls back to the exact cached entry tagged worker-origin, and
    /// past that to a synthesized 500.
    async fn handle_data(&self, request: &WorkerRequest) -> Result<WorkerResponse, Error> {
        let key = cache_key_for(&request.url);

        let failure = match self.fetch_and_store_data(&key, request).await {
            Ok(response) => return Ok(response),
            Err(e) => e,
        };
        tracing::debug!("data request for {} failed, falling back to cache: {}", key, failure);

        match self.caches.data.lookup(&key, MatchOptions::default()).await {
            Ok(Some(mut cached)) => {
                cached.headers.insert(X_REMIX_WORKER, HeaderValue::from_static("yes"));
                Ok(cached)
            }
            Ok(None) => Ok(network_error_response()),
            Err(store_error) => {
                tracing::debug!("data cache lookup for {} failed: {}", key, store_error);
                Ok(network_error_response())
            }
        }
    }

    /// Fetch and store as one unit: a put failure falls back exactly like
    /// a fetch failure. Any status is stored.
    async fn fetch_and_store_data(&self, key: &str, request: &WorkerRequest) -> Result<WorkerResponse, Error> {
        let response = self.fetcher.fetch(request).await?;
        self.caches.data.put(key, response.clone()).await?;
        Ok(response)
    }

    /// Network-first. A store failure never costs the fresh response; a
    /// fetch failure falls back to the cached document, untagged, or
    /// re-propagates when there is none.
    async fn handle_document(&self, request: &WorkerRequest) -> Result<WorkerResponse, Error> {
        let key = cache_key_for(&request.url);

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if let Err(e) = self.caches.documents.put(&key, response.clone()).await {
                    tracing::warn!("failed to store document {}: {}", key, e);
                }
                Ok(response)
            }
            Err(network_error) => {
                tracing::debug!("document fetch for {} failed, trying cache: {}", key, network_error);
                match self.caches.documents.lookup(&key, MatchOptions::default()).await {
                    Ok(Some(cached)) => Ok(cached),
                    Ok(None) => Err(network_error),
                    Err(store_error) => {
                        tracing::debug!("document cache lookup for {} failed: {}", key, store_error);
                        Err(network_error)
                    }
                }
            }
        }
    }
}

/// The synthesized data-failure response: a 500 with a fixed JSON body,
/// tagged as both caught and worker-origin.
fn network_error_response() -> WorkerResponse {
    let mut headers = HeaderMap::new();
    headers.insert(X_REMIX_CATCH, HeaderValue::from_static("yes"));
    headers.insert(X_REMIX_WORKER, HeaderValue::from_static("yes"));
    json_response(&serde_json::json!({"message": "Network Error"}), StatusCode::INTERNAL_SERVER_ERROR, headers)
}

//! Test doubles shared by the crate's unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::Url;
use reqwest::header::HeaderMap;
use seawall_core::Error;

use crate::fetch::Fetcher;
use crate::http::{WorkerRequest, WorkerResponse, cache_key_for};
use crate::store::{CacheStore, MatchOptions, MemoryCache, path_part};

/// A URL on the conventional test origin.
pub(crate) fn test_url(path_and_query: &str) -> Url {
    let mut url = Url::parse("http://localhost:3000").unwrap();
    url.set_path(path_part(path_and_query));
    if let Some((_, query)) = path_and_query.split_once('?') {
        url.set_query(Some(query));
    }
    url
}

pub(crate) fn response(status: StatusCode, body: &str) -> WorkerResponse {
    WorkerResponse::new(status, HeaderMap::new(), Bytes::from(body.to_string()))
}

pub(crate) fn ok_response(body: &str) -> WorkerResponse {
    response(StatusCode::OK, body)
}

enum Outcome {
    Respond(WorkerResponse),
    Fail(String),
}

/// Scripted fetcher keyed by `cache_key_for(url)`. Records every request;
/// unscripted keys fail as network errors.
pub(crate) struct FakeFetcher {
    outcomes: Mutex<HashMap<String, Outcome>>,
    calls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub(crate) fn new() -> Self {
        Self { outcomes: Mutex::new(HashMap::new()), calls: Mutex::new(Vec::new()) }
    }

    pub(crate) fn respond(&self, key: &str, response: WorkerResponse) {
        self.outcomes.lock().unwrap().insert(key.to_string(), Outcome::Respond(response));
    }

    pub(crate) fn ok(&self, key: &str, body: &str) {
        self.respond(key, ok_response(body));
    }

    pub(crate) fn fail(&self, key: &str, message: &str) {
        self.outcomes.lock().unwrap().insert(key.to_string(), Outcome::Fail(message.to_string()));
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, request: &WorkerRequest) -> Result<WorkerResponse, Error> {
        let key = cache_key_for(&request.url);
        self.calls.lock().unwrap().push(key.clone());

        match self.outcomes.lock().unwrap().get(&key) {
            Some(Outcome::Respond(response)) => Ok(response.clone()),
            Some(Outcome::Fail(message)) => Err(Error::Network(message.clone())),
            None => Err(Error::Network(format!("no scripted response for {key}"))),
        }
    }
}

/// Store wrapper that fails puts or lookups on demand; `seed` bypasses
/// the failure switch for test setup.
pub(crate) struct FailingStore {
    inner: MemoryCache,
    fail_puts: bool,
    fail_lookups: bool,
}

impl FailingStore {
    pub(crate) fn failing_puts() -> Self {
        Self { inner: MemoryCache::new("failing-store"), fail_puts: true, fail_lookups: false }
    }

    pub(crate) fn failing_lookups() -> Self {
        Self { inner: MemoryCache::new("failing-store"), fail_puts: false, fail_lookups: true }
    }

    pub(crate) async fn seed(&self, key: &str, response: WorkerResponse) {
        self.inner.put(key, response).await.unwrap();
    }
}

#[async_trait]
impl CacheStore for FailingStore {
    async fn lookup(&self, key: &str, options: MatchOptions) -> Result<Option<WorkerResponse>, Error> {
        if self.fail_lookups {
            return Err(Error::Store("scripted lookup failure".to_string()));
        }
        self.inner.lookup(key, options).await
    }

    async fn put(&self, key: &str, response: WorkerResponse) -> Result<(), Error> {
        if self.fail_puts {
            return Err(Error::Store("scripted put failure".to_string()));
        }
        self.inner.put(key, response).await
    }
}

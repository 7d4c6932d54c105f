//! Request and response model for intercepted traffic.
//!
//! Requests carry only what classification and routing need: method, URL,
//! and navigation mode. Responses are owned snapshots (status, headers,
//! body bytes), so storing a clone and returning the original are both
//! cheap and never race.

use bytes::Bytes;
use reqwest::{Method, StatusCode, Url};
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

/// Marks a response served from a cache fallback after a data-request
/// network failure. Fixed wire contract.
pub const X_REMIX_WORKER: &str = "X-Remix-Worker";

/// Additionally marks a synthesized error response. Fixed wire contract.
pub const X_REMIX_CATCH: &str = "X-Remix-Catch";

/// How the request was initiated, mirroring the platform request modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    /// Top-level document navigation.
    Navigate,
    SameOrigin,
    #[default]
    Cors,
    NoCors,
}

/// Read-only view of an intercepted request.
#[derive(Debug, Clone)]
pub struct WorkerRequest {
    pub method: Method,
    pub url: Url,
    pub mode: RequestMode,
    pub headers: HeaderMap,
}

impl WorkerRequest {
    /// A plain GET request (mode `cors`).
    pub fn get(url: Url) -> Self {
        Self { method: Method::GET, url, mode: RequestMode::Cors, headers: HeaderMap::new() }
    }

    /// A top-level navigation GET request.
    pub fn navigate(url: Url) -> Self {
        Self { method: Method::GET, url, mode: RequestMode::Navigate, headers: HeaderMap::new() }
    }
}

/// An owned response snapshot.
#[derive(Debug, Clone)]
pub struct WorkerResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl WorkerResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self { status, headers, body }
    }
}

/// Build a JSON response from a serialized value.
///
/// Sets `Content-Type: application/json; charset=utf-8` unless the caller
/// already provided one.
pub fn json_response(value: &serde_json::Value, status: StatusCode, mut headers: HeaderMap) -> WorkerResponse {
    if !headers.contains_key(header::CONTENT_TYPE) {
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json; charset=utf-8"));
    }
    WorkerResponse::new(status, headers, Bytes::from(value.to_string()))
}

/// The cache key for a URL: origin-relative path plus `?query` when
/// present. Fragments never reach the worker and are not represented.
pub fn cache_key_for(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    }
}

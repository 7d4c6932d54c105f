//! Request classification.
//!
//! Every intercepted request falls into exactly one class, checked in a
//! fixed order: asset, then loader data, then document, then other. Only
//! GET requests are ever classified; everything else is passthrough.

use reqwest::{Method, Url};
use seawall_core::manifest::DATA_PARAM;

use crate::http::{RequestMode, WorkerRequest};

/// The four request classes the router dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// Static asset under a configured path prefix.
    Asset,
    /// Loader-data fetch, marked by a non-empty `_data` query parameter.
    Data,
    /// Top-level document navigation.
    Document,
    /// Anything else; forwarded verbatim.
    Other,
}

/// Classify a request against the configured static-asset prefixes.
///
/// Asset matching is on the URL path, never the absolute URL, so prefixes
/// like `/build/` match regardless of origin.
pub fn classify(request: &WorkerRequest, static_asset_prefixes: &[String]) -> RequestClass {
    if request.method != Method::GET {
        return RequestClass::Other;
    }
    if static_asset_prefixes.iter().any(|prefix| request.url.path().starts_with(prefix.as_str())) {
        return RequestClass::Asset;
    }
    if has_loader_param(&request.url) {
        return RequestClass::Data;
    }
    if request.mode == RequestMode::Navigate {
        return RequestClass::Document;
    }
    RequestClass::Other
}

/// True when the URL carries `_data` with a non-empty value. An empty
/// value does not mark a loader request.
fn has_loader_param(url: &Url) -> bool {
    url.query_pairs().any(|(name, value)| name == DATA_PARAM && !value.is_empty())
}

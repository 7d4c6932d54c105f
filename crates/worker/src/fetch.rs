//! Network facade.
//!
//! Strategies and the synchronizer never talk to reqwest directly; they go
//! through `Fetcher`, so tests can script network behavior. An HTTP error
//! status is a response, not an error: callers decide what a 404 means.
//! Only transport-level failures surface as `Error::Network`.

use async_trait::async_trait;
use reqwest::Client;
use seawall_core::{Error, WorkerConfig};

use crate::http::{WorkerRequest, WorkerResponse};

/// Performs one network round trip for an intercepted request.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &WorkerRequest) -> Result<WorkerResponse, Error>;
}

/// Production fetcher backed by a shared reqwest client.
pub struct HttpFetcher {
    http: Client,
}

impl HttpFetcher {
    /// Build the HTTP client with the configured user agent and timeout.
    pub fn new(config: &WorkerConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &WorkerRequest) -> Result<WorkerResponse, Error> {
        let response = self
            .http
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone())
            .send()
            .await
            .map_err(|e| Error::Network(format!("fetch {} failed: {e}", request.url)))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Network(format!("reading body of {} failed: {e}", request.url)))?;

        tracing::debug!("fetched {} -> {} ({} bytes)", request.url, status, body.len());

        Ok(WorkerResponse::new(status, headers, body))
    }
}

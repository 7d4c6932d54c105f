//! The worker facade.
//!
//! One `Worker` owns the strategy router, the manifest synchronizer, and
//! the lifecycle gate. Its entry points map one-to-one onto the host's
//! events: install, activate, message, fetch, push.

use std::sync::Arc;

use seawall_core::{Error, RouteManifest, SyncManifestMessage, WorkerConfig};

use crate::fetch::Fetcher;
use crate::http::{WorkerRequest, WorkerResponse};
use crate::lifecycle::Lifecycle;
use crate::push::{Notification, PushPayload};
use crate::router::Router;
use crate::store::CacheSet;
use crate::sync::{SyncReport, Synchronizer};

pub struct Worker {
    router: Router,
    synchronizer: Synchronizer,
    lifecycle: Lifecycle,
}

impl Worker {
    /// Wire a worker from configuration and injected facades.
    ///
    /// # Errors
    ///
    /// Fails only when the configured origin is not a valid URL.
    pub fn new(config: &WorkerConfig, caches: CacheSet, fetcher: Arc<dyn Fetcher>) -> Result<Self, Error> {
        let origin = config.origin_url().map_err(|e| Error::InvalidUrl(e.to_string()))?;
        let router = Router::new(caches.clone(), fetcher.clone(), config.static_asset_prefixes.clone());
        let synchronizer = Synchronizer::new(caches, fetcher, origin);

        Ok(Self { router, synchronizer, lifecycle: Lifecycle::new() })
    }

    /// Host signaled installation.
    pub fn install(&self) {
        self.lifecycle.install();
    }

    /// Host signaled activation; fetch handling may begin.
    pub fn activate(&self) {
        self.lifecycle.activate();
    }

    /// Validate a sync message and run one synchronization over it.
    pub async fn handle_message(&self, message: SyncManifestMessage) -> Result<SyncReport, Error> {
        let manifest = RouteManifest::try_from(message.manifest)?;
        tracing::debug!(routes = manifest.len(), "manifest received");
        Ok(self.synchronizer.synchronize(&manifest).await)
    }

    /// Route one intercepted request. Suspends until the lifecycle gate
    /// opens; requests that arrive early are served after activation.
    pub async fn handle_fetch(&self, request: &WorkerRequest) -> Result<WorkerResponse, Error> {
        self.lifecycle.ready().await;
        self.router.handle(request).await
    }

    /// Format a push payload into a displayable notification.
    pub fn handle_push(&self, payload_json: &str) -> Result<Notification, Error> {
        let payload = PushPayload::from_json(payload_json)?;
        Ok(Notification::from_payload(payload))
    }
}

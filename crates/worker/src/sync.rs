//! Manifest-driven cache population.
//!
//! One synchronization walks the validated route manifest, derives every
//! cache key it implies, and populates the three stores concurrently.
//!
//! ### Task rules
//! - Parametrized routes resolve to no concrete URL; they are counted and
//!   skipped, never fetched.
//! - At most one population task per distinct key per run; the first
//!   registration of a key fixes its resource kind.
//! - Assets already present are skipped. Documents and data are always
//!   re-fetched, replacing the previous entry.
//! - A non-success population status fails that task. Failures stay
//!   contained per key and end up in the report; `synchronize` itself
//!   never fails.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use futures_util::future::join_all;
use seawall_core::{Error, RouteManifest};
use url::Url;

use crate::fetch::Fetcher;
use crate::http::{WorkerRequest, cache_key_for};
use crate::store::{CacheSet, CacheStore};

/// What a cache key points at, fixed at first registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Asset,
    Data,
    Document,
}

impl ResourceKind {
    fn cache<'a>(&self, caches: &'a CacheSet) -> &'a Arc<dyn CacheStore> {
        match self {
            ResourceKind::Asset => &caches.assets,
            ResourceKind::Data => &caches.data,
            ResourceKind::Document => &caches.documents,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ResourceKind::Asset => "asset",
            ResourceKind::Data => "data",
            ResourceKind::Document => "document",
        };
        write!(f, "{kind}")
    }
}

/// One population task that did not complete.
#[derive(Debug)]
pub struct PopulationFailure {
    pub key: String,
    pub kind: ResourceKind,
    pub error: Error,
}

/// Outcome of one synchronization run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Routes in the manifest, including skipped ones.
    pub routes: usize,
    /// Routes skipped because their id is parametrized.
    pub parametrized_skipped: usize,
    /// Distinct population tasks issued.
    pub tasks: usize,
    /// Tasks that fetched and stored a resource.
    pub populated: usize,
    /// Asset tasks skipped because the key was already cached.
    pub already_cached: usize,
    /// Tasks that failed, with their error.
    pub failures: Vec<PopulationFailure>,
}

impl SyncReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} routes ({} parametrized skipped), {} tasks: {} populated, {} already cached, {} failed",
            self.routes, self.parametrized_skipped, self.tasks, self.populated, self.already_cached,
            self.failures.len()
        )
    }
}

enum TaskOutcome {
    Populated,
    AlreadyCached,
}

/// Walks manifests and fills the caches.
pub struct Synchronizer {
    caches: CacheSet,
    fetcher: Arc<dyn Fetcher>,
    origin: Url,
}

impl Synchronizer {
    pub fn new(caches: CacheSet, fetcher: Arc<dyn Fetcher>, origin: Url) -> Self {
        Self { caches, fetcher, origin }
    }

    /// Run one synchronization over a validated manifest.
    pub async fn synchronize(&self, manifest: &RouteManifest) -> SyncReport {
        let mut parametrized_skipped = 0usize;
        let mut tasks: HashMap<String, ResourceKind> = HashMap::new();

        for route in manifest.routes() {
            if route.is_parametrized() {
                tracing::debug!("skipping parametrized route {}", route.id);
                parametrized_skipped += 1;
                continue;
            }

            tasks.entry(manifest.document_key(route)).or_insert(ResourceKind::Document);
            if route.has_loader {
                tasks.entry(manifest.data_key(route)).or_insert(ResourceKind::Data);
            }
            if let Some(module) = &route.module {
                tasks.entry(module.clone()).or_insert(ResourceKind::Asset);
            }
            for import in &route.imports {
                tasks.entry(import.clone()).or_insert(ResourceKind::Asset);
            }
        }

        let mut report = SyncReport {
            routes: manifest.len(),
            parametrized_skipped,
            tasks: tasks.len(),
            ..SyncReport::default()
        };

        let results = join_all(tasks.into_iter().map(|(key, kind)| async move {
            let outcome = self.populate(&key, kind).await;
            (key, kind, outcome)
        }))
        .await;

        for (key, kind, outcome) in results {
            match outcome {
                Ok(TaskOutcome::Populated) => report.populated += 1,
                Ok(TaskOutcome::AlreadyCached) => report.already_cached += 1,
                Err(error) => {
                    tracing::debug!("population of {} ({}) failed: {}", key, kind, error);
                    report.failures.push(PopulationFailure { key, kind, error });
                }
            }
        }

        tracing::debug!("synchronization finished: {report}");
        report
    }

    /// Fetch one resource and store it in its kind's cache. Assets that
    /// are already present are left alone.
    async fn populate(&self, key: &str, kind: ResourceKind) -> Result<TaskOutcome, Error> {
        let url = self
            .origin
            .join(key)
            .map_err(|e| Error::InvalidUrl(format!("cannot resolve {key} against {}: {e}", self.origin)))?;
        let store_key = cache_key_for(&url);
        let cache = kind.cache(&self.caches);

        if kind == ResourceKind::Asset && cache.contains(&store_key).await? {
            return Ok(TaskOutcome::AlreadyCached);
        }

        let response = self.fetcher.fetch(&WorkerRequest::get(url)).await?;
        if !response.status.is_success() {
            return Err(Error::UnexpectedStatus(response.status.as_u16()));
        }

        cache.put(&store_key, response).await?;
        Ok(TaskOutcome::Populated)
    }
}

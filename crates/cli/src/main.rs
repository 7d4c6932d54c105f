//! seawall cache warmer.
//!
//! Reads a route-manifest sync message from a file, populates the
//! SQLite-backed caches against the configured origin, and prints a
//! one-line report. Logging goes to stderr so the report stays clean on
//! stdout.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use seawall_core::{SyncManifestMessage, WorkerConfig};
use seawall_worker::{CacheSet, HttpFetcher, Worker};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = WorkerConfig::load().context("loading configuration")?;

    let manifest_path = match std::env::args().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => config.require_manifest_path()?.to_path_buf(),
    };

    tracing::info!("warming caches from {} against {}", manifest_path.display(), config.origin);

    let payload = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("reading manifest {}", manifest_path.display()))?;
    let message = SyncManifestMessage::from_json(&payload)?;

    let caches = CacheSet::sqlite(&config.db_path).await?;
    let fetcher = Arc::new(HttpFetcher::new(&config)?);
    let worker = Worker::new(&config, caches, fetcher)?;

    worker.install();
    worker.activate();

    let report = worker.handle_message(message).await?;
    for failure in &report.failures {
        tracing::warn!("population of {} ({}) failed: {}", failure.key, failure.kind, failure.error);
    }

    println!("{report}");

    if report.has_failures() {
        bail!("{} of {} population tasks failed", report.failures.len(), report.tasks);
    }
    Ok(())
}

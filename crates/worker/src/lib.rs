//! Request interception runtime for seawall.
//!
//! This crate provides the pieces that sit between an application's
//! requests and the network: request classification, per-class caching
//! strategies, manifest-driven cache population, and the worker facade
//! that wires them to a lifecycle gate.

pub mod classify;
pub mod fetch;
pub mod http;
pub mod lifecycle;
pub mod push;
pub mod router;
pub mod store;
pub mod sync;
pub mod worker;

#[cfg(test)]
pub(crate) mod testutil;

pub use classify::{RequestClass, classify};
pub use fetch::{Fetcher, HttpFetcher};
pub use http::{RequestMode, WorkerRequest, WorkerResponse, X_REMIX_CATCH, X_REMIX_WORKER};
pub use lifecycle::{Lifecycle, Phase};
pub use push::{Notification, PushPayload};
pub use router::Router;
pub use store::{ASSET_CACHE, CacheSet, CacheStore, DATA_CACHE, DOCUMENT_CACHE, MatchOptions};
pub use sync::{PopulationFailure, ResourceKind, SyncReport, Synchronizer};
pub use worker::Worker;

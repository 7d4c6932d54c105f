//! Core types and shared functionality for seawall.
//!
//! This crate provides:
//! - The route-manifest domain model with ingestion-time validation
//! - Route path resolution and cache-key derivation
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod manifest;

pub use config::WorkerConfig;
pub use error::Error;
pub use manifest::{ManifestPayload, RouteDescriptor, RouteManifest, SyncManifestMessage};

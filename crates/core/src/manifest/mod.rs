//! Route-manifest domain model.
//!
//! The host application describes its route tree with a manifest message.
//! This module defines the wire shape of that message and `RouteManifest`,
//! the validated, immutable form the synchronizer consumes.
//!
//! ### Ingestion validation
//! - Every key in `routes` names a descriptor carrying the same `id`.
//! - Every `parentId` resolves to another entry in the same manifest.
//! - Parent chains terminate (the routes form a forest, never a cycle).
//!
//! A manifest is replaced wholesale by the next sync message; nothing is
//! ever merged or mutated in place.

pub mod path;

pub use path::DATA_PARAM;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Marker character for parametrized (dynamic-segment) route ids.
///
/// Routes whose id contains it resolve to no concrete URL and are skipped
/// during cache population.
pub const PARAM_MARKER: char = '$';

/// One entry of the route manifest.
///
/// Field names follow the manifest wire format; unknown wire fields are
/// ignored. Descriptors are read-only after delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDescriptor {
    /// Unique route id, e.g. `routes/products`.
    pub id: String,

    /// Relative URL path segment. Absent or empty for pathless layout
    /// routes and index routes.
    #[serde(default)]
    pub path: Option<String>,

    /// Id of the parent route, if any.
    #[serde(default)]
    pub parent_id: Option<String>,

    /// True if the route fetches loader data at runtime.
    #[serde(default)]
    pub has_loader: bool,

    /// True for index routes. Carried for wire fidelity; population does
    /// not branch on it.
    #[serde(default)]
    pub index: bool,

    /// URL of the route's client module, if any.
    #[serde(default)]
    pub module: Option<String>,

    /// URLs of the resources the module depends on, in order.
    #[serde(default)]
    pub imports: Vec<String>,
}

impl RouteDescriptor {
    /// True if the id contains a dynamic-segment marker.
    ///
    /// Such ids never resolve to a concrete cache key.
    pub fn is_parametrized(&self) -> bool {
        self.id.contains(PARAM_MARKER)
    }
}

/// The raw `manifest` body of a sync message: route id → descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestPayload {
    pub routes: HashMap<String, RouteDescriptor>,
}

/// Host message that triggers one manifest synchronization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncManifestMessage {
    pub manifest: ManifestPayload,
}

impl SyncManifestMessage {
    /// Parse a sync message from its JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidManifest` if the payload is not valid JSON
    /// or does not match the message shape.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::InvalidManifest(format!("malformed sync message: {e}")))
    }
}

/// A validated route manifest.
///
/// Constructed via `TryFrom<ManifestPayload>`, which enforces the forest
/// invariants; afterwards the manifest is immutable.
#[derive(Debug, Clone)]
pub struct RouteManifest {
    routes: HashMap<String, RouteDescriptor>,
}

impl RouteManifest {
    /// Look up a route by id.
    pub fn route(&self, id: &str) -> Option<&RouteDescriptor> {
        self.routes.get(id)
    }

    /// Iterate over all route descriptors (unordered).
    pub fn routes(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.routes.values()
    }

    /// Number of routes in the manifest.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True if the manifest contains no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl TryFrom<ManifestPayload> for RouteManifest {
    type Error = Error;

    fn try_from(payload: ManifestPayload) -> Result<Self, Error> {
        let routes = payload.routes;

        for (key, route) in &routes {
            if key != &route.id {
                return Err(Error::InvalidManifest(format!(
                    "route key {key:?} does not match descriptor id {:?}",
                    route.id
                )));
            }
        }

        for route in routes.values() {
            let mut hops = 0usize;
            let mut current = route;
            while let Some(parent_id) = &current.parent_id {
                hops += 1;
                if hops > routes.len() {
                    return Err(Error::InvalidManifest(format!("parent cycle through route {:?}", route.id)));
                }
                current = routes.get(parent_id).ok_or_else(|| {
                    Error::InvalidManifest(format!(
                        "route {:?} references unknown parent {parent_id:?}",
                        current.id
                    ))
                })?;
            }
        }

        Ok(Self { routes })
    }
}

//! Cache-key derivation from the route tree.
//!
//! Keys are origin-relative: a pathname for documents, the pathname plus
//! the loader query parameter for data. Derivation walks parent chains,
//! so it lives on `RouteManifest`, where every referenced ancestor is
//! known to resolve.

use super::{RouteDescriptor, RouteManifest};

/// Query parameter that addresses a route's loader data.
pub const DATA_PARAM: &str = "_data";

impl RouteManifest {
    /// Resolve a route's URL pathname by walking its parent chain.
    ///
    /// Each route contributes `/{path}` when its `path` is non-empty;
    /// pathless ancestors contribute nothing. The root route therefore
    /// resolves to the empty string.
    pub fn pathname(&self, route: &RouteDescriptor) -> String {
        let mut pathname = String::new();
        if let Some(path) = &route.path
            && !path.is_empty()
        {
            pathname = format!("/{path}");
        }
        if let Some(parent_id) = &route.parent_id
            && let Some(parent) = self.route(parent_id)
        {
            let prefix = self.pathname(parent);
            if !prefix.is_empty() {
                pathname = format!("{prefix}{pathname}");
            }
        }
        pathname
    }

    /// Cache key for a route's rendered document.
    ///
    /// The empty pathname (the root route) collapses to `/`, matching how
    /// request URLs present the root document.
    pub fn document_key(&self, route: &RouteDescriptor) -> String {
        let pathname = self.pathname(route);
        if pathname.is_empty() { "/".to_string() } else { pathname }
    }

    /// Cache key for a route's loader data: the document key plus
    /// `_data=<route id>`, encoded the way browsers serialize query
    /// parameters (`/` becomes `%2F`).
    pub fn data_key(&self, route: &RouteDescriptor) -> String {
        let query: String = url::form_urlencoded::Serializer::new(String::new())
            .append_pair(DATA_PARAM, &route.id)
            .finish();
        format!("{}?{query}", self.document_key(route))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestPayload;

    fn route(id: &str, path: Option<&str>, parent_id: Option<&str>) -> RouteDescriptor {
        RouteDescriptor {
            id: id.to_string(),
            path: path.map(|p| p.to_string()),
            parent_id: parent_id.map(|p| p.to_string()),
            has_loader: true,
            index: false,
            module: None,
            imports: Vec::new(),
        }
    }

    fn manifest(routes: Vec<RouteDescriptor>) -> RouteManifest {
        let routes = routes.into_iter().map(|r| (r.id.clone(), r)).collect();
        RouteManifest::try_from(ManifestPayload { routes }).unwrap()
    }

    #[test]
    fn test_root_pathname_is_empty_and_document_key_collapses() {
        let m = manifest(vec![route("root", Some(""), None)]);
        let root = m.route("root").unwrap();
        assert_eq!(m.pathname(root), "");
        assert_eq!(m.document_key(root), "/");
    }

    #[test]
    fn test_nested_pathname_concatenation() {
        let m = manifest(vec![
            route("root", Some(""), None),
            route("routes/dashboard", Some("dashboard"), Some("root")),
            route("routes/dashboard/reports", Some("reports"), Some("routes/dashboard")),
        ]);
        let reports = m.route("routes/dashboard/reports").unwrap();
        assert_eq!(m.pathname(reports), "/dashboard/reports");
    }

    #[test]
    fn test_pathless_layout_contributes_nothing() {
        let m = manifest(vec![
            route("root", Some(""), None),
            route("routes/_layout", None, Some("root")),
            route("routes/_layout.settings", Some("settings"), Some("routes/_layout")),
        ]);
        let settings = m.route("routes/_layout.settings").unwrap();
        assert_eq!(m.pathname(settings), "/settings");
        assert_eq!(m.document_key(settings), "/settings");
    }

    #[test]
    fn test_child_document_key_extends_parent_pathname() {
        let m = manifest(vec![
            route("root", Some(""), None),
            route("routes/products", Some("products"), Some("root")),
            route("routes/products.featured", Some("featured"), Some("routes/products")),
        ]);
        let parent = m.route("routes/products").unwrap();
        let child = m.route("routes/products.featured").unwrap();
        assert_eq!(m.pathname(child), format!("{}/featured", m.pathname(parent)));
    }

    #[test]
    fn test_data_key_encodes_route_id() {
        let m = manifest(vec![
            route("root", Some(""), None),
            route("routes/products", Some("products"), Some("root")),
        ]);
        let products = m.route("routes/products").unwrap();
        assert_eq!(m.data_key(products), "/products?_data=routes%2Fproducts");
    }

    #[test]
    fn test_data_key_for_root_route() {
        let m = manifest(vec![route("root", Some(""), None)]);
        let root = m.route("root").unwrap();
        assert_eq!(m.data_key(root), "/?_data=root");
    }
}
